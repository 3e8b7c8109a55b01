// The #[error] attribute from thiserror uses struct fields via string interpolation,
// but Rust's unused_assignments lint doesn't recognize this.
#![allow(unused_assignments)]

//! flowsmith Error Types with Error Codes
//!
//! Error code ranges:
//! - FLOW-001-009: Configuration errors
//! - FLOW-010-019: Client input errors
//! - FLOW-020-029: Extraction errors
//! - FLOW-030-039: Generation errors
//! - FLOW-040-049: Submission / platform errors
//! - FLOW-050-059: Chat session errors
//! - FLOW-090-099: IO errors
//!
//! Every error answers two questions for the presentation layer: a short
//! category [`label`](SubmissionError::label) and an optional longer
//! [`details`](SubmissionError::details) diagnostic.

use thiserror::Error;

use crate::workflow::MissingField;

pub type Result<T> = std::result::Result<T, FlowError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Coarse error taxonomy shared by every error type in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed or out-of-bounds caller input; no collaborator was contacted
    ClientInput,
    /// Language-model output was not recoverable JSON
    Extraction,
    /// Document was present but violated the workflow schema
    Validation,
    /// Network, auth, rate-limit or rejection from an external dependency
    Collaborator,
    /// Anything unanticipated, including missing configuration
    Internal,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::ClientInput => write!(f, "client-input"),
            ErrorClass::Extraction => write!(f, "extraction"),
            ErrorClass::Validation => write!(f, "validation"),
            ErrorClass::Collaborator => write!(f, "collaborator"),
            ErrorClass::Internal => write!(f, "internal"),
        }
    }
}

// ═══════════════════════════════════════════
// CONFIG ERRORS (001-009)
// ═══════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("[FLOW-001] {var} is not set in environment variables")]
    Missing { var: &'static str },

    #[error("[FLOW-002] Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "FLOW-001",
            Self::Invalid { .. } => "FLOW-002",
        }
    }

    /// Message without the error code prefix
    pub fn reason(&self) -> String {
        match self {
            Self::Missing { var } => format!("{} is not set in environment variables", var),
            Self::Invalid { var, reason } => format!("Invalid value for {}: {}", var, reason),
        }
    }
}

impl FixSuggestion for ConfigError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            Self::Missing { var } => match *var {
                "ANTHROPIC_API_KEY" => Some("Export ANTHROPIC_API_KEY or add it to .env"),
                "N8N_URL" => Some("Export N8N_URL (e.g. http://localhost:5678) or add it to .env"),
                "N8N_API_KEY" => {
                    Some("Create an API key in n8n (Settings > n8n API) and export N8N_API_KEY")
                }
                _ => None,
            },
            Self::Invalid { .. } => Some("N8N_URL must be an absolute http(s) URL"),
        }
    }
}

// ═══════════════════════════════════════════
// CLIENT INPUT ERRORS (010-019)
// ═══════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientInputError {
    #[error("[FLOW-010] Message is required and must be a non-empty string")]
    EmptyMessage,

    #[error("[FLOW-011] Message is {actual} characters, the limit is {max}")]
    MessageTooLong { max: usize, actual: usize },

    #[error("[FLOW-012] Workflow object is required")]
    MissingWorkflow,
}

impl ClientInputError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "FLOW-010",
            Self::MessageTooLong { .. } => "FLOW-011",
            Self::MissingWorkflow => "FLOW-012",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MessageTooLong { .. } => "Message too long",
            Self::EmptyMessage | Self::MissingWorkflow => "Invalid request",
        }
    }

    pub fn details(&self) -> Option<String> {
        Some(match self {
            Self::EmptyMessage => "Message is required and must be a non-empty string".to_string(),
            Self::MessageTooLong { max, .. } => {
                format!("Message must be less than {} characters", max)
            }
            Self::MissingWorkflow => "Workflow object is required".to_string(),
        })
    }

    pub fn class(&self) -> ErrorClass {
        ErrorClass::ClientInput
    }
}

// ═══════════════════════════════════════════
// EXTRACTION ERRORS (020-029)
// ═══════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("[FLOW-020] Failed to parse workflow JSON: {details}")]
    Parse { details: String },
}

impl ExtractError {
    pub fn code(&self) -> &'static str {
        "FLOW-020"
    }

    pub fn class(&self) -> ErrorClass {
        ErrorClass::Extraction
    }
}

// ═══════════════════════════════════════════
// GENERATION ERRORS (030-039)
// ═══════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("[FLOW-030] {0}")]
    ParseFailure(#[from] ExtractError),

    #[error("[FLOW-031] Generated workflow is missing required fields (name, nodes, or connections): '{field}'")]
    MissingFields { field: MissingField },

    #[error("[FLOW-032] Generation provider failed: {message}")]
    Collaborator { message: String },

    #[error("[FLOW-033] {0}")]
    Config(#[from] ConfigError),
}

impl GenerationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParseFailure(_) => "FLOW-030",
            Self::MissingFields { .. } => "FLOW-031",
            Self::Collaborator { .. } => "FLOW-032",
            Self::Config(_) => "FLOW-033",
        }
    }

    /// Short category shown to the user
    pub fn label(&self) -> &'static str {
        "Failed to generate workflow"
    }

    /// Longer diagnostic shown under the label
    pub fn details(&self) -> Option<String> {
        Some(match self {
            Self::ParseFailure(ExtractError::Parse { details }) => {
                format!("Failed to parse workflow JSON: {}", details)
            }
            Self::MissingFields { field } => format!(
                "Generated workflow is missing required fields (name, nodes, or connections): '{}'",
                field
            ),
            Self::Collaborator { message } => message.clone(),
            Self::Config(e) => e.reason(),
        })
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ParseFailure(_) => ErrorClass::Extraction,
            Self::MissingFields { .. } => ErrorClass::Validation,
            Self::Collaborator { .. } => ErrorClass::Collaborator,
            Self::Config(_) => ErrorClass::Internal,
        }
    }
}

impl FixSuggestion for GenerationError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            Self::ParseFailure(_) | Self::MissingFields { .. } => Some(
                "Rephrase the request and try again; the model did not return a usable workflow",
            ),
            Self::Collaborator { .. } => {
                Some("Check ANTHROPIC_API_KEY and network access, then retry")
            }
            Self::Config(e) => e.fix_suggestion(),
        }
    }
}

// ═══════════════════════════════════════════
// SUBMISSION ERRORS (040-049)
// ═══════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("[FLOW-040] Invalid workflow structure: {}", .errors.join("; "))]
    ValidationFailure { errors: Vec<String> },

    #[error("[FLOW-041] n8n API error (HTTP {status}): {message}")]
    PlatformRejected { status: u16, message: String },

    #[error("[FLOW-042] n8n rejected the credentials (HTTP {status})")]
    AuthenticationFailed { status: u16 },

    #[error("[FLOW-043] Cannot connect to n8n: {reason}")]
    Unreachable { reason: String },

    #[error("[FLOW-044] Failed to create workflow in n8n: {message}")]
    Unknown { message: String },

    #[error("[FLOW-045] {0}")]
    Config(#[from] ConfigError),
}

impl SubmissionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailure { .. } => "FLOW-040",
            Self::PlatformRejected { .. } => "FLOW-041",
            Self::AuthenticationFailed { .. } => "FLOW-042",
            Self::Unreachable { .. } => "FLOW-043",
            Self::Unknown { .. } => "FLOW-044",
            Self::Config(_) => "FLOW-045",
        }
    }

    /// Short category shown to the user after a create request
    pub fn label(&self) -> &'static str {
        match self {
            Self::ValidationFailure { .. } => "Invalid workflow structure",
            Self::PlatformRejected { .. } => "n8n API Error",
            Self::AuthenticationFailed { .. } => "Authentication failed",
            Self::Unreachable { .. } => "Cannot connect to n8n",
            Self::Unknown { .. } | Self::Config(_) => "Failed to create workflow in n8n",
        }
    }

    /// Short category shown to the user after a connectivity probe
    pub fn connectivity_label(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "Authentication failed",
            Self::PlatformRejected { .. } => "n8n API Error",
            Self::Unreachable { .. } => "Cannot reach n8n",
            _ => "Connection test failed",
        }
    }

    /// Diagnostic shown under [`connectivity_label`](Self::connectivity_label)
    pub fn connectivity_details(&self) -> Option<String> {
        match self {
            Self::Unreachable { .. } => Some(
                "Please check if N8N_URL is correct and n8n is accessible.".to_string(),
            ),
            other => other.details(),
        }
    }

    /// Longer diagnostic shown under the label
    pub fn details(&self) -> Option<String> {
        Some(match self {
            Self::ValidationFailure { errors } => errors.join("; "),
            Self::PlatformRejected { message, .. } => message.clone(),
            Self::AuthenticationFailed { .. } => {
                "Invalid N8N_API_KEY. Please check your credentials.".to_string()
            }
            Self::Unreachable { .. } => {
                "No response from n8n server. Check if N8N_URL is correct and n8n is running."
                    .to_string()
            }
            Self::Unknown { message } => message.clone(),
            Self::Config(e) => e.reason(),
        })
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ValidationFailure { .. } => ErrorClass::Validation,
            Self::PlatformRejected { .. }
            | Self::AuthenticationFailed { .. }
            | Self::Unreachable { .. } => ErrorClass::Collaborator,
            Self::Unknown { .. } | Self::Config(_) => ErrorClass::Internal,
        }
    }
}

impl FixSuggestion for SubmissionError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            Self::ValidationFailure { .. } => {
                Some("Fix the listed fields or regenerate the workflow")
            }
            Self::PlatformRejected { .. } => {
                Some("Inspect the n8n server logs for the rejection reason")
            }
            Self::AuthenticationFailed { .. } => Some("Check N8N_API_KEY"),
            Self::Unreachable { .. } => Some("Check that N8N_URL is correct and n8n is running"),
            Self::Unknown { .. } => None,
            Self::Config(e) => e.fix_suggestion(),
        }
    }
}

// ═══════════════════════════════════════════
// SESSION ERRORS (050-059)
// ═══════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("[FLOW-050] A request is already in flight")]
    Busy,

    #[error("[FLOW-051] No workflow is awaiting confirmation")]
    NothingPending,
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Busy => "FLOW-050",
            Self::NothingPending => "FLOW-051",
        }
    }

    pub fn class(&self) -> ErrorClass {
        ErrorClass::ClientInput
    }
}

// ═══════════════════════════════════════════
// TOP-LEVEL ERROR
// ═══════════════════════════════════════════

/// Umbrella error used by the CLI.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ClientInput(#[from] ClientInputError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("[FLOW-090] Workflow file is invalid: {reason}")]
    InvalidFile { reason: String },

    #[error("[FLOW-091] Internal error: {reason}")]
    Internal { reason: String },

    #[error("[FLOW-093] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[FLOW-094] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlowError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.code(),
            Self::ClientInput(e) => e.code(),
            Self::Extract(e) => e.code(),
            Self::Generation(e) => e.code(),
            Self::Submission(e) => e.code(),
            Self::Session(e) => e.code(),
            Self::InvalidFile { .. } => "FLOW-090",
            Self::Internal { .. } => "FLOW-091",
            Self::Io(_) => "FLOW-093",
            Self::Json(_) => "FLOW-094",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Config(_) => ErrorClass::Internal,
            Self::ClientInput(e) => e.class(),
            Self::Extract(e) => e.class(),
            Self::Generation(e) => e.class(),
            Self::Submission(e) => e.class(),
            Self::Session(e) => e.class(),
            Self::InvalidFile { .. } => ErrorClass::ClientInput,
            Self::Internal { .. } | Self::Io(_) | Self::Json(_) => ErrorClass::Internal,
        }
    }
}

impl FixSuggestion for FlowError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            Self::Config(e) => e.fix_suggestion(),
            Self::Generation(e) => e.fix_suggestion(),
            Self::Submission(e) => e.fix_suggestion(),
            Self::Session(SessionError::Busy) => Some("Wait for the current request to finish"),
            Self::InvalidFile { .. } | Self::Json(_) => {
                Some("The file must hold a workflow object or {\"workflow\": {...}}")
            }
            _ => None,
        }
    }
}
