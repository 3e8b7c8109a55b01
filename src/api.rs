//! Request/response payloads for the three user actions
//!
//! Transport-agnostic: each handler takes a decoded request and returns a
//! [`Reply`] carrying an HTTP-equivalent [`Status`] and a JSON body with
//! camelCase keys. Every failure renders as `{success: false, error, details?}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{ClientInputError, GenerationError, SubmissionError};
use crate::orchestrator::Orchestrator;
use crate::provider::Message;
use crate::util::MAX_MESSAGE_CHARS;
use crate::workflow::WorkflowDocument;

// ═══════════════════════════════════════════
// REQUESTS
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Kept untyped so a non-string message is a client error, not a decode error
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub conversation_history: Vec<Message>,
}

impl GenerateRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Value::String(message.into()),
            conversation_history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.conversation_history = history;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub workflow: Value,
}

/// Trimmed message, or the client error that rejects it.
pub fn check_message(message: &Value) -> Result<&str, ClientInputError> {
    let text = message
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ClientInputError::EmptyMessage)?;

    let actual = text.chars().count();
    if actual > MAX_MESSAGE_CHARS {
        return Err(ClientInputError::MessageTooLong {
            max: MAX_MESSAGE_CHARS,
            actual,
        });
    }
    Ok(text)
}

// ═══════════════════════════════════════════
// RESPONSES
// ═══════════════════════════════════════════

/// HTTP-equivalent outcome class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Ok,
    BadRequest,
    ServerError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::ServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Failure {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details,
        }
    }
}

impl From<&ClientInputError> for Failure {
    fn from(e: &ClientInputError) -> Self {
        Failure::new(e.label(), e.details())
    }
}

impl From<&GenerationError> for Failure {
    fn from(e: &GenerationError) -> Self {
        Failure::new(e.label(), e.details())
    }
}

impl From<&SubmissionError> for Failure {
    fn from(e: &SubmissionError) -> Self {
        Failure::new(e.label(), e.details())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateSuccess {
    pub success: bool,
    pub workflow: WorkflowDocument,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSuccess {
    pub success: bool,
    pub workflow_id: String,
    pub url: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub success: bool,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    Generated(GenerateSuccess),
    Created(CreateSuccess),
    Connection(ConnectionReport),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: Status,
    pub body: Body,
}

impl Reply {
    fn ok(body: Body) -> Self {
        Self {
            status: Status::Ok,
            body,
        }
    }

    fn fail(status: Status, failure: Failure) -> Self {
        Self {
            status,
            body: Body::Failure(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.body).unwrap_or(Value::Null)
    }
}

// ═══════════════════════════════════════════
// HANDLERS
// ═══════════════════════════════════════════

/// Generate a workflow; bad input is rejected before the provider is called.
pub async fn generate(orchestrator: &Orchestrator, request: &GenerateRequest) -> Reply {
    let message = match check_message(&request.message) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "rejected generate request");
            return Reply::fail(Status::BadRequest, Failure::from(&e));
        }
    };

    match orchestrator
        .generate(message, &request.conversation_history)
        .await
    {
        Ok(generated) => Reply::ok(Body::Generated(GenerateSuccess {
            success: true,
            workflow: generated.workflow,
            explanation: generated.explanation,
        })),
        Err(e) => Reply::fail(Status::ServerError, Failure::from(&e)),
    }
}

/// Submit a workflow to the platform.
pub async fn create(orchestrator: &Orchestrator, request: &CreateRequest) -> Reply {
    if !request.workflow.is_object() {
        let e = ClientInputError::MissingWorkflow;
        warn!(error = %e, "rejected create request");
        return Reply::fail(Status::BadRequest, Failure::from(&e));
    }

    match orchestrator.submit(&request.workflow).await {
        Ok(receipt) => Reply::ok(Body::Created(CreateSuccess {
            success: true,
            workflow_id: receipt.id,
            url: receipt.url,
            data: receipt.data,
        })),
        Err(e @ SubmissionError::ValidationFailure { .. }) => {
            Reply::fail(Status::BadRequest, Failure::from(&e))
        }
        Err(e) => Reply::fail(Status::ServerError, Failure::from(&e)),
    }
}

/// Probe the platform.
pub async fn test_connection(orchestrator: &Orchestrator) -> Reply {
    match orchestrator.check_connectivity().await {
        Ok(connectivity) => Reply::ok(Body::Connection(ConnectionReport {
            success: true,
            connected: true,
            message: Some("Successfully connected to n8n".to_string()),
            workflow_count: Some(connectivity.workflow_count),
            error: None,
            details: None,
        })),
        Err(e) => Reply {
            status: Status::ServerError,
            body: Body::Connection(ConnectionReport {
                success: false,
                connected: false,
                message: None,
                workflow_count: None,
                error: Some(e.connectivity_label().to_string()),
                details: e.connectivity_details(),
            }),
        },
    }
}
