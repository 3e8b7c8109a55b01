//! flowsmith - natural language to n8n workflows
//!
//! A request goes through a language model, the returned text is reduced to
//! a workflow document, checked, normalized and on confirmation stored on an
//! n8n server.

pub mod api;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod prompts;
pub mod provider;
pub mod session;
pub mod util;
pub mod workflow;

pub use config::FlowConfig;
pub use error::{ErrorClass, FixSuggestion, FlowError};
pub use orchestrator::{Connectivity, Orchestrator, SubmissionReceipt};
pub use platform::{MockPlatform, N8nClient, Platform, PlatformError};
pub use provider::{ClaudeProvider, MockProvider, Provider};
pub use session::ChatSession;
pub use workflow::{GeneratedWorkflow, Strictness, ValidationResult, WorkflowDocument};
