//! # Execution Platform Layer
//!
//! The collaborator that stores workflows and answers the connectivity probe.
//!
//! - [`Platform`] - Core trait
//! - [`N8nClient`] - n8n public REST API (`/api/v1/workflows`)
//! - [`MockPlatform`] - In-memory platform for tests
//!
//! Implementations report a typed [`PlatformError`]; the orchestrator turns
//! it into a [`SubmissionError`](crate::error::SubmissionError).

mod mock;
mod n8n;

pub use mock::MockPlatform;
pub use n8n::N8nClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::error::ConfigError;

/// Failure reported by an execution platform
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// The server answered with a non-success status
    #[error("platform rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// No response: connect failure, timeout or broken transport
    #[error("no response from platform: {reason}")]
    Unreachable { reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{message}")]
    Other { message: String },
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Persist a workflow; returns the platform's JSON representation of it
    async fn create_workflow(&self, workflow: &Value) -> Result<Value, PlatformError>;

    /// Fetch the workflow listing (`{"data": [...]}`)
    async fn list_workflows(&self) -> Result<Value, PlatformError>;

    /// Base address used to build editor links, if configured
    fn base_url(&self) -> Option<&str>;

    /// Get the platform name (e.g., "n8n", "mock")
    fn name(&self) -> &str;
}
