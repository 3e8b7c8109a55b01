//! Submission orchestrator
//!
//! Sequences the three round-trips of the tool:
//!
//! - [`Orchestrator::generate`]: model text -> extracted JSON -> canonical document
//! - [`Orchestrator::submit`]: strict validation -> normalize -> platform
//! - [`Orchestrator::check_connectivity`]: platform listing probe
//!
//! Every collaborator fault is converted into a typed error here. Nothing
//! is retried.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{ConfigError, GenerationError, SubmissionError};
use crate::platform::{Platform, PlatformError};
use crate::prompts::{build_user_prompt, SYSTEM_PROMPT};
use crate::provider::{ChatRequest, Message, Provider};
use crate::util::PLATFORM_TIMEOUT;
use crate::workflow::{
    explanation_or_default, extract, normalize, validate, GeneratedWorkflow, Strictness,
    WorkflowDocument,
};

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    /// Identifier assigned by the platform
    pub id: String,
    /// Editor link, `{base}/workflow/{id}`
    pub url: String,
    /// Platform's full response
    pub data: Value,
}

/// Outcome of a successful connectivity probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connectivity {
    pub workflow_count: usize,
}

pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    platform: Arc<dyn Platform>,
    model: String,
    platform_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        platform: Arc<dyn Platform>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            platform,
            model: model.into(),
            platform_timeout: PLATFORM_TIMEOUT,
        }
    }

    /// Override the bound on platform calls
    pub fn with_platform_timeout(mut self, timeout: Duration) -> Self {
        self.platform_timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a workflow from `instruction`, continuing `history`.
    pub async fn generate(
        &self,
        instruction: &str,
        history: &[Message],
    ) -> Result<GeneratedWorkflow, GenerationError> {
        info!(
            provider = self.provider.name(),
            turns = history.len(),
            "generating workflow"
        );

        let mut messages = history.to_vec();
        messages.push(Message::user(build_user_prompt(instruction)));
        let request = ChatRequest::new(SYSTEM_PROMPT, messages, self.model.as_str());

        let raw_text = self.provider.chat(&request).await.map_err(|e| {
            match e.downcast_ref::<ConfigError>() {
                Some(config) => GenerationError::Config(config.clone()),
                None => {
                    error!(error = %e, "generation provider failed");
                    GenerationError::Collaborator {
                        message: format!("{:#}", e),
                    }
                }
            }
        })?;

        let original = extract(&raw_text)?;
        let document = WorkflowDocument::from_value(&original)
            .map_err(|field| GenerationError::MissingFields { field })?;

        let findings = validate(&original, Strictness::Lenient);
        if !findings.is_valid() {
            warn!(
                errors = %findings.errors().join("; "),
                "generated workflow has structural issues"
            );
        }

        let explanation = explanation_or_default(&original);
        let workflow = normalize(&document);
        info!(
            name = %workflow.name,
            nodes = workflow.nodes.len(),
            "workflow generated"
        );

        Ok(GeneratedWorkflow {
            workflow,
            original,
            explanation,
        })
    }

    /// Validate `workflow` strictly and store it on the platform, inactive.
    pub async fn submit(&self, workflow: &Value) -> Result<SubmissionReceipt, SubmissionError> {
        let result = validate(workflow, Strictness::Strict);
        if !result.is_valid() {
            return Err(SubmissionError::ValidationFailure {
                errors: result.errors(),
            });
        }

        // strict validation guarantees name, nodes and connections
        let document = WorkflowDocument::from_value(workflow).map_err(|field| {
            SubmissionError::ValidationFailure {
                errors: vec![format!("Missing {}", field)],
            }
        })?;
        let mut body = normalize(&document).to_value();
        if let Some(object) = body.as_object_mut() {
            object.insert("active".to_string(), Value::Bool(false));
        }

        let data = self
            .bounded(self.platform.create_workflow(&body))
            .await
            .map_err(submission_error)?;

        let id = workflow_id(&data).ok_or_else(|| SubmissionError::Unknown {
            message: "n8n response did not include a workflow id".to_string(),
        })?;
        let url = format!(
            "{}/workflow/{}",
            self.platform.base_url().unwrap_or_default().trim_end_matches('/'),
            id
        );
        info!(id = %id, url = %url, "workflow created");

        Ok(SubmissionReceipt { id, url, data })
    }

    /// Probe the platform by listing workflows.
    pub async fn check_connectivity(&self) -> Result<Connectivity, SubmissionError> {
        let listing = self
            .bounded(self.platform.list_workflows())
            .await
            .map_err(|e| match e {
                PlatformError::Rejected {
                    status: status @ (401 | 403),
                    ..
                } => {
                    SubmissionError::AuthenticationFailed { status }
                }
                other => submission_error(other),
            })?;

        let workflow_count = listing
            .get("data")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        info!(workflow_count, platform = self.platform.name(), "connected");

        Ok(Connectivity { workflow_count })
    }

    async fn bounded<F>(&self, call: F) -> Result<Value, PlatformError>
    where
        F: std::future::Future<Output = Result<Value, PlatformError>>,
    {
        match tokio::time::timeout(self.platform_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(PlatformError::Unreachable {
                reason: format!("no answer within {:?}", self.platform_timeout),
            }),
        }
    }
}

fn submission_error(e: PlatformError) -> SubmissionError {
    error!(error = %e, "platform call failed");
    match e {
        PlatformError::Rejected { status, message } => {
            SubmissionError::PlatformRejected { status, message }
        }
        PlatformError::Unreachable { reason } => SubmissionError::Unreachable { reason },
        PlatformError::Config(config) => SubmissionError::Config(config),
        PlatformError::Other { message } => SubmissionError::Unknown { message },
    }
}

/// The platform's id, which n8n may send as a string or a number
fn workflow_id(data: &Value) -> Option<String> {
    match data.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
