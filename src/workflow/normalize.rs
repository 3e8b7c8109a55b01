//! Canonical form of a workflow document

use serde_json::{Map, Value};

use super::document::WorkflowDocument;
use crate::util::DEFAULT_EXECUTION_ORDER;

/// Explanation used when the model did not provide one
pub const DEFAULT_EXPLANATION: &str = "Workflow generated successfully";

/// `{"executionOrder": "v1"}`
pub fn default_settings() -> Map<String, Value> {
    let mut settings = Map::new();
    settings.insert(
        "executionOrder".to_string(),
        Value::String(DEFAULT_EXECUTION_ORDER.to_string()),
    );
    settings
}

/// Produce the canonical copy of `doc`.
///
/// Name, nodes and connections are copied verbatim; missing settings get
/// [`default_settings`]. The input is left untouched.
pub fn normalize(doc: &WorkflowDocument) -> WorkflowDocument {
    WorkflowDocument {
        name: doc.name.clone(),
        nodes: doc.nodes.clone(),
        connections: doc.connections.clone(),
        settings: Some(doc.settings.clone().unwrap_or_else(default_settings)),
    }
}

/// The document's `explanation` string, or [`DEFAULT_EXPLANATION`].
pub fn explanation_or_default(raw: &Value) -> String {
    raw.get("explanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_EXPLANATION)
        .to_string()
}
