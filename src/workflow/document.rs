//! Workflow document model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// First required top-level field found missing on a generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Name,
    Nodes,
    Connections,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingField::Name => write!(f, "name"),
            MissingField::Nodes => write!(f, "nodes"),
            MissingField::Connections => write!(f, "connections"),
        }
    }
}

/// A workflow in n8n's import shape.
///
/// `settings` is optional until [`normalize`](super::normalize) fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub name: String,
    pub nodes: Vec<Value>,
    pub connections: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

impl WorkflowDocument {
    /// Lift a candidate JSON value into a document.
    ///
    /// Requires a non-empty `name` string, a `nodes` array and a
    /// `connections` object, and reports the first one missing. A `settings`
    /// value that is not an object is dropped.
    pub fn from_value(value: &Value) -> Result<Self, MissingField> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(MissingField::Name)?;
        let nodes = value
            .get("nodes")
            .and_then(Value::as_array)
            .ok_or(MissingField::Nodes)?;
        let connections = value
            .get("connections")
            .and_then(Value::as_object)
            .ok_or(MissingField::Connections)?;

        Ok(Self {
            name: name.to_string(),
            nodes: nodes.clone(),
            connections: connections.clone(),
            settings: value.get("settings").and_then(Value::as_object).cloned(),
        })
    }

    /// JSON form, as sent to the platform (without `active`)
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("name".into(), Value::String(self.name.clone()));
        object.insert("nodes".into(), Value::Array(self.nodes.clone()));
        object.insert("connections".into(), Value::Object(self.connections.clone()));
        if let Some(settings) = &self.settings {
            object.insert("settings".into(), Value::Object(settings.clone()));
        }
        Value::Object(object)
    }

    /// Typed views of every node that is well-formed
    pub fn node_specs(&self) -> Vec<NodeSpec> {
        self.nodes.iter().filter_map(NodeSpec::from_value).collect()
    }

    /// `(source, target)` pairs for every well-formed connection entry
    pub fn edges(&self) -> Vec<(&str, ConnectionTarget)> {
        self.connections
            .iter()
            .filter_map(|(source, fan_out)| {
                ConnectionTarget::parse_fan_out(fan_out).map(|targets| (source.as_str(), targets))
            })
            .flat_map(|(source, targets)| targets.into_iter().map(move |t| (source, t)))
            .collect()
    }
}

/// Typed view over one node object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub type_version: f64,
    pub position: [f64; 2],
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl NodeSpec {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

fn default_connection_type() -> String {
    "main".to_string()
}

/// One downstream reference inside a source node's fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(rename = "type", default = "default_connection_type")]
    pub kind: String,
    pub index: u32,
}

impl ConnectionTarget {
    pub fn new(node: impl Into<String>, index: u32) -> Self {
        Self {
            node: node.into(),
            kind: default_connection_type(),
            index,
        }
    }

    /// Flatten a source's fan-out (`{"main": [[target, ...], ...]}`).
    ///
    /// `null` output slots are allowed (unconnected outputs). Returns `None`
    /// when any part of the structure is malformed.
    pub fn parse_fan_out(fan_out: &Value) -> Option<Vec<ConnectionTarget>> {
        let mut targets = Vec::new();
        for outputs in fan_out.as_object()?.values() {
            for slot in outputs.as_array()? {
                if slot.is_null() {
                    continue;
                }
                for target in slot.as_array()? {
                    targets.push(serde_json::from_value(target.clone()).ok()?);
                }
            }
        }
        Some(targets)
    }
}

/// Result of one generation round-trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedWorkflow {
    /// Canonical document, settings filled in
    pub workflow: WorkflowDocument,
    /// Document exactly as extracted from the model output
    #[serde(skip)]
    pub original: Value,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reports_first_missing_field() {
        assert_eq!(
            WorkflowDocument::from_value(&json!({"nodes": [], "connections": {}})),
            Err(MissingField::Name)
        );
        assert_eq!(
            WorkflowDocument::from_value(&json!({"name": "W", "connections": {}})),
            Err(MissingField::Nodes)
        );
        assert_eq!(
            WorkflowDocument::from_value(&json!({"name": "W", "nodes": []})),
            Err(MissingField::Connections)
        );
        assert_eq!(
            WorkflowDocument::from_value(&json!({"name": "", "nodes": [], "connections": {}})),
            Err(MissingField::Name)
        );
    }

    #[test]
    fn test_from_value_keeps_unknown_node_fields() {
        let doc = WorkflowDocument::from_value(&json!({
            "name": "W",
            "nodes": [{"id": "a", "name": "A", "credentials": {"smtp": {"id": "1"}}}],
            "connections": {},
            "settings": "bogus"
        }))
        .unwrap();

        assert_eq!(doc.nodes[0]["credentials"]["smtp"]["id"], "1");
        assert!(doc.settings.is_none());
    }

    #[test]
    fn test_to_value_omits_absent_settings() {
        let doc = WorkflowDocument::from_value(&json!({
            "name": "W", "nodes": [], "connections": {}
        }))
        .unwrap();
        let value = doc.to_value();
        assert!(value.get("settings").is_none());
        assert_eq!(value["name"], "W");
    }

    #[test]
    fn test_node_spec_accepts_integer_numbers() {
        let spec = NodeSpec::from_value(&json!({
            "id": "a", "name": "A", "type": "n8n-nodes-base.set",
            "typeVersion": 0, "position": [250, 300], "parameters": {}
        }))
        .unwrap();
        assert_eq!(spec.type_version, 0.0);
        assert_eq!(spec.position, [250.0, 300.0]);
    }

    #[test]
    fn test_node_spec_rejects_short_position() {
        assert!(NodeSpec::from_value(&json!({
            "id": "a", "name": "A", "type": "t", "typeVersion": 1, "position": [300]
        }))
        .is_none());
    }

    #[test]
    fn test_parse_fan_out() {
        let targets = ConnectionTarget::parse_fan_out(&json!({
            "main": [[{"node": "B", "type": "main", "index": 0}], null, [{"node": "C", "index": 1}]]
        }))
        .unwrap();
        assert_eq!(
            targets,
            vec![ConnectionTarget::new("B", 0), ConnectionTarget::new("C", 1)]
        );

        assert!(ConnectionTarget::parse_fan_out(&json!({"main": [{"node": "B"}]})).is_none());
        assert!(ConnectionTarget::parse_fan_out(&json!([])).is_none());
    }

    #[test]
    fn test_edges_flatten_connections() {
        let doc = WorkflowDocument::from_value(&json!({
            "name": "W",
            "nodes": [],
            "connections": {
                "A": {"main": [[
                    {"node": "B", "type": "main", "index": 0},
                    {"node": "C", "type": "main", "index": 0}
                ]]}
            }
        }))
        .unwrap();
        let edges = doc.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].0, "A");
        assert_eq!(edges[1].1.node, "C");
    }
}
