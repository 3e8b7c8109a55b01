//! Workflow schema validation
//!
//! One rule set, two strictness levels:
//!
//! | Rule | Lenient (after generation) | Strict (before submission) |
//! |------|:--:|:--:|
//! | `name` non-empty string | ✓ | ✓ |
//! | `nodes` array | ✓ | ✓ |
//! | at least one node | | ✓ |
//! | per-node id/name/type/position/typeVersion | ✓ | ✓ |
//! | per-node `parameters` object | | ✓ |
//! | unique node ids and names | | ✓ |
//! | `connections` object | ✓ | ✓ |
//! | connections reference existing nodes | | ✓ |
//! | `settings` object | | ✓ |
//!
//! Every rule runs; violations accumulate in discovery order.

use std::collections::HashSet;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use super::document::ConnectionTarget;

/// How much of the rule set to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Structural sanity right after generation
    #[default]
    Lenient,
    /// Full check right before the document leaves the process
    Strict,
}

impl Strictness {
    fn is_strict(self) -> bool {
        self == Strictness::Strict
    }
}

/// Node position in the document, with its display name when it has one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub index: usize,
    pub name: Option<String>,
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Node {} ({})", self.index, name),
            None => write!(f, "Node {}", self.index),
        }
    }
}

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Invalid or missing workflow name")]
    InvalidName,

    #[error("Missing or invalid nodes array")]
    InvalidNodes,

    #[error("Workflow must have at least one node")]
    NoNodes,

    #[error("{node}: not an object")]
    NodeNotObject { node: NodeRef },

    #[error("{node}: missing {field}")]
    MissingNodeField { node: NodeRef, field: &'static str },

    #[error("{node}: invalid {field} (must be a string)")]
    NonStringNodeField { node: NodeRef, field: &'static str },

    #[error("{node}: invalid position (must be [x, y] array)")]
    InvalidPosition { node: NodeRef },

    #[error("{node}: missing typeVersion")]
    MissingTypeVersion { node: NodeRef },

    #[error("{node}: invalid typeVersion (must be a non-negative number)")]
    InvalidTypeVersion { node: NodeRef },

    #[error("{node}: missing parameters")]
    MissingParameters { node: NodeRef },

    #[error("{node}: invalid parameters (must be an object)")]
    InvalidParameters { node: NodeRef },

    #[error("Duplicate node id '{id}'")]
    DuplicateNodeId { id: String },

    #[error("Duplicate node name '{name}'")]
    DuplicateNodeName { name: String },

    #[error("Missing or invalid connections object")]
    InvalidConnections,

    #[error("Connection source '{source_node}' does not match any node")]
    UnknownConnectionSource { source_node: String },

    #[error("Connection '{source_node}' -> '{target_node}': target node does not exist")]
    UnknownConnectionTarget {
        source_node: String,
        target_node: String,
    },

    #[error("Connection '{source_node}': malformed output list")]
    MalformedConnection { source_node: String },

    #[error("Missing or invalid settings object")]
    InvalidSettings,
}

/// Ordered list of violations; valid when empty.
///
/// Serializes as `{"valid": bool, "errors": [string]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Human-readable messages, in discovery order
    pub fn errors(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors())?;
        state.end()
    }
}

/// Validate a candidate workflow document.
///
/// Pure: the input is only read.
pub fn validate(doc: &Value, strictness: Strictness) -> ValidationResult {
    let mut result = ValidationResult::default();

    check_name(doc, &mut result);
    let nodes = check_nodes(doc, strictness, &mut result);
    let connections = check_connections(doc, &mut result);

    if strictness.is_strict() {
        if let (Some(nodes), Some(connections)) = (nodes, connections) {
            check_references(nodes, connections, &mut result);
        }
        check_settings(doc, &mut result);
    }

    result
}

fn check_name(doc: &Value, result: &mut ValidationResult) {
    let ok = doc
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !ok {
        result.push(Violation::InvalidName);
    }
}

fn check_nodes<'a>(
    doc: &'a Value,
    strictness: Strictness,
    result: &mut ValidationResult,
) -> Option<&'a Vec<Value>> {
    let Some(nodes) = doc.get("nodes").and_then(Value::as_array) else {
        result.push(Violation::InvalidNodes);
        return None;
    };

    if strictness.is_strict() && nodes.is_empty() {
        result.push(Violation::NoNodes);
    }

    for (index, node) in nodes.iter().enumerate() {
        check_node(index, node, strictness, result);
    }

    if strictness.is_strict() {
        check_duplicates(nodes, result);
    }

    Some(nodes)
}

fn check_node(index: usize, node: &Value, strictness: Strictness, result: &mut ValidationResult) {
    let Some(obj) = node.as_object() else {
        result.push(Violation::NodeNotObject {
            node: NodeRef { index, name: None },
        });
        return;
    };

    let node_ref = NodeRef {
        index,
        name: non_empty_str(obj, "name").map(String::from),
    };

    for field in ["id", "name", "type"] {
        match obj.get(field) {
            None | Some(Value::Null) => result.push(Violation::MissingNodeField {
                node: node_ref.clone(),
                field,
            }),
            Some(Value::String(s)) if s.is_empty() => result.push(Violation::MissingNodeField {
                node: node_ref.clone(),
                field,
            }),
            Some(Value::String(_)) => {}
            Some(_) => result.push(Violation::NonStringNodeField {
                node: node_ref.clone(),
                field,
            }),
        }
    }

    if !is_position(obj.get("position")) {
        result.push(Violation::InvalidPosition {
            node: node_ref.clone(),
        });
    }

    // 0 is a valid version; only an absent key counts as missing
    match obj.get("typeVersion") {
        None => result.push(Violation::MissingTypeVersion {
            node: node_ref.clone(),
        }),
        Some(v) if v.as_f64().is_some_and(|n| n >= 0.0) => {}
        Some(_) => result.push(Violation::InvalidTypeVersion {
            node: node_ref.clone(),
        }),
    }

    if strictness.is_strict() {
        match obj.get("parameters") {
            None | Some(Value::Null) => {
                result.push(Violation::MissingParameters { node: node_ref })
            }
            Some(Value::Object(_)) => {}
            Some(_) => result.push(Violation::InvalidParameters { node: node_ref }),
        }
    }
}

fn is_position(value: Option<&Value>) -> bool {
    match value.and_then(Value::as_array) {
        Some(pair) => pair.len() == 2 && pair.iter().all(Value::is_number),
        None => false,
    }
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn check_duplicates(nodes: &[Value], result: &mut ValidationResult) {
    let mut seen_ids = HashSet::new();
    let mut reported_ids = HashSet::new();
    let mut seen_names = HashSet::new();
    let mut reported_names = HashSet::new();

    for obj in nodes.iter().filter_map(Value::as_object) {
        if let Some(id) = non_empty_str(obj, "id") {
            if !seen_ids.insert(id) && reported_ids.insert(id) {
                result.push(Violation::DuplicateNodeId { id: id.to_string() });
            }
        }
        if let Some(name) = non_empty_str(obj, "name") {
            if !seen_names.insert(name) && reported_names.insert(name) {
                result.push(Violation::DuplicateNodeName {
                    name: name.to_string(),
                });
            }
        }
    }
}

fn check_connections<'a>(
    doc: &'a Value,
    result: &mut ValidationResult,
) -> Option<&'a Map<String, Value>> {
    let connections = doc.get("connections").and_then(Value::as_object);
    if connections.is_none() {
        result.push(Violation::InvalidConnections);
    }
    connections
}

/// Every connection source and target must name an existing node.
fn check_references(
    nodes: &[Value],
    connections: &Map<String, Value>,
    result: &mut ValidationResult,
) {
    let names: HashSet<&str> = nodes
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|obj| non_empty_str(obj, "name"))
        .collect();

    for (source, fan_out) in connections {
        if !names.contains(source.as_str()) {
            result.push(Violation::UnknownConnectionSource {
                source_node: source.clone(),
            });
        }

        let Some(targets) = ConnectionTarget::parse_fan_out(fan_out) else {
            result.push(Violation::MalformedConnection {
                source_node: source.clone(),
            });
            continue;
        };

        let mut reported = HashSet::new();
        for target in targets {
            if !names.contains(target.node.as_str()) && reported.insert(target.node.clone()) {
                result.push(Violation::UnknownConnectionTarget {
                    source_node: source.clone(),
                    target_node: target.node,
                });
            }
        }
    }
}

fn check_settings(doc: &Value, result: &mut ValidationResult) {
    if !doc.get("settings").is_some_and(Value::is_object) {
        result.push(Violation::InvalidSettings);
    }
}
