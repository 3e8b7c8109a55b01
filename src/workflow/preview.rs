//! Plain-text preview of a workflow, for the chat front end

use std::fmt::Write;

use serde_json::Value;

use super::document::WorkflowDocument;

/// Render a short summary: name, explanation, counts, nodes and edges.
pub fn render_preview(doc: &WorkflowDocument, explanation: Option<&str>) -> String {
    let mut out = String::new();

    // write! into a String cannot fail
    let _ = writeln!(out, "Workflow: {}", doc.name);
    if let Some(text) = explanation.filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "{}", text);
    }
    let _ = writeln!(
        out,
        "Nodes: {} | Connections: {}",
        doc.nodes.len(),
        doc.connections.len()
    );

    for node in &doc.nodes {
        let name = node
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("(unnamed)");
        match node.get("type").and_then(Value::as_str) {
            Some(kind) => {
                let _ = writeln!(out, "  • {} [{}]", name, kind);
            }
            None => {
                let _ = writeln!(out, "  • {}", name);
            }
        }
    }

    let edges = doc.edges();
    if !edges.is_empty() {
        let _ = writeln!(out, "Flow:");
        for (source, target) in edges {
            let _ = writeln!(out, "  {} → {}", source, target.node);
        }
    }

    out
}
