//! Shared fixtures for integration tests

#![allow(dead_code)]

use serde_json::{json, Value};

/// A node that passes every strict rule
pub fn node(id: &str, name: &str, kind: &str, x: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": kind,
        "typeVersion": 1,
        "position": [x, 300],
        "parameters": {}
    })
}

/// Two-node schedule -> email workflow, strictly valid
pub fn daily_email() -> Value {
    json!({
        "name": "Daily Email Reminder",
        "nodes": [
            node("schedule-trigger", "Schedule Trigger", "n8n-nodes-base.scheduleTrigger", 250),
            node("email-send", "Send Email", "n8n-nodes-base.emailSend", 450)
        ],
        "connections": {
            "Schedule Trigger": {
                "main": [[{"node": "Send Email", "type": "main", "index": 0}]]
            }
        },
        "settings": {"executionOrder": "v1"}
    })
}

/// `daily_email` without settings, plus an explanation, as a model would send it
pub fn generated_daily_email() -> Value {
    let mut doc = daily_email();
    let object = doc.as_object_mut().unwrap();
    object.remove("settings");
    object.insert(
        "explanation".into(),
        json!("Sends a reminder email every morning at 9."),
    );
    doc
}

/// Model output wrapping `doc` in a fenced block with chatter around it
pub fn fenced_reply(doc: &Value) -> String {
    format!(
        "Sure! Here is the workflow you asked for:\n\n```json\n{}\n```\n\nLet me know if you want changes.",
        serde_json::to_string_pretty(doc).unwrap()
    )
}
