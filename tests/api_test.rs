//! Request validation and reply shapes of the api handlers

mod common;

use std::sync::Arc;

use common::{daily_email, generated_daily_email};
use flowsmith::api::{self, CreateRequest, GenerateRequest, Status};
use flowsmith::provider::Message;
use flowsmith::{MockPlatform, MockProvider, Orchestrator, PlatformError};
use pretty_assertions::assert_eq;
use serde_json::json;

fn setup(
    provider: MockProvider,
    platform: MockPlatform,
) -> (Orchestrator, Arc<MockProvider>, Arc<MockPlatform>) {
    let provider = Arc::new(provider);
    let platform = Arc::new(platform);
    let orchestrator = Orchestrator::new(provider.clone(), platform.clone(), "mock");
    (orchestrator, provider, platform)
}

// =============================================================================
// GENERATE
// =============================================================================

#[tokio::test]
async fn test_blank_message_is_rejected_without_calling_provider() {
    let (orchestrator, provider, _) = setup(MockProvider::new(), MockPlatform::new());

    for message in [json!(""), json!("   \n\t"), json!(null), json!(12)] {
        let request: GenerateRequest =
            serde_json::from_value(json!({ "message": message })).unwrap();
        let reply = api::generate(&orchestrator, &request).await;

        assert_eq!(reply.status, Status::BadRequest);
        assert_eq!(
            reply.to_json(),
            json!({
                "success": false,
                "error": "Invalid request",
                "details": "Message is required and must be a non-empty string"
            })
        );
    }
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_overlong_message_is_rejected_without_calling_provider() {
    let (orchestrator, provider, _) = setup(MockProvider::new(), MockPlatform::new());

    let reply = api::generate(&orchestrator, &GenerateRequest::new("x".repeat(2001))).await;
    assert_eq!(reply.status, Status::BadRequest);
    assert_eq!(
        reply.to_json(),
        json!({
            "success": false,
            "error": "Message too long",
            "details": "Message must be less than 2000 characters"
        })
    );
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_generate_success_shape() {
    let (orchestrator, provider, _) = setup(
        MockProvider::with_responses([generated_daily_email().to_string()]),
        MockPlatform::new(),
    );

    let request = GenerateRequest::new("  email me  ")
        .with_history(vec![Message::user("hi"), Message::assistant("hello")]);
    let reply = api::generate(&orchestrator, &request).await;

    assert_eq!(reply.status.code(), 200);
    let body = reply.to_json();
    assert_eq!(body["success"], true);
    assert_eq!(body["workflow"]["settings"]["executionOrder"], "v1");
    assert!(body["workflow"].get("explanation").is_none());
    assert_eq!(body["explanation"], "Sends a reminder email every morning at 9.");

    let sent = provider.last_request().unwrap();
    assert_eq!(sent.messages.len(), 3);
    assert!(sent.messages[2].content.contains("for: email me\n"));
}

#[tokio::test]
async fn test_generate_failure_is_server_error() {
    let (orchestrator, _, _) = setup(
        MockProvider::with_responses(["no json here"]),
        MockPlatform::new(),
    );

    let reply = api::generate(&orchestrator, &GenerateRequest::new("anything")).await;
    assert_eq!(reply.status, Status::ServerError);
    let body = reply.to_json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to generate workflow");
    assert!(body["details"].as_str().unwrap().contains("parse"));
}

// =============================================================================
// CREATE
// =============================================================================

#[tokio::test]
async fn test_create_requires_workflow_object() {
    let (orchestrator, _, platform) = setup(MockProvider::new(), MockPlatform::new());

    for body in [json!({}), json!({"workflow": "text"}), json!({"workflow": [1, 2]})] {
        let request: CreateRequest = serde_json::from_value(body).unwrap();
        let reply = api::create(&orchestrator, &request).await;
        assert_eq!(reply.status, Status::BadRequest);
        assert_eq!(
            reply.to_json(),
            json!({
                "success": false,
                "error": "Invalid request",
                "details": "Workflow object is required"
            })
        );
    }
    assert_eq!(platform.call_count(), 0);
}

#[tokio::test]
async fn test_create_success_shape() {
    let (orchestrator, _, _) = setup(
        MockProvider::new(),
        MockPlatform::new().with_base_url("https://n8n.example.com"),
    );

    let reply = api::create(
        &orchestrator,
        &CreateRequest {
            workflow: daily_email(),
        },
    )
    .await;

    assert!(reply.is_success());
    let body = reply.to_json();
    assert_eq!(body["success"], true);
    assert_eq!(body["workflowId"], "wf-1");
    assert_eq!(body["url"], "https://n8n.example.com/workflow/wf-1");
    assert_eq!(body["data"]["id"], "wf-1");
}

#[tokio::test]
async fn test_create_validation_errors_are_joined() {
    let (orchestrator, _, platform) = setup(MockProvider::new(), MockPlatform::new());
    let mut workflow = daily_email();
    workflow["nodes"][0]["position"] = json!([300]);
    workflow["nodes"][1].as_object_mut().unwrap().remove("typeVersion");

    let reply = api::create(&orchestrator, &CreateRequest { workflow }).await;
    assert_eq!(reply.status, Status::BadRequest);
    assert_eq!(
        reply.to_json(),
        json!({
            "success": false,
            "error": "Invalid workflow structure",
            "details": "Node 0 (Schedule Trigger): invalid position (must be [x, y] array); Node 1 (Send Email): missing typeVersion"
        })
    );
    assert_eq!(platform.call_count(), 0);
}

#[tokio::test]
async fn test_create_unreachable_platform() {
    let (orchestrator, _, _) = setup(
        MockProvider::new(),
        MockPlatform::failing(PlatformError::Unreachable {
            reason: "timed out".into(),
        }),
    );

    let reply = api::create(
        &orchestrator,
        &CreateRequest {
            workflow: daily_email(),
        },
    )
    .await;
    assert_eq!(reply.status, Status::ServerError);
    assert_eq!(reply.to_json()["error"], "Cannot connect to n8n");
}

// =============================================================================
// TEST CONNECTION
// =============================================================================

#[tokio::test]
async fn test_unreachable_connection_report() {
    let (orchestrator, _, _) = setup(
        MockProvider::new(),
        MockPlatform::failing(PlatformError::Unreachable {
            reason: "refused".into(),
        }),
    );

    let reply = api::test_connection(&orchestrator).await;
    assert_eq!(
        reply.to_json(),
        json!({
            "success": false,
            "connected": false,
            "error": "Cannot reach n8n",
            "details": "Please check if N8N_URL is correct and n8n is accessible."
        })
    );
}
