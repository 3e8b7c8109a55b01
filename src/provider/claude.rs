//! Claude provider using Anthropic API

use super::{ChatRequest, MessageRole, Provider};
use crate::config::{FlowConfig, ENV_ANTHROPIC_API_KEY};
use crate::error::ConfigError;
use crate::util::{CONNECT_TIMEOUT, INFER_TIMEOUT};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct ClaudeProvider {
    api_key: Option<String>,
    endpoint: String,
    client: Client,
}

impl ClaudeProvider {
    /// Build the provider from configuration.
    ///
    /// A missing API key is accepted here and reported on the first call.
    pub fn new(config: &FlowConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(INFER_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("flowsmith/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: config.anthropic_api_key.clone(),
            endpoint: format!(
                "{}/v1/messages",
                config.anthropic_base_url.trim_end_matches('/')
            ),
            client,
        })
    }

    /// Resolve model aliases to full Anthropic model IDs
    fn resolve_model<'a>(&self, model: &'a str) -> &'a str {
        if model.eq_ignore_ascii_case("claude-sonnet-4-5")
            || model.eq_ignore_ascii_case("claude-sonnet")
            || model.eq_ignore_ascii_case("sonnet")
        {
            "claude-sonnet-4-5-20250929"
        } else if model.eq_ignore_ascii_case("claude-haiku") || model.eq_ignore_ascii_case("haiku")
        {
            "claude-3-5-haiku-20241022"
        }
        // Pass through if already a full model ID (case-insensitive prefix check)
        else if model
            .get(..7)
            .is_some_and(|s| s.eq_ignore_ascii_case("claude-"))
        {
            model
        } else {
            "claude-sonnet-4-5-20250929"
        }
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                };
                json!({ "role": role, "content": m.content })
            })
            .collect();

        json!({
            "model": self.resolve_model(&request.model),
            "max_tokens": request.max_tokens,
            "system": request.system,
            "messages": messages,
        })
    }
}

/// Join the text blocks of a Messages API response
fn response_text(json: &Value) -> Result<String> {
    let blocks = json["content"]
        .as_array()
        .context("Missing 'content' array in response")?;

    let text: Vec<&str> = blocks
        .iter()
        .filter(|b| b["type"].as_str().unwrap_or("text") == "text")
        .filter_map(|b| b["text"].as_str())
        .collect();

    if text.is_empty() {
        anyhow::bail!("Invalid response format from Claude API: no text content");
    }
    Ok(text.join("\n"))
}

#[async_trait]
impl Provider for ClaudeProvider {
    fn name(&self) -> &str {
        "claude"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(ConfigError::Missing {
            var: ENV_ANTHROPIC_API_KEY,
        })?;

        debug!(
            model = self.resolve_model(&request.model),
            turns = request.messages.len(),
            "sending generation request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&self.request_body(request))
            .send()
            .await
            .context("Failed to send request to Claude API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Claude API error {}: {}", status, body);
        }

        let json: Value = response
            .json()
            .await
            .context("Claude API returned a non-JSON body")?;
        response_text(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;

    fn provider() -> ClaudeProvider {
        ClaudeProvider::new(&FlowConfig::default().with_anthropic_key("sk-test")).unwrap()
    }

    #[test]
    fn test_resolve_model_aliases() {
        let p = provider();
        assert_eq!(p.resolve_model("sonnet"), "claude-sonnet-4-5-20250929");
        assert_eq!(p.resolve_model("HAIKU"), "claude-3-5-haiku-20241022");
        assert_eq!(p.resolve_model("claude-opus-4-1"), "claude-opus-4-1");
        assert_eq!(p.resolve_model("gpt-4o"), "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn test_request_body_carries_system_and_history() {
        let p = provider();
        let request = ChatRequest::new(
            "schema",
            vec![Message::user("a"), Message::assistant("b"), Message::user("c")],
            "sonnet",
        );
        let body = p.request_body(&request);
        assert_eq!(body["system"], "schema");
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["max_tokens"], 4096);
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let json = json!({
            "content": [
                {"type": "text", "text": "part one"},
                {"type": "tool_use", "id": "x", "name": "y", "input": {}},
                {"type": "text", "text": "part two"}
            ]
        });
        assert_eq!(response_text(&json).unwrap(), "part one\npart two");
        assert!(response_text(&json!({"content": []})).is_err());
        assert!(response_text(&json!({})).is_err());
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = FlowConfig::default().with_anthropic_base_url("http://127.0.0.1:9/");
        let p = ClaudeProvider::new(&config).unwrap();
        assert_eq!(p.endpoint, "http://127.0.0.1:9/v1/messages");
    }

    #[tokio::test]
    async fn test_missing_key_is_a_config_error() {
        let p = ClaudeProvider::new(&FlowConfig::default()).unwrap();
        let err = p
            .chat(&ChatRequest::new("s", vec![Message::user("x")], "sonnet"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }
}
