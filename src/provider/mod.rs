//! # Provider Abstraction Layer
//!
//! The generation collaborator: turns a conversation into model text.
//!
//! - [`Provider`] - Core trait, one async chat round-trip
//! - [`ClaudeProvider`] - Production provider using the Anthropic Messages API
//! - [`MockProvider`] - Test provider with queued responses and request recording
//!
//! Providers return `anyhow::Result`; the orchestrator converts failures
//! into [`GenerationError`](crate::error::GenerationError). A missing API key
//! is reported as a [`ConfigError`](crate::error::ConfigError) inside the
//! `anyhow::Error` so callers can tell it apart from network faults.

mod claude;
mod mock;

pub use claude::ClaudeProvider;
pub use mock::MockProvider;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::util::INFER_MAX_TOKENS;

/// Default model for generation
pub const CLAUDE_DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: text.into(),
        }
    }
}

/// A complete request to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System instruction (schema and output contract)
    pub system: String,

    /// Prior turns followed by the new user turn
    pub messages: Vec<Message>,

    /// Model identifier or alias
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(
        system: impl Into<String>,
        messages: Vec<Message>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            messages,
            model: model.into(),
            max_tokens: INFER_MAX_TOKENS,
        }
    }

    /// Text of the last user turn, if any
    #[cfg(test)]
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// LLM provider abstraction for workflow generation
///
/// # Example
/// ```rust,ignore
/// let provider = ClaudeProvider::new(&config)?;
/// let request = ChatRequest::new(SYSTEM_PROMPT, messages, "claude-sonnet-4-5");
/// let text = provider.chat(&request).await?;
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Execute one chat round-trip and return the assistant's text
    async fn chat(&self, request: &ChatRequest) -> Result<String>;

    /// Get the provider name (e.g., "claude", "mock")
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");

        let parsed: Message =
            serde_json::from_value(serde_json::json!({"role": "user", "content": "x"})).unwrap();
        assert_eq!(parsed, Message::user("x"));
    }

    #[test]
    fn test_last_user_text() {
        let request = ChatRequest::new(
            "sys",
            vec![
                Message::user("first"),
                Message::assistant("ok"),
                Message::user("second"),
            ],
            CLAUDE_DEFAULT_MODEL,
        );
        assert_eq!(request.last_user_text(), Some("second"));
        assert_eq!(request.max_tokens, INFER_MAX_TOKENS);
    }
}
