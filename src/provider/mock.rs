//! Mock provider for testing
//!
//! Returns configurable responses without making real API calls.
//! Essential for unit tests and CI pipelines.

use super::{ChatRequest, Provider};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Mock provider that returns predefined responses
pub struct MockProvider {
    /// Queue of outcomes to return (FIFO); `Err` simulates a provider fault
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    /// Returned when the queue is empty
    default_response: String,
    /// Track all requests made (for assertions)
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with a fixed default response
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: "Mock response".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create with a queue of responses
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for response in responses {
            provider.queue_response(response);
        }
        provider
    }

    /// Set the default response when queue is empty
    pub fn with_default(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Add a response to the queue
    pub fn queue_response(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(response.into()));
    }

    /// Add a simulated failure to the queue
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(message.into()));
    }

    /// Get all requests made to this provider
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Get the last request made
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;

    fn request(text: &str) -> ChatRequest {
        ChatRequest::new("system", vec![Message::user(text)], "mock-v1")
    }

    #[tokio::test]
    async fn test_mock_default_response() {
        let provider = MockProvider::new();
        let response = provider.chat(&request("Hello")).await.unwrap();
        assert_eq!(response, "Mock response");
    }

    #[tokio::test]
    async fn test_mock_queued_responses() {
        let provider = MockProvider::with_responses(["First response", "Second response"]);

        assert_eq!(provider.chat(&request("a")).await.unwrap(), "First response");
        assert_eq!(provider.chat(&request("b")).await.unwrap(), "Second response");
        assert_eq!(provider.chat(&request("c")).await.unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn test_mock_queued_failure() {
        let provider = MockProvider::new();
        provider.queue_failure("rate limited");

        let err = provider.chat(&request("a")).await.unwrap_err();
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let provider = MockProvider::new().with_default("Custom default");

        provider.chat(&request("First prompt")).await.unwrap();
        provider.chat(&request("Second prompt")).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].last_user_text(), Some("Second prompt"));
        assert_eq!(
            provider.last_request().unwrap().last_user_text(),
            Some("Second prompt")
        );
    }
}
