//! In-memory platform for testing
//!
//! Records every call so tests can assert how often the platform was
//! contacted. Outcomes are configurable per operation.

use super::{Platform, PlatformError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub struct MockPlatform {
    base_url: String,
    next_id: AtomicUsize,
    create_calls: AtomicUsize,
    list_calls: AtomicUsize,
    /// Bodies received by `create_workflow`
    created: Mutex<Vec<Value>>,
    /// Stored workflows returned by `list_workflows`
    workflow_count: usize,
    /// When set, every call fails with this error
    failure: Option<PlatformError>,
    /// Artificial latency applied before answering
    delay: Option<Duration>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            base_url: "http://n8n.test".to_string(),
            next_id: AtomicUsize::new(1),
            create_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
            workflow_count: 0,
            failure: None,
            delay: None,
        }
    }

    /// Every call fails with `error`
    pub fn failing(error: PlatformError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_workflow_count(mut self, count: usize) -> Self {
        self.workflow_count = count;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Total number of platform calls
    pub fn call_count(&self) -> usize {
        self.create_calls() + self.list_calls()
    }

    /// Workflow bodies received so far
    pub fn created(&self) -> Vec<Value> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn settle(&self) -> Result<(), PlatformError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn name(&self) -> &str {
        "mock"
    }

    fn base_url(&self) -> Option<&str> {
        Some(&self.base_url)
    }

    async fn create_workflow(&self, workflow: &Value) -> Result<Value, PlatformError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(workflow.clone());
        self.settle().await?;

        let id = format!("wf-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut stored = workflow.clone();
        if let Some(object) = stored.as_object_mut() {
            object.insert("id".to_string(), Value::String(id));
        }
        Ok(stored)
    }

    async fn list_workflows(&self) -> Result<Value, PlatformError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.settle().await?;

        let data: Vec<Value> = (1..=self.workflow_count)
            .map(|i| json!({"id": format!("wf-{}", i), "name": format!("Workflow {}", i)}))
            .collect();
        Ok(json!({ "data": data }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_ids_and_records_body() {
        let platform = MockPlatform::new();
        let first = platform.create_workflow(&json!({"name": "A"})).await.unwrap();
        let second = platform.create_workflow(&json!({"name": "B"})).await.unwrap();

        assert_eq!(first["id"], "wf-1");
        assert_eq!(second["id"], "wf-2");
        assert_eq!(platform.create_calls(), 2);
        assert_eq!(platform.created()[1]["name"], "B");
    }

    #[tokio::test]
    async fn test_list_reports_configured_count() {
        let platform = MockPlatform::new().with_workflow_count(3);
        let listing = platform.list_workflows().await.unwrap();
        assert_eq!(listing["data"].as_array().unwrap().len(), 3);
        assert_eq!(platform.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_platform_still_counts_calls() {
        let platform = MockPlatform::failing(PlatformError::Unreachable {
            reason: "refused".into(),
        });
        assert!(platform.list_workflows().await.is_err());
        assert!(platform.create_workflow(&json!({})).await.is_err());
        assert_eq!(platform.call_count(), 2);
    }
}
