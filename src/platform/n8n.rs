//! n8n client using the public REST API

use super::{Platform, PlatformError};
use crate::config::{FlowConfig, ENV_N8N_API_KEY, ENV_N8N_URL};
use crate::error::ConfigError;
use crate::util::{CONNECT_TIMEOUT, PLATFORM_TIMEOUT};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, error};

const API_KEY_HEADER: &str = "X-N8N-API-KEY";

pub struct N8nClient {
    base_url: Option<String>,
    api_key: Option<String>,
    /// Parse error of `N8N_URL`, reported on first use
    url_error: Option<ConfigError>,
    client: Client,
}

impl N8nClient {
    /// Build the client from configuration.
    ///
    /// Missing or malformed settings are reported by the first request.
    pub fn new(config: &FlowConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(PLATFORM_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("flowsmith/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let (base_url, url_error) = match config.require_n8n_url() {
            Ok(_) => (
                config
                    .n8n_url
                    .as_deref()
                    .map(|u| u.trim_end_matches('/').to_string()),
                None,
            ),
            Err(e) => (None, Some(e)),
        };

        Ok(Self {
            base_url,
            api_key: config.n8n_api_key.clone(),
            url_error,
            client,
        })
    }

    /// `(workflows endpoint, api key)` or the configuration error
    fn target(&self) -> Result<(String, &str), PlatformError> {
        if let Some(e) = &self.url_error {
            return Err(e.clone().into());
        }
        let base = self
            .base_url
            .as_deref()
            .ok_or(ConfigError::Missing { var: ENV_N8N_URL })?;
        let key = self
            .api_key
            .as_deref()
            .ok_or(ConfigError::Missing {
                var: ENV_N8N_API_KEY,
            })?;
        Ok((format!("{}/api/v1/workflows", base), key))
    }
}

fn transport_error(e: reqwest::Error) -> PlatformError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        PlatformError::Unreachable {
            reason: e.to_string(),
        }
    } else {
        PlatformError::Other {
            message: e.to_string(),
        }
    }
}

/// Decode a response, turning non-success statuses into `Rejected`.
///
/// The rejection message is the body's `message` field when present, the
/// canonical status reason otherwise.
async fn read_json(response: Response) -> Result<Value, PlatformError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        error!(status = status.as_u16(), message = %message, "n8n API error");
        return Err(PlatformError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| PlatformError::Other {
        message: format!("n8n returned a non-JSON body: {}", e),
    })
}

#[async_trait]
impl Platform for N8nClient {
    fn name(&self) -> &str {
        "n8n"
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    async fn create_workflow(&self, workflow: &Value) -> Result<Value, PlatformError> {
        let (endpoint, key) = self.target()?;
        debug!(endpoint = %endpoint, "creating workflow");

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, key)
            .json(workflow)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn list_workflows(&self) -> Result<Value, PlatformError> {
        let (endpoint, key) = self.target()?;
        debug!(endpoint = %endpoint, "listing workflows");

        let response = self
            .client
            .get(&endpoint)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}
