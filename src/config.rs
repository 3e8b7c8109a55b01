//! flowsmith Configuration Module
//!
//! Resolves collaborator credentials and addresses once, at process start,
//! into an explicit [`FlowConfig`] that is handed to the collaborators.
//!
//! ## Sources (highest to lowest)
//!
//! 1. Environment variables
//! 2. `.env` file in the working directory (loaded by the binary via `dotenvy`)
//! 3. Defaults
//!
//! Missing credentials are not an error here. They surface as
//! [`ConfigError::Missing`] the first time the collaborator that needs them
//! is invoked.

use url::Url;

use crate::error::ConfigError;
use crate::provider::CLAUDE_DEFAULT_MODEL;

pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_ANTHROPIC_BASE_URL: &str = "ANTHROPIC_BASE_URL";
pub const ENV_MODEL: &str = "FLOWSMITH_MODEL";
pub const ENV_N8N_URL: &str = "N8N_URL";
pub const ENV_N8N_API_KEY: &str = "N8N_API_KEY";

/// Public Anthropic endpoint
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Read-only configuration shared by the collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    /// Anthropic API key (sk-ant-...)
    pub anthropic_api_key: Option<String>,

    /// Base address of the Messages API, overridable for proxies and tests
    pub anthropic_base_url: String,

    /// Model used for generation
    pub model: String,

    /// n8n base address, e.g. `http://localhost:5678`
    pub n8n_url: Option<String>,

    /// n8n public API key (sent as `X-N8N-API-KEY`)
    pub n8n_api_key: Option<String>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            anthropic_base_url: ANTHROPIC_BASE_URL.to_string(),
            model: CLAUDE_DEFAULT_MODEL.to_string(),
            n8n_url: None,
            n8n_api_key: None,
        }
    }
}

impl FlowConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve configuration through an arbitrary lookup function.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            anthropic_api_key: get(ENV_ANTHROPIC_API_KEY),
            anthropic_base_url: get(ENV_ANTHROPIC_BASE_URL).unwrap_or(defaults.anthropic_base_url),
            model: get(ENV_MODEL).unwrap_or(defaults.model),
            n8n_url: get(ENV_N8N_URL),
            n8n_api_key: get(ENV_N8N_API_KEY),
        }
    }

    pub fn with_anthropic_key(mut self, key: impl Into<String>) -> Self {
        self.anthropic_api_key = Some(key.into());
        self
    }

    pub fn with_anthropic_base_url(mut self, url: impl Into<String>) -> Self {
        self.anthropic_base_url = url.into();
        self
    }

    pub fn with_n8n(mut self, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.n8n_url = Some(url.into());
        self.n8n_api_key = Some(api_key.into());
        self
    }

    /// Parsed n8n base address
    ///
    /// Must be an absolute `http` or `https` URL.
    pub fn require_n8n_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .n8n_url
            .as_deref()
            .ok_or(ConfigError::Missing { var: ENV_N8N_URL })?;

        let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
            var: ENV_N8N_URL,
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Invalid {
                var: ENV_N8N_URL,
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }
}

/// Mask an API key for display
///
/// Shows first N chars + asterisks, e.g. "sk-ant-api03-***"
pub fn mask_api_key(key: &str, visible_chars: usize) -> String {
    if key.is_empty() {
        return String::new();
    }

    let visible = key
        .char_indices()
        .nth(visible_chars)
        .map(|(i, _)| i)
        .unwrap_or(key.len());
    format!("{}***", &key[..visible])
}
