//! Centralized constants for flowsmith runtime configuration
//!
//! All timeout and limit values in one place for easy tuning.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════
// Collaborator Timeouts
// ═══════════════════════════════════════════════════════════════

/// Upper bound for a single n8n REST call (create, list)
pub const PLATFORM_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for LLM inference calls (workflow generation)
pub const INFER_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for establishing HTTP connections
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ═══════════════════════════════════════════════════════════════
// Limits & Defaults
// ═══════════════════════════════════════════════════════════════

/// Longest accepted chat message, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// `max_tokens` sent with every generation request
pub const INFER_MAX_TOKENS: u32 = 4096;

/// Value of `settings.executionOrder` supplied when a workflow has no settings
pub const DEFAULT_EXECUTION_ORDER: &str = "v1";

// ═══════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════
