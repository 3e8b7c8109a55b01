//! Utilities Module - shared infrastructure
//!
//! - `constants`: Centralized timeouts and limits

pub mod constants;

pub use constants::{
    CONNECT_TIMEOUT, DEFAULT_EXECUTION_ORDER, INFER_MAX_TOKENS, INFER_TIMEOUT, MAX_MESSAGE_CHARS,
    PLATFORM_TIMEOUT,
};
