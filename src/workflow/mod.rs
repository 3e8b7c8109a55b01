//! Workflow documents: extraction, validation, normalization, preview
//!
//! ```text
//! raw model text ──► extract ──► serde_json::Value ──► validate(Strictness)
//!                                       │
//!                                       ▼
//!                         WorkflowDocument::from_value ──► normalize ──► canonical
//! ```
//!
//! Documents stay close to the n8n wire shape: nodes are kept as raw JSON
//! objects so platform-specific fields pass through untouched, with
//! [`NodeSpec`] and [`ConnectionTarget`] as typed read-only views.

mod document;
pub mod extract;
pub mod normalize;
pub mod preview;
pub mod validate;

pub use document::{ConnectionTarget, GeneratedWorkflow, MissingField, NodeSpec, WorkflowDocument};
pub use extract::extract;
pub use normalize::{default_settings, explanation_or_default, normalize, DEFAULT_EXPLANATION};
pub use preview::render_preview;
pub use validate::{validate, NodeRef, Strictness, ValidationResult, Violation};
