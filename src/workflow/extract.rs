//! Pull a JSON document out of free-form model output
//!
//! Models are asked for bare JSON but often wrap it in a Markdown fence or
//! add prose around it. Text that is itself a JSON object is taken as is.
//! Otherwise candidates are tried in order:
//!
//! 1. a fence labeled `json` (case-insensitive)
//! 2. any fence (a language tag on the opening line is skipped)
//! 3. the whole text
//!
//! The first candidate that parses wins. Nothing is guessed: if no
//! candidate is syntactically valid JSON the parser error of the first
//! attempt is returned.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::ExtractError;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?i:json)\b[ \t]*(.*?)```").expect("valid regex"));

static ANY_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:[A-Za-z0-9_.+-]+[ \t]*\r?\n)?(.*?)```").expect("valid regex")
});

/// Extract and parse the workflow JSON carried by `raw_text`.
pub fn extract(raw_text: &str) -> Result<Value, ExtractError> {
    // a bare object may carry fences inside its string values
    let trimmed = raw_text.trim();
    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            debug!(strategy = "bare object", "extracted workflow JSON");
            return Ok(value);
        }
    }

    let mut candidates: Vec<(&str, &str)> = Vec::with_capacity(3);
    if let Some(block) = fenced(&JSON_FENCE, raw_text) {
        candidates.push(("json fence", block));
    }
    if let Some(block) = fenced(&ANY_FENCE, raw_text) {
        if candidates.iter().all(|(_, c)| *c != block) {
            candidates.push(("generic fence", block));
        }
    }
    candidates.push(("whole text", trimmed));

    let mut first_error: Option<serde_json::Error> = None;
    for (strategy, candidate) in candidates {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => {
                debug!(strategy, "extracted workflow JSON");
                return Ok(value);
            }
            Err(e) => {
                debug!(strategy, error = %e, "candidate is not valid JSON");
                first_error.get_or_insert(e);
            }
        }
    }

    Err(ExtractError::Parse {
        details: first_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no JSON found".to_string()),
    })
}

fn fenced<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_json_fence_with_prose() {
        let text = "Here is your workflow:\n```json\n{\"name\": \"W\"}\n```\nEnjoy!";
        assert_eq!(extract(text).unwrap(), json!({"name": "W"}));
    }

    #[test]
    fn test_json_label_is_case_insensitive() {
        let text = "```JSON\n{\"a\": 1}\n```";
        assert_eq!(extract(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_prefers_json_fence_over_earlier_generic_fence() {
        let text = "```bash\ncurl localhost\n```\nthen\n```json\n{\"a\": 2}\n```";
        assert_eq!(extract(text).unwrap(), json!({"a": 2}));
    }

    #[test]
    fn test_generic_fence_skips_language_tag() {
        let text = "```javascript\n{\"a\": 3}\n```";
        assert_eq!(extract(text).unwrap(), json!({"a": 3}));
    }

    #[test]
    fn test_unlabeled_fence() {
        let text = "Result:\n```\n[1, 2, 3]\n```";
        assert_eq!(extract(text).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_inline_fence_without_newline() {
        assert_eq!(extract("```{\"a\":true}```").unwrap(), json!({"a": true}));
    }

    #[test]
    fn test_bare_json() {
        assert_eq!(
            extract("  {\"name\": \"bare\"}\n").unwrap(),
            json!({"name": "bare"})
        );
    }

    #[test]
    fn test_falls_back_to_whole_text_when_fence_is_broken() {
        // the fence content is not JSON but the text as a whole is
        let text = r#"{"note": "```not json```"}"#;
        assert_eq!(extract(text).unwrap(), json!({"note": "```not json```"}));
    }

    #[test]
    fn test_bare_object_wins_over_fence_inside_string() {
        let text = r#"{"note": "```json [1] ```"}"#;
        assert_eq!(extract(text).unwrap(), json!({"note": "```json [1] ```"}));
    }

    #[test]
    fn test_prose_wrapped_fence_still_preferred() {
        let text = "{ not quite json
```json
{\"name\": \"W\"}
```";
        assert_eq!(extract(text).unwrap(), json!({"name": "W"}));
    }

    #[test]
    fn test_no_json_anywhere() {
        let err = extract("I could not build that workflow, sorry.").unwrap_err();
        let ExtractError::Parse { details } = err;
        assert!(!details.is_empty());
    }

    #[test]
    fn test_truncated_json_is_rejected() {
        assert!(extract("```json\n{\"name\": \"W\", \"nodes\": [\n```").is_err());
    }
}
