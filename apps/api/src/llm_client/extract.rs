//! Recovery of a single JSON object embedded in free-form model output.
//!
//! Pass 1 is the greedy scan: the substring from the first `{` to the last `}`.
//! Pass 2 only runs when pass 1 fails to parse: a balanced-brace scan that
//! tracks depth and string literals and yields each top-level object in order.
//! Anything pass 1 accepts is returned unchanged.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No JSON found in response")]
    NoJsonObject,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Extracts and parses the JSON object embedded in `text`.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractError> {
    let greedy = greedy_span(text).ok_or(ExtractError::NoJsonObject)?;

    let greedy_err = match serde_json::from_str::<Value>(greedy) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    balanced_spans(text)
        .into_iter()
        .find_map(|span| serde_json::from_str::<Value>(span).ok())
        .ok_or(ExtractError::Parse(greedy_err))
}

/// First `{` through last `}`, if the last closing brace follows the first opening one.
fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Top-level brace-balanced spans, ignoring braces inside JSON string literals.
fn balanced_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate() {
        if depth == 0 {
            if b == b'{' {
                depth = 1;
                start = i;
                in_string = false;
                escaped = false;
            }
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    spans
}
