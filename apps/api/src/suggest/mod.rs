//! AI rewrite suggestions for a single snippet.

pub mod prompts;

use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::prompts::{FIDELITY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::sections::sanitize;
use crate::suggest::prompts::SNIPPET_IMPROVE_PROMPT;

pub const SUGGESTION_COUNT: usize = 3;

const WRAPPER_KEYS: &[&str] = &["suggestions", "versions", "alternatives", "items", "data"];

/// Asks the model for rewrites of `snippet`. Returns at most [`SUGGESTION_COUNT`]
/// sanitized, distinct strings, none equal to the original.
pub async fn improve_snippet(llm: &LlmClient, snippet: &str) -> Result<Vec<String>, AppError> {
    let prompt = SNIPPET_IMPROVE_PROMPT
        .replace("{count}", &SUGGESTION_COUNT.to_string())
        .replace("{snippet}", snippet);
    let system = format!("{JSON_ONLY_SYSTEM} {FIDELITY_INSTRUCTION}");

    let value: Value = llm
        .call_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to get suggestions: {e}")))?;

    let suggestions = coerce_suggestions(&value, snippet);
    if suggestions.is_empty() {
        return Err(AppError::Llm(
            "AI response for snippet improvement is not in the expected format".to_string(),
        ));
    }
    Ok(suggestions)
}

/// Accepts a bare array of strings or one wrapped under a known (or the only) key.
pub fn coerce_suggestions(value: &Value, original: &str) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            let wrapped = WRAPPER_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_array))
                .or_else(|| map.values().find_map(Value::as_array));
            match wrapped {
                Some(items) => items,
                None => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };

    let original = sanitize(original);
    let mut out: Vec<String> = Vec::new();
    for text in items.iter().filter_map(Value::as_str) {
        let cleaned = sanitize(text);
        if cleaned.is_empty() || cleaned == original || out.contains(&cleaned) {
            continue;
        }
        out.push(cleaned);
        if out.len() == SUGGESTION_COUNT {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let value = json!(["- Led a team of 5", "Shipped X", "Cut costs 20%"]);
        assert_eq!(
            coerce_suggestions(&value, "Worked on a team"),
            vec!["Led a team of 5", "Shipped X", "Cut costs 20%"]
        );
    }

    #[test]
    fn test_wrapped_and_filtered() {
        let value = json!({"suggestions": ["Worked on a team", "", 7, "A", "A", "B", "C", "D"]});
        assert_eq!(coerce_suggestions(&value, "Worked on a team"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unknown_wrapper_key_and_garbage() {
        assert_eq!(coerce_suggestions(&json!({"rewrites": ["X"]}), "y"), vec!["X"]);
        assert!(coerce_suggestions(&json!({"text": "X"}), "y").is_empty());
        assert!(coerce_suggestions(&json!("X"), "y").is_empty());
    }
}
