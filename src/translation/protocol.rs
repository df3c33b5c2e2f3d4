/*!
 * Batch prompt protocol for LLM-backed providers.
 *
 * A batch is sent as a JSON array of strings and the model is asked to answer
 * with a JSON array of the same length. Models tend to wrap the answer in
 * prose or Markdown fences, so the parser digs the array out of the reply.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::language_utils;

// @const: Fenced code block, optionally tagged as json
static CODE_FENCE_REGEX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").ok());

/// System message for a batch request
pub fn system_prompt(source_language: &str, target_language: &str) -> String {
    format!(
        "You are a professional subtitle translator. Translate each string from {} to {}. \
Keep the meaning and tone, keep line breaks inside a string, and do not merge or split strings. \
Answer with a JSON array of exactly as many strings as you receive, in the same order, and nothing else.",
        language_utils::prompt_language_name(source_language),
        language_utils::prompt_language_name(target_language)
    )
}

/// User message carrying the lines of one batch
pub fn user_prompt(texts: &[String]) -> String {
    // Serializing a slice of strings cannot fail
    let payload = serde_json::to_string(texts).unwrap_or_else(|_| "[]".to_string());
    format!("Translate these {} subtitle lines:\n{}", texts.len(), payload)
}

/// Extract the translated strings from a model reply
///
/// Accepts a bare array, an array inside a code fence or surrounding prose, or
/// an object holding the array under any key.
pub fn parse_batch_response(raw: &str) -> Result<Vec<String>, ProviderError> {
    let fenced = CODE_FENCE_REGEX
        .as_ref()
        .and_then(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    for candidate in fenced.into_iter().chain(std::iter::once(raw)) {
        if let Some(lines) = parse_candidate(candidate.trim()) {
            return Ok(lines);
        }
    }

    let preview: String = raw.chars().take(200).collect();
    Err(ProviderError::ParseError(format!("No JSON string array in response: {}", preview)))
}

fn parse_candidate(text: &str) -> Option<Vec<String>> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if let Some(lines) = array_from_value(&value) {
            return Some(lines);
        }
    }

    // Prose around the array
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .and_then(|value| array_from_value(&value))
}

fn array_from_value(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::Object(map) => map.values().find_map(|v| match v {
            Value::Array(_) => array_from_value(v),
            _ => None,
        }),
        _ => None,
    }
}
