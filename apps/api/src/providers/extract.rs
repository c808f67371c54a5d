//! Shared JSON extraction for LLM completions.
//!
//! Models wrap JSON in markdown code fences or pad it with whitespace, and
//! occasionally return text that is not JSON at all. This is the one place
//! that cleans and strictly parses completion text — provider
//! implementations must not duplicate this logic.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::providers::ProviderError;

/// How much of the offending text gets logged when parsing fails.
const LOG_SNIPPET_CHARS: usize = 200;

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Cleans completion text and strictly parses it as `T`.
///
/// No partial recovery and no best-guess defaults here — fallbacks are the
/// orchestration layer's decision, not this one's.
pub fn parse_json_response<T: DeserializeOwned>(raw: &str) -> Result<T, ProviderError> {
    let cleaned = strip_json_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        let snippet: String = cleaned.chars().take(LOG_SNIPPET_CHARS).collect();
        warn!("Failed to parse JSON response: {snippet}");
        ProviderError::JsonParse(e)
    })
}
