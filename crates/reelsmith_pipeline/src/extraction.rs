//! Utilities for extracting structured data from LLM responses.
//!
//! LLM responses often wrap JSON in markdown code blocks or mix it with
//! explanatory text. `extract_json` recovers the payload from the common
//! patterns; `parse_json` turns it into a typed value and surfaces parse
//! failures to the caller.

use reelsmith_error::{ExtractionError, ReelsmithResult};

/// Extract the JSON payload from a response that may contain extra text.
///
/// Slices from the first `{` to the last `}` when both exist in order;
/// otherwise strips markdown code-fence markers and returns the trimmed
/// remainder unchanged. This never fails — a response with no JSON in it
/// comes back as-is and the subsequent [`parse_json`] reports the error.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::extract_json;
///
/// let response = "Sure! ```json\n{\"a\":1}\n```";
/// assert_eq!(extract_json(response), "{\"a\":1}");
///
/// assert_eq!(extract_json("prefix {\"a\":1} suffix"), "{\"a\":1}");
/// ```
pub fn extract_json(response: &str) -> String {
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if end > start {
            return response[start..=end].to_string();
        }
    }

    strip_code_fences(response)
}

/// Strip markdown code-fence markers (```json ... ``` or bare ```).
fn strip_code_fences(response: &str) -> String {
    let mut text = response.trim();

    if let Some(start) = text.find("```") {
        let after_fence = &text[start + 3..];
        // Skip an optional language specifier up to the first newline
        let content_start = after_fence.find('\n').map(|n| n + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        text = match content.find("```") {
            Some(end) => &content[..end],
            // No closing fence, likely a truncated response
            None => content,
        };
    }

    text.trim().to_string()
}

/// Parse extracted JSON into a typed value.
///
/// # Errors
///
/// Returns an error if the string is not valid JSON for type `T`.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::parse_json;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Keywords {
///     keywords: Vec<String>,
/// }
///
/// let parsed: Keywords = parse_json(r#"{"keywords": ["a", "b"]}"#).unwrap();
/// assert_eq!(parsed.keywords.len(), 2);
/// ```
pub fn parse_json<T>(json_str: &str) -> ReelsmithResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview: String = json_str.chars().take(100).collect();

        tracing::error!(
            error = %e,
            json_preview = %preview,
            "JSON parsing failed"
        );

        ExtractionError::new(format!(
            "Failed to parse JSON: {} (JSON: {}...). Hint: ensure the prompt explicitly requests JSON output.",
            e, preview
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_code_block() {
        let response = "Sure! ```json\n{\"a\":1}\n```";
        let json = extract_json(response);
        let value: serde_json::Value = parse_json(&json).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn extracts_embedded_object() {
        let json = extract_json("prefix {\"a\":1} suffix");
        assert_eq!(json, "{\"a\":1}");
    }

    #[test]
    fn first_to_last_brace_spans_nested_objects() {
        let response = r#"Here: {"outer": {"inner": 2}} done"#;
        let json = extract_json(response);
        let value: serde_json::Value = parse_json(&json).unwrap();
        assert_eq!(value["outer"]["inner"], 2);
    }

    #[test]
    fn braceless_garbage_passes_through() {
        let response = "no json here at all";
        let text = extract_json(response);
        assert_eq!(text, "no json here at all");
        assert!(parse_json::<serde_json::Value>(&text).is_err());
    }

    #[test]
    fn braceless_fenced_text_is_stripped() {
        let response = "```\nplain text payload\n```";
        assert_eq!(extract_json(response), "plain text payload");
    }

    #[test]
    fn unterminated_fence_returns_remainder() {
        let response = "```json\n[1, 2, 3]";
        assert_eq!(extract_json(response), "[1, 2, 3]");
    }

    #[test]
    fn parse_json_into_struct() {
        use serde::Deserialize;

        #[derive(Deserialize)]
        struct TestData {
            id: i32,
        }

        let data: TestData = parse_json(r#"{"id": 42}"#).unwrap();
        assert_eq!(data.id, 42);
    }
}
