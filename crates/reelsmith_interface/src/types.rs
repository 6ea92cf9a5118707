//! Core type definitions for the Reelsmith interface.

/// Information about model capabilities and limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMetadata {
    /// Provider name (e.g., "gemini")
    pub provider: &'static str,
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,
    /// Maximum input context tokens
    pub max_input_tokens: usize,
    /// Maximum output tokens per request
    pub max_output_tokens: usize,
    /// Supports structured JSON output mode
    pub supports_json_mode: bool,
    /// Supports external-search grounding
    pub supports_search_grounding: bool,
    /// Supports image generation (inline payloads)
    pub supports_image_generation: bool,
}
