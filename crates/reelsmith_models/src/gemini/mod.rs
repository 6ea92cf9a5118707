//! Google Gemini driver.

mod client;

pub use client::GeminiClient;

/// Result type for Gemini operations.
pub(crate) type GeminiResult<T> = std::result::Result<T, reelsmith_error::GeminiError>;
