//! Extraction error types for structured data pulled from LLM responses.

/// Error for failed JSON extraction or parsing of an LLM response.
///
/// # Examples
///
/// ```
/// use reelsmith_error::ExtractionError;
///
/// let err = ExtractionError::new("expected object, found string");
/// assert!(err.message.contains("expected object"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Extraction Error: {} at line {} in {}", message, line, file)]
pub struct ExtractionError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ExtractionError {
    /// Create a new ExtractionError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
