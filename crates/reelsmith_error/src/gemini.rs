//! Gemini-specific error types and transient-failure classification.

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// API key missing from configuration
    #[display("Gemini API key is not configured")]
    MissingApiKey,
    /// Failed to create Gemini client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// API request failed
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Response contained no usable output
    #[display("Empty response from Gemini: {}", _0)]
    EmptyResponse(String),
    /// Base64 decoding of an inline payload failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// Requested capability is not supported by the wrapped client
    #[display("Unsupported request: {}", _0)]
    Unsupported(String),
}

impl GeminiErrorKind {
    /// Check whether this error is a transient provider failure.
    ///
    /// Transient failures are rate limits (429, or a "quota" message) and
    /// overload (503). Everything else is permanent and must not be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            GeminiErrorKind::HttpError { status_code, .. } => {
                matches!(*status_code, 429 | 503)
            }
            GeminiErrorKind::ApiRequest(message) => {
                message.to_ascii_lowercase().contains("quota")
            }
            _ => false,
        }
    }
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("API key"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that distinguish transient from permanent failures.
///
/// The retry wrapper only retries errors reporting `true` here; permanent
/// errors propagate unchanged to the caller.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{GeminiError, GeminiErrorKind, TransientError};
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_transient());
/// ```
pub trait TransientError {
    /// Returns true if this error should trigger a retry.
    fn is_transient(&self) -> bool;
}

impl TransientError for GeminiError {
    fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}
