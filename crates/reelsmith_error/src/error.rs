//! Top-level error wrapper types.

use crate::{
    ConfigError, ExtractionError, GeminiError, JsonError, PipelineError, StorageError,
};

/// The foundation error enum aggregating all domain errors in the workspace.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithError, ConfigError};
///
/// let err: ReelsmithError = ConfigError::new("bad tier name").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ReelsmithErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Structured-data extraction error
    #[from(ExtractionError)]
    Extraction(ExtractionError),
    /// Gemini provider error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Pipeline/orchestration error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Ledger storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Reelsmith error with kind discrimination.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithResult, JsonError};
///
/// fn parse() -> ReelsmithResult<()> {
///     Err(JsonError::new("trailing comma"))?
/// }
///
/// assert!(parse().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Reelsmith Error: {}", _0)]
pub struct ReelsmithError(Box<ReelsmithErrorKind>);

impl ReelsmithError {
    /// Create a new error from a kind.
    pub fn new(kind: ReelsmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReelsmithErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ReelsmithErrorKind
impl<T> From<T> for ReelsmithError
where
    T: Into<ReelsmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Reelsmith operations.
pub type ReelsmithResult<T> = std::result::Result<T, ReelsmithError>;
