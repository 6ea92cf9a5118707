//! Pipeline and orchestration error types.

/// Specific error conditions for pipeline operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// A stage produced output the pipeline could not use
    #[display("Stage '{}' returned unusable output: {}", stage, message)]
    StageOutput {
        /// Stage name
        stage: String,
        /// What was wrong with the output
        message: String,
    },
    /// Scene notation could not be parsed into a structured record
    #[display("Failed to parse scene notation: {}", _0)]
    SceneNotation(String),
    /// Strategist returned slots outside the expected range
    #[display(
        "Strategist returned wrong slot range: expected {}..={}, got {}",
        expected_start, expected_end, got
    )]
    StrategistRange {
        /// First expected slot number
        expected_start: u32,
        /// Last expected slot number
        expected_end: u32,
        /// Description of what was actually returned
        got: String,
    },
    /// Ledger mutation would violate the contiguity invariant
    #[display("Ledger contiguity violation: {}", _0)]
    LedgerContiguity(String),
    /// Requested slot does not exist in the ledger
    #[display("Slot {} does not exist in the ledger", _0)]
    UnknownSlot(u32),
    /// A run or unlock is already in progress
    #[display("A run is already in progress")]
    Busy,
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::UnknownSlot(7));
/// assert!(format!("{}", err).contains("Slot 7"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
