//! Ledger storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write the ledger document
    #[display("Failed to write ledger: {}", _0)]
    FileWrite(String),
    /// Failed to read the ledger document
    #[display("Failed to read ledger: {}", _0)]
    FileRead(String),
    /// Ledger document contents could not be deserialized
    #[display("Corrupt ledger document: {}", _0)]
    Corrupt(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileRead("denied".to_string()));
/// assert!(format!("{}", err).contains("read"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
