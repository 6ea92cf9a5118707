//! Error types for the Reelsmith production pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Reelsmith workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use reelsmith_error::{ReelsmithResult, ConfigError};
//!
//! fn load_settings() -> ReelsmithResult<String> {
//!     Err(ConfigError::new("missing api key"))?
//! }
//!
//! assert!(load_settings().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod extraction;
mod gemini;
mod json;
mod pipeline;
mod storage;

pub use config::ConfigError;
pub use error::{ReelsmithError, ReelsmithErrorKind, ReelsmithResult};
pub use extraction::ExtractionError;
pub use gemini::{GeminiError, GeminiErrorKind, TransientError};
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use storage::{StorageError, StorageErrorKind};
