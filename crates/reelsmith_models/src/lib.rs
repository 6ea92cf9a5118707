//! Model drivers for the Reelsmith production pipeline.
//!
//! This crate provides the Gemini implementation of
//! [`ReelsmithDriver`](reelsmith_interface::ReelsmithDriver) plus the
//! transient-failure retry wrapper every agent call goes through.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod retry;

pub use gemini::GeminiClient;
pub use retry::{retry_transient, INITIAL_BACKOFF_MS, MAX_RETRIES};
