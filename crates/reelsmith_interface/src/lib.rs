//! Trait definitions for the Reelsmith provider boundary.
//!
//! The pipeline talks to the generative AI service only through
//! [`ReelsmithDriver`], so agents and the orchestrator can run against the
//! production Gemini client or a scripted mock interchangeably.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::ReelsmithDriver;
pub use types::ModelMetadata;
