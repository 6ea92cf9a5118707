//! Core data types for the Reelsmith production pipeline.
//!
//! This crate provides the foundation request/response envelope shared by
//! every agent call: multimodal messages in, text or inline-image outputs
//! out, plus the two Gemini-specific request knobs the pipeline depends on
//! (a JSON response-schema hint and a search-grounding flag).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod input;
mod message;
mod output;
mod request;
mod role;

pub use input::Input;
pub use message::{Message, MessageBuilder, MessageBuilderError};
pub use output::Output;
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse,
};
pub use role::Role;
