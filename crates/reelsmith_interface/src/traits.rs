//! Trait definitions for LLM backends.

use crate::ModelMetadata;
use async_trait::async_trait;
use reelsmith_core::{GenerateRequest, GenerateResponse};
use reelsmith_error::ReelsmithResult;

/// Core trait that all LLM backends must implement.
///
/// This provides the minimal interface the pipeline needs: one asynchronous
/// generate call plus identification. Drivers own their retry behavior; the
/// orchestrator never retries a stage itself.
#[async_trait]
pub trait ReelsmithDriver: Send + Sync {
    /// Generate model output given a multimodal request.
    async fn generate(&self, req: &GenerateRequest) -> ReelsmithResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier used when a request does not name one.
    fn model_name(&self) -> &str;

    /// Capability metadata for the default model.
    fn metadata(&self) -> ModelMetadata;
}
