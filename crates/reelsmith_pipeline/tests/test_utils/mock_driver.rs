//! Scripted mock driver for orchestrator tests.
//!
//! Each call to `generate` consumes the next scripted reply in order and
//! records the request, so tests can assert both what each agent asked and
//! that stages ran strictly in sequence.

use async_trait::async_trait;
use reelsmith_core::{GenerateRequest, GenerateResponse, Output};
use reelsmith_error::{GeminiError, GeminiErrorKind, ReelsmithError, ReelsmithResult};
use reelsmith_interface::{ModelMetadata, ReelsmithDriver};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Respond with the given text
    Text(String),
    /// Respond with an inline image payload
    Image(Vec<u8>),
    /// Fail with the given error
    Fail(GeminiErrorKind),
    /// Wait for a permit on the gate, then respond with the text
    GatedText(Arc<Semaphore>, String),
}

/// Mock driver that plays back a fixed script of replies.
pub struct MockDriver {
    script: Vec<ScriptedReply>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockDriver {
    pub fn new(script: Vec<ScriptedReply>) -> Self {
        Self {
            script,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the captured requests, usable after the driver
    /// moves into a studio.
    pub fn request_log(&self) -> Arc<Mutex<Vec<GenerateRequest>>> {
        Arc::clone(&self.requests)
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ReelsmithDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> ReelsmithResult<GenerateResponse> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(req.clone());
            requests.len() - 1
        };

        let reply = self.script.get(index).cloned().ok_or_else(|| {
            ReelsmithError::from(GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "mock script exhausted at call {}",
                index + 1
            ))))
        })?;

        match reply {
            ScriptedReply::Text(text) => Ok(GenerateResponse {
                outputs: vec![Output::Text(text)],
            }),
            ScriptedReply::Image(data) => Ok(GenerateResponse {
                outputs: vec![Output::Image {
                    mime: Some("image/png".to_string()),
                    data,
                }],
            }),
            ScriptedReply::Fail(kind) => Err(GeminiError::new(kind).into()),
            ScriptedReply::GatedText(gate, text) => {
                let permit = gate.acquire().await.map_err(|_| {
                    ReelsmithError::from(GeminiError::new(GeminiErrorKind::ApiRequest(
                        "mock gate closed".to_string(),
                    )))
                })?;
                permit.forget();
                Ok(GenerateResponse {
                    outputs: vec![Output::Text(text)],
                })
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock-gemini"
    }

    fn model_name(&self) -> &str {
        "mock-gemini"
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: "mock-gemini",
            model: "mock-gemini".to_string(),
            max_input_tokens: 1_048_576,
            max_output_tokens: 8192,
            supports_json_mode: true,
            supports_search_grounding: true,
            supports_image_generation: true,
        }
    }
}
