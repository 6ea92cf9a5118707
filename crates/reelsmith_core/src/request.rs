//! Request and response types for model generation.

use crate::{Message, Output};
use serde::{Deserialize, Serialize};

/// Generic generation request (multimodal-safe).
///
/// Beyond the usual conversation fields, two knobs drive agent behavior:
/// `response_schema` asks the provider for structured JSON output matching
/// the given schema, and `search_grounding` enables external-search
/// augmentation (used by the researcher agent).
///
/// # Examples
///
/// ```
/// use reelsmith_core::{GenerateRequest, Message, Role};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::text(Role::User, "Hello!")])
///     .model(Some("gemini-2.5-flash".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages.len(), 1);
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder,
)]
#[builder(default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 1.0)
    pub temperature: Option<f32>,
    /// Model identifier to use
    pub model: Option<String>,
    /// Expected-shape hint: a JSON schema the response must conform to
    pub response_schema: Option<serde_json::Value>,
    /// Enable external-search augmentation for this request
    pub search_grounding: bool,
}

impl GenerateRequest {
    /// Return a builder for this request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("Sure, here it is.".to_string())],
/// };
/// assert_eq!(response.text(), "Sure, here it is.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenate all text outputs with newlines between them.
    pub fn text(&self) -> String {
        let texts: Vec<&str> = self
            .outputs
            .iter()
            .filter_map(|output| match output {
                Output::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        texts.join("\n")
    }

    /// First image output, if any.
    pub fn image(&self) -> Option<(Option<&str>, &[u8])> {
        self.outputs.iter().find_map(|output| match output {
            Output::Image { mime, data } => Some((mime.as_deref(), data.as_slice())),
            _ => None,
        })
    }
}
