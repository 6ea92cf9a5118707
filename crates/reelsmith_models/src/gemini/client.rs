//! Google Gemini API implementation.
//!
//! This module provides a client for the Google Gemini API with support for:
//! - Per-request model selection (different agents use different models)
//! - Client pooling with lazy initialization (one client per model)
//! - Structured JSON output via response schemas
//! - Google-search grounding for research requests
//! - Inline image payloads for the generation/editing studio
//!
//! The client retries transient failures (429, quota messages, 503) through
//! [`retry_transient`](crate::retry_transient); permanent errors propagate
//! to the caller unchanged.

use async_trait::async_trait;
use base64::Engine;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::instrument;

use gemini_rust::{client::Model, Gemini, Tool};

use reelsmith_core::{GenerateRequest, GenerateResponse, Input, Output, Role};
use reelsmith_error::{GeminiError, GeminiErrorKind, ReelsmithResult};
use reelsmith_interface::{ModelMetadata, ReelsmithDriver};

use super::GeminiResult;
use crate::retry_transient;

/// Client for the Google Gemini API with per-model client pooling.
///
/// Clients are created lazily on first use for each model named in a
/// request; requests without a model fall back to the configured default.
///
/// # Examples
///
/// ```no_run
/// use reelsmith_models::GeminiClient;
/// use reelsmith_core::{GenerateRequest, Message, Role};
/// use reelsmith_interface::ReelsmithDriver;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClient::new("api-key".to_string());
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::text(Role::User, "Hello")])
///     .build()?;
/// let response = client.generate(&request).await?;
/// println!("{}", response.text());
/// # Ok(())
/// # }
/// ```
pub struct GeminiClient {
    /// Cache of model-specific clients
    clients: Arc<Mutex<HashMap<String, Gemini>>>,
    /// API key for creating new clients
    api_key: String,
    /// Default model name when req.model is None
    model_name: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let client_count = self.clients.lock().unwrap().len();
        f.debug_struct("GeminiClient")
            .field("model_name", &self.model_name)
            .field("cached_clients", &client_count)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client with the default model.
    ///
    /// The key comes from explicit configuration rather than ambient
    /// environment reads; the caller owns credential resolution.
    pub fn new(api_key: String) -> Self {
        Self::with_default_model(api_key, "gemini-2.5-flash")
    }

    /// Create a new Gemini client with a specific default model.
    #[instrument(name = "gemini_client_new", skip(api_key))]
    pub fn with_default_model(api_key: String, model_name: &str) -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            api_key,
            model_name: model_name.to_string(),
        }
    }

    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Uses Model::Custom for unrecognized model names, adding the
    /// "models/" prefix required by the Gemini API.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => {
                if other.starts_with("models/") {
                    Model::Custom(other.to_string())
                } else {
                    Model::Custom(format!("models/{}", other))
                }
            }
        }
    }

    /// Get or create the client for a model name.
    fn client_for(&self, model_name: &str) -> GeminiResult<Gemini> {
        let mut clients = self.clients.lock().unwrap();
        if let Some(client) = clients.get(model_name) {
            return Ok(client.clone());
        }

        let model_enum = Self::model_name_to_enum(model_name);
        let client = Gemini::with_model(&self.api_key, model_enum)
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;
        clients.insert(model_name.to_string(), client.clone());
        Ok(client)
    }

    /// Internal generate method that returns Gemini-specific errors.
    async fn generate_internal(&self, req: &GenerateRequest) -> GeminiResult<GenerateResponse> {
        let model_name = req.model.as_deref().unwrap_or(&self.model_name);
        let client = self.client_for(model_name)?;

        let response = retry_transient(|| {
            let client = client.clone();
            async move {
                let mut builder = client.generate_content();
                let mut system_prompt: Option<String> = None;

                for msg in &req.messages {
                    match msg.role {
                        Role::System => {
                            // Gemini takes a separate system instruction
                            if let Some(text) = msg.content.iter().find_map(extract_text) {
                                system_prompt = Some(text);
                            }
                        }
                        Role::User => {
                            for input in &msg.content {
                                match input {
                                    Input::Text(text) => {
                                        builder = builder.with_user_message(text);
                                    }
                                    Input::Image { mime, data } => {
                                        let encoded =
                                            base64::engine::general_purpose::STANDARD.encode(data);
                                        builder = builder.with_inline_data(&encoded, mime);
                                    }
                                }
                            }
                        }
                        Role::Assistant => {
                            if let Some(text) = msg.content.iter().find_map(extract_text) {
                                builder = builder.with_model_message(&text);
                            }
                        }
                    }
                }

                if let Some(prompt) = &system_prompt {
                    builder = builder.with_system_prompt(prompt);
                }

                if let Some(temp) = req.temperature {
                    builder = builder.with_temperature(temp);
                }

                if let Some(max_tokens) = req.max_tokens {
                    builder = builder.with_max_output_tokens(max_tokens as i32);
                }

                // Structured output: the response arrives as valid JSON and
                // the caller parses it directly, no fence stripping.
                if let Some(schema) = &req.response_schema {
                    builder = builder
                        .with_response_mime_type("application/json")
                        .with_response_schema(schema.clone());
                }

                if req.search_grounding {
                    builder = builder.with_tool(Tool::google_search());
                }

                builder.execute().await.map_err(parse_gemini_error)
            }
        })
        .await?;

        let outputs = collect_outputs(&response)?;
        Ok(GenerateResponse { outputs })
    }
}

/// Extract text content from an input.
fn extract_text(input: &Input) -> Option<String> {
    match input {
        Input::Text(text) => Some(text.clone()),
        _ => None,
    }
}

/// Convert a gemini-rust response into pipeline outputs.
///
/// Text parts concatenate through `GenerationResponse::text()`; inline image
/// parts decode from base64 into binary payloads.
fn collect_outputs(
    response: &gemini_rust::generation::model::GenerationResponse,
) -> GeminiResult<Vec<Output>> {
    use gemini_rust::Part;

    let mut outputs = Vec::new();

    let text = response.text();
    if !text.is_empty() {
        outputs.push(Output::Text(text));
    }

    for candidate in &response.candidates {
        for part in candidate.content.parts.iter().flatten() {
            if let Part::InlineData { inline_data, .. } = part {
                let data = base64::engine::general_purpose::STANDARD
                    .decode(&inline_data.data)
                    .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))?;
                outputs.push(Output::Image {
                    mime: Some(inline_data.mime_type.clone()),
                    data,
                });
            }
        }
    }

    if outputs.is_empty() {
        return Err(GeminiError::new(GeminiErrorKind::EmptyResponse(
            "no text or inline data in candidates".to_string(),
        )));
    }

    Ok(outputs)
}

/// Parse gemini-rust errors to extract HTTP status codes.
///
/// Converts generic API error strings into structured GeminiError with
/// status codes when available, so transient classification can act on them.
fn parse_gemini_error(err: impl std::fmt::Display) -> GeminiError {
    let err_msg = err.to_string();

    if let Some(status_code) = extract_status_code(&err_msg) {
        GeminiError::new(GeminiErrorKind::HttpError {
            status_code,
            message: err_msg,
        })
    } else {
        GeminiError::new(GeminiErrorKind::ApiRequest(err_msg))
    }
}

/// Extract HTTP status code from an error message string.
///
/// Parses strings like "bad response from server; code 503; description: ..."
fn extract_status_code(error_msg: &str) -> Option<u16> {
    if let Some(code_start) = error_msg.find("code ") {
        let code_str = &error_msg[code_start + 5..];
        if let Some(end) = code_str.find(|c: char| !c.is_numeric()) {
            return code_str[..end].parse().ok();
        }
        return code_str.parse().ok();
    }
    None
}

#[async_trait]
impl ReelsmithDriver for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> ReelsmithResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: "gemini",
            model: self.model_name.clone(),
            max_input_tokens: 1_048_576,
            max_output_tokens: 8192,
            supports_json_mode: true,
            supports_search_grounding: true,
            supports_image_generation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_extraction() {
        assert_eq!(
            extract_status_code("bad response from server; code 503; description: overloaded"),
            Some(503)
        );
        assert_eq!(extract_status_code("code 429"), Some(429));
        assert_eq!(extract_status_code("connection reset"), None);
    }

    #[test]
    fn transient_classification() {
        let overloaded = parse_gemini_error("bad response from server; code 503; busy");
        assert!(overloaded.kind.is_transient());

        let quota = parse_gemini_error("You exceeded your current quota, please check billing");
        assert!(quota.kind.is_transient());

        let bad_request = parse_gemini_error("bad response from server; code 400; invalid");
        assert!(!bad_request.kind.is_transient());
    }

    #[test]
    fn custom_models_get_prefixed() {
        match GeminiClient::model_name_to_enum("gemini-2.0-flash") {
            Model::Custom(name) => assert_eq!(name, "models/gemini-2.0-flash"),
            other => panic!("expected Custom variant, got {:?}", other),
        }
    }
}
