//! Auxiliary image studio: one-off generation and editing of blueprint
//! visuals through an image-capable driver.

use reelsmith_core::{GenerateRequestBuilder, Input, Message, Role};
use reelsmith_error::{PipelineError, PipelineErrorKind, ReelsmithResult};
use reelsmith_interface::ReelsmithDriver;

/// An image produced by the studio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// MIME type reported by the provider, when present
    pub mime: Option<String>,
    /// Raw image bytes
    pub data: Vec<u8>,
}

fn studio_error(message: impl Into<String>) -> PipelineError {
    PipelineError::new(PipelineErrorKind::StageOutput {
        stage: "image_studio".to_string(),
        message: message.into(),
    })
}

fn first_image(
    response: &reelsmith_core::GenerateResponse,
) -> ReelsmithResult<GeneratedImage> {
    let (mime, data) = response
        .image()
        .ok_or_else(|| studio_error("response carried no image payload"))?;
    Ok(GeneratedImage {
        mime: mime.map(str::to_string),
        data: data.to_vec(),
    })
}

/// Generate a single image from a prompt.
///
/// # Errors
///
/// Returns an error if the driver fails or the response carries no image.
#[tracing::instrument(skip(driver, prompt))]
pub async fn generate_image(
    driver: &dyn ReelsmithDriver,
    prompt: &str,
) -> ReelsmithResult<GeneratedImage> {
    let request = GenerateRequestBuilder::default()
        .messages(vec![Message::text(Role::User, prompt)])
        .build()
        .map_err(|e| studio_error(format!("request construction: {e}")))?;

    let response = driver.generate(&request).await?;
    first_image(&response)
}

/// Edit an existing image according to an instruction.
///
/// # Errors
///
/// Returns an error if the driver fails or the response carries no image.
#[tracing::instrument(skip(driver, image, instruction), fields(bytes = image.len()))]
pub async fn edit_image(
    driver: &dyn ReelsmithDriver,
    image: &[u8],
    mime: &str,
    instruction: &str,
) -> ReelsmithResult<GeneratedImage> {
    let request = GenerateRequestBuilder::default()
        .messages(vec![Message {
            role: Role::User,
            content: vec![
                Input::Image {
                    mime: mime.to_string(),
                    data: image.to_vec(),
                },
                Input::Text(instruction.to_string()),
            ],
        }])
        .build()
        .map_err(|e| studio_error(format!("request construction: {e}")))?;

    let response = driver.generate(&request).await?;
    first_image(&response)
}
