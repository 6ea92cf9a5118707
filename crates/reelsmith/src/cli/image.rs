//! Image studio command handler.

use std::path::{Path, PathBuf};

use reelsmith_error::{
    GeminiError, GeminiErrorKind, ReelsmithResult, StorageError, StorageErrorKind,
};
use reelsmith_models::GeminiClient;
use reelsmith_pipeline::{edit_image, generate_image};

use reelsmith::Settings;

/// Image-capable model used when the configured model is text-only.
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Generate a new image, or edit an existing one when `edit` is given.
pub async fn image_command(
    _settings: &Settings,
    prompt: &str,
    edit: Option<PathBuf>,
    output: &Path,
) -> ReelsmithResult<()> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
    let driver = GeminiClient::with_default_model(api_key, IMAGE_MODEL);

    let image = match edit {
        Some(source_path) => {
            let bytes = std::fs::read(&source_path).map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    source_path.display(),
                    e
                )))
            })?;
            let mime = mime_for(&source_path);
            edit_image(&driver, &bytes, mime, prompt).await?
        }
        None => generate_image(&driver, prompt).await?,
    };

    std::fs::write(output, &image.data).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            output.display(),
            e
        )))
    })?;
    println!(
        "Image written to {} ({} bytes, {})",
        output.display(),
        image.data.len(),
        image.mime.as_deref().unwrap_or("unknown type")
    );
    Ok(())
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}
