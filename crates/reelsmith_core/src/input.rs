//! Input types for requests.

use serde::{Deserialize, Serialize};

/// Supported input types for model requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input (prompts, prior context).
    Text(String),

    /// Inline image input, used by the editing studio.
    Image {
        /// MIME type of the image
        mime: String,
        /// Binary image data
        data: Vec<u8>,
    },
}
