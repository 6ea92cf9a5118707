//! Output types from model responses.

use serde::{Deserialize, Serialize};

/// Supported output types from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),

    /// Generated image output (decoded from the provider's inline base64 payload).
    Image {
        /// MIME type of the image
        mime: Option<String>,
        /// Binary image data
        data: Vec<u8>,
    },
}
