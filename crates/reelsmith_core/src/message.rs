//! Message types for conversation history.

use crate::{Input, Role};
use serde::{Deserialize, Serialize};

/// A multimodal message in a conversation.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Message, Role, Input};
///
/// let message = Message {
///     role: Role::User,
///     content: vec![Input::Text("Hello!".to_string())],
/// };
///
/// assert_eq!(message.role, Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The content of the message (can be multimodal)
    pub content: Vec<Input>,
}

impl Message {
    /// Convenience constructor for a single-text message.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![Input::Text(text.into())],
        }
    }
}
