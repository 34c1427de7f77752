//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, Language};

/// One turn of the conversation. Always carries the entire history,
/// the relay keeps nothing between calls.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub language: Language,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub message: String,
}

impl ChatResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.into(),
        }
    }
}
