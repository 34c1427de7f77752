//! Conversation data shared by the relay and the client.
mod language;
mod models;

pub use language::{DEFAULT_LANGUAGE, Language, LanguageInfo, SUPPORTED_LANGUAGES};
pub use models::{ChatMessage, Message, Role};
