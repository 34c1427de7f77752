//! The seam between the relay and whichever upstream model is
//! deployed.
use async_trait::async_trait;
use futures::stream::BoxStream;

use super::relay::RelayError;
use crate::chat::ChatMessage;

/// Incremental reply text in arrival order.
pub type TokenStream = BoxStream<'static, Result<String, RelayError>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseMode {
    SingleShot,
    Streaming,
}

pub enum ChatReply {
    /// The complete reply
    Message(String),
    /// Reply chunks to be concatenated by the client
    Stream(TokenStream),
}

impl std::fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatReply::Message(m) => f.debug_tuple("Message").field(m).finish(),
            ChatReply::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// An upstream generative model. Implementations make exactly one
/// outbound call per `complete` and never retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn mode(&self) -> ResponseMode;

    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatReply, RelayError>;
}
