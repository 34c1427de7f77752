use super::error::{ClientError, NO_REPLY_FALLBACK, user_facing_message};
use super::transport::{ChunkSink, RelayTransport};
use crate::api::public::chat::ChatRequest;
use crate::chat::{Language, Message, Role};

/// Conversation starters offered before the first message.
pub const SUGGESTIONS: &[&str] = &["Hello! How are you today?", "Tell me a joke!"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    /// A request is in flight, new submissions are ignored
    Sending,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    /// Nothing was sent, either the text was blank or a request was
    /// already in flight
    Ignored,
    /// The assistant's reply was appended
    Replied,
    /// The exchange failed and the error banner is set
    Failed,
}

/// In-memory conversation state. Nothing here outlives the process.
pub struct Conversation {
    messages: Vec<Message>,
    language: Language,
    state: ExchangeState,
    error: Option<String>,
}

impl Conversation {
    pub fn new(language: Language) -> Self {
        Self {
            messages: Vec::new(),
            language,
            state: ExchangeState::Idle,
            error: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// The message in the error banner, if one is showing
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn placeholder(&self) -> String {
        format!("Type your message in {}...", self.language.native())
    }

    pub fn can_submit(&self, text: &str) -> bool {
        self.state == ExchangeState::Idle && !text.trim().is_empty()
    }

    /// Start an exchange: append the user's message and return the
    /// request carrying the whole history. Returns `None` without
    /// touching any state when submitting isn't allowed.
    pub fn begin(&mut self, text: &str) -> Option<ChatRequest> {
        if !self.can_submit(text) {
            return None;
        }

        self.error = None;
        self.messages.push(Message::new(Role::User, text.trim()));
        self.state = ExchangeState::Sending;

        Some(ChatRequest {
            messages: self.messages.iter().map(Message::to_wire).collect(),
            language: self.language.clone(),
        })
    }

    /// Finish the exchange started by `begin` with the relay's result.
    pub fn finish(&mut self, result: Result<String, ClientError>) -> Submission {
        if self.state != ExchangeState::Sending {
            tracing::warn!("Ignoring a reply with no exchange in flight");
            return Submission::Ignored;
        }
        self.state = ExchangeState::Idle;

        match result {
            Ok(reply) => {
                let content = if reply.is_empty() {
                    NO_REPLY_FALLBACK
                } else {
                    reply.as_str()
                };
                self.messages.push(Message::new(Role::Assistant, content));
                Submission::Replied
            }
            Err(e) => {
                tracing::error!("Chat error: {}", e);
                self.error = Some(user_facing_message(&e.to_string()).to_string());
                Submission::Failed
            }
        }
    }

    /// Send `text` through `transport` and record the outcome.
    pub async fn submit<T>(
        &mut self,
        transport: &T,
        text: &str,
        on_chunk: &mut ChunkSink<'_>,
    ) -> Submission
    where
        T: RelayTransport + ?Sized,
    {
        let Some(request) = self.begin(text) else {
            return Submission::Ignored;
        };
        let result = transport.send(&request, on_chunk).await;
        self.finish(result)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(Language::default())
    }
}
