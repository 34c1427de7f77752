//! Translates one chat request into one upstream call.
use std::sync::Arc;

use anyhow::Result;
use http::StatusCode;
use thiserror::Error;

use super::prompt::PromptTemplate;
use super::provider::{ChatReply, CompletionProvider};
use crate::api::public::chat::ChatRequest;
use crate::core::{AppConfig, ProviderKind};
use crate::google::GeminiProvider;
use crate::openai::OpenAiProvider;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] reqwest::Error),

    #[error("Upstream rejected the request with status {status}")]
    UpstreamRejected { status: StatusCode, body: String },

    #[error("Malformed upstream payload: {0}")]
    MalformedPayload(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl RelayError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }
}

/// Stateless request handler. Cloning is cheap and every call is
/// independent of every other.
#[derive(Clone)]
pub struct Relay {
    provider: Arc<dyn CompletionProvider>,
    prompt: Arc<PromptTemplate>,
}

impl Relay {
    pub fn new(provider: Arc<dyn CompletionProvider>, prompt: PromptTemplate) -> Self {
        Self {
            provider,
            prompt: Arc::new(prompt),
        }
    }

    /// Build the relay for the provider selected in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider: Arc<dyn CompletionProvider> = match config.provider {
            ProviderKind::Gemini => Arc::new(GeminiProvider::new(
                &config.gemini_api_url,
                &config.gemini_api_key,
                config.upstream_timeout,
            )?),
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
                &config.openai_api_hostname,
                &config.openai_api_key,
                &config.openai_model,
                config.upstream_timeout,
            )?),
        };
        let prompt = PromptTemplate::new(config.prompt_template.as_deref())?;
        Ok(Self::new(provider, prompt))
    }

    pub fn provider(&self) -> &dyn CompletionProvider {
        self.provider.as_ref()
    }

    pub async fn handle(&self, request: ChatRequest) -> Result<ChatReply, RelayError> {
        if request.messages.is_empty() {
            return Err(RelayError::InvalidRequest(
                "messages must not be empty".to_string(),
            ));
        }

        tracing::debug!(
            language = %request.language,
            messages = request.messages.len(),
            mode = ?self.provider.mode(),
            "Relaying chat request"
        );

        let system_prompt = self
            .prompt
            .render(&request.language)
            .map_err(|e| RelayError::Prompt(e.to_string()))?;

        self.provider
            .complete(&system_prompt, &request.messages)
            .await
    }
}
