//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{Router, body::Body};
use futures::StreamExt;

use saathi::ai::prompt::PromptTemplate;
use saathi::ai::{ChatReply, CompletionProvider, Relay, RelayError, ResponseMode};
use saathi::api::{AppState, app};
use saathi::chat::{ChatMessage, Role};
use saathi::core::{AppConfig, ProviderKind};

/// Config pointing the selected provider at `upstream_url`, usually
/// a `mockito` server.
pub fn test_config(provider: ProviderKind, upstream_url: &str) -> AppConfig {
    AppConfig {
        provider,
        gemini_api_url: format!("{}/v1beta/models/gemini-2.0-flash:generateContent", upstream_url),
        gemini_api_key: String::from("test-gemini-key"),
        openai_api_hostname: upstream_url.to_string(),
        openai_api_key: String::from("test-openai-key"),
        openai_model: String::from("gpt-4.1-mini"),
        upstream_timeout: Duration::from_secs(5),
        prompt_template: None,
        web_ui_path: String::from("./web-ui/src"),
    }
}

/// Creates the application router for `config`.
pub fn test_app(config: AppConfig) -> Router {
    let relay = Relay::from_config(&config).expect("Failed to build relay");
    app(Arc::new(AppState::new(relay, config)))
}

/// Creates the application router around a stub provider.
pub fn test_app_with_provider(provider: Arc<dyn CompletionProvider>) -> Router {
    let config = test_config(ProviderKind::Gemini, "http://127.0.0.1:1");
    let relay = Relay::new(provider, PromptTemplate::default());
    app(Arc::new(AppState::new(relay, config)))
}

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Replies with "ECHO:" followed by the last user message.
pub struct EchoProvider {
    mode: ResponseMode,
}

impl EchoProvider {
    pub fn new(mode: ResponseMode) -> Arc<Self> {
        Arc::new(Self { mode })
    }
}

#[async_trait]
impl CompletionProvider for EchoProvider {
    fn mode(&self) -> ResponseMode {
        self.mode
    }

    async fn complete(
        &self,
        _system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatReply, RelayError> {
        let last = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        match self.mode {
            ResponseMode::SingleShot => Ok(ChatReply::Message(format!("ECHO:{}", last))),
            ResponseMode::Streaming => {
                let chunks: Vec<Result<String, RelayError>> =
                    vec![Ok("ECHO:".to_string()), Ok(last)];
                Ok(ChatReply::Stream(futures::stream::iter(chunks).boxed()))
            }
        }
    }
}
