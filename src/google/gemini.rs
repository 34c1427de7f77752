//! Google Gemini `generateContent` client. Gemini gets the whole
//! conversation as a single block of text and answers with one JSON
//! body.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::prompt::flatten_transcript;
use crate::ai::{ChatReply, CompletionProvider, RelayError, ResponseMode};
use crate::chat::ChatMessage;

/// Substituted when the reply has no text where it should be
pub const NO_RESPONSE: &str = "No response";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

// Every level is optional, Gemini omits fields freely when a
// candidate is blocked or empty.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate
    fn into_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
    }
}

pub struct GeminiProvider {
    client: Client,
    api_url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn mode(&self) -> ResponseMode {
        ResponseMode::SingleShot
    }

    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatReply, RelayError> {
        let prompt = flatten_transcript(system_prompt, messages);
        let payload = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(RelayError::UpstreamUnavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamRejected { status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(RelayError::UpstreamUnavailable)?;
        let resp = serde_json::from_slice::<GenerateContentResponse>(&bytes)
            .map_err(|e| RelayError::malformed(e.to_string()))?;

        let text = resp.into_text().unwrap_or_else(|| {
            tracing::warn!("Gemini response had no candidate text");
            NO_RESPONSE.to_string()
        });
        Ok(ChatReply::Message(text))
    }
}
