use async_trait::async_trait;
use futures_util::StreamExt;
use http::header;
use reqwest::Client;

use super::error::ClientError;
use crate::api::public::chat::{ChatRequest, ChatResponse};

/// Receives reply text as it arrives.
pub type ChunkSink<'a> = dyn for<'c> FnMut(&'c str) + Send + 'a;

/// Carries one chat request to the relay and returns the full reply.
///
/// Reply text is passed to `on_chunk` as it arrives, in order. A
/// single JSON reply arrives as one chunk.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(
        &self,
        request: &ChatRequest,
        on_chunk: &mut ChunkSink<'_>,
    ) -> Result<String, ClientError>;
}

/// Talks to the relay's `POST /api/chat` over HTTP.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(relay_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/chat", relay_url.trim_end_matches('/')),
        }
    }
}

/// Split off the longest valid UTF-8 prefix of `pending`, leaving an
/// incomplete trailing character in place for the next frame.
fn take_utf8(pending: &mut Vec<u8>) -> Result<String, std::str::Utf8Error> {
    let valid = match std::str::from_utf8(pending) {
        Ok(_) => pending.len(),
        // `error_len` is `None` when the input merely ends too early
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(e) => return Err(e),
    };
    let rest = pending.split_off(valid);
    let text = String::from_utf8(std::mem::replace(pending, rest))
        .map_err(|e| e.utf8_error())?;
    Ok(text)
}

#[async_trait]
impl RelayTransport for HttpTransport {
    async fn send(
        &self,
        request: &ChatRequest,
        on_chunk: &mut ChunkSink<'_>,
    ) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(ClientError::Network)?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            let bytes = response.bytes().await.map_err(ClientError::Interrupted)?;
            let reply = serde_json::from_slice::<ChatResponse>(&bytes)
                .map_err(|e| ClientError::Decode(Box::new(e)))?;
            on_chunk(&reply.message);
            return Ok(reply.message);
        }

        let mut stream = response.bytes_stream();
        let mut pending: Vec<u8> = Vec::new();
        let mut reply = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ClientError::Interrupted)?;
            pending.extend_from_slice(&chunk);
            let text = take_utf8(&mut pending).map_err(|e| ClientError::Decode(Box::new(e)))?;
            if !text.is_empty() {
                on_chunk(&text);
                reply.push_str(&text);
            }
        }

        if !pending.is_empty() {
            return Err(ClientError::Decode(
                "reply ended in the middle of a character".into(),
            ));
        }

        Ok(reply)
    }
}
