//! Streaming chat completions against an OpenAI compatible API.
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::{ChatReply, CompletionProvider, RelayError, ResponseMode, TokenStream};
use crate::chat::{ChatMessage, Role};

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionChunkChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    choices: Vec<CompletionChunkChoice>,
}

/// What a single SSE line carries.
#[derive(Debug, PartialEq)]
enum SseLine {
    Content(String),
    Done,
    Skip,
}

fn parse_sse_line(line: &str) -> Result<SseLine, RelayError> {
    // Comments, event names and blank separators carry no content
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseLine::Skip);
    };
    let data = data.trim();
    if data.is_empty() {
        return Ok(SseLine::Skip);
    }
    if data == "[DONE]" {
        return Ok(SseLine::Done);
    }

    let chunk = serde_json::from_str::<CompletionChunk>(data).map_err(|e| {
        tracing::error!("Parsing completion chunk failed for {}\nError:{}", data, e);
        RelayError::malformed(e.to_string())
    })?;
    let content: String = chunk
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .collect();

    if content.is_empty() {
        Ok(SseLine::Skip)
    } else {
        Ok(SseLine::Content(content))
    }
}

/// Turn the raw SSE response body into a stream of reply text.
///
/// Bytes are buffered until a full line is available so multi-byte
/// characters split across network frames are decoded intact. The
/// stream ends at `[DONE]` and stops at the first error. A body that
/// ends before `[DONE]` is truncated and ends with an error.
fn sse_to_token_stream<S, B>(byte_stream: S) -> TokenStream
where
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();
        let mut body_ended = false;

        while !body_ended {
            match byte_stream.next().await {
                Some(Ok(chunk)) => buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    yield Err(RelayError::UpstreamUnavailable(e));
                    return;
                }
                None => {
                    body_ended = true;
                    // Flush a last line that arrived without its newline
                    if !buffer.is_empty() {
                        buffer.push(b'\n');
                    }
                }
            }

            while let Some(line_end) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                let line = match std::str::from_utf8(&line) {
                    Ok(l) => l.trim(),
                    Err(e) => {
                        yield Err(RelayError::malformed(e.to_string()));
                        return;
                    }
                };

                match parse_sse_line(line) {
                    Ok(SseLine::Content(content)) => yield Ok(content),
                    Ok(SseLine::Done) => return,
                    Ok(SseLine::Skip) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        tracing::error!("Completion stream ended before [DONE]");
        yield Err(RelayError::malformed("stream ended before [DONE]"));
    })
}

pub struct OpenAiProvider {
    client: Client,
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_hostname: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn mode(&self) -> ResponseMode {
        ResponseMode::Streaming
    }

    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatReply, RelayError> {
        let mut request_messages = vec![RequestMessage {
            role: "system",
            content: system_prompt,
        }];
        request_messages.extend(messages.iter().map(|m| RequestMessage {
            role: match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: &m.content,
        }));
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: request_messages,
            stream: true,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.api_hostname.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(RelayError::UpstreamUnavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamRejected { status, body });
        }

        Ok(ChatReply::Stream(sse_to_token_stream(response.bytes_stream())))
    }
}
