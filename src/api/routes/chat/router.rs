//! Router for the chat API

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use futures::TryStreamExt;
use http::{HeaderValue, header};

use super::public;
use crate::ai::ChatReply;
use crate::api::public::ApiError;
use crate::api::state::SharedState;

const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Relay the conversation upstream and answer with the complete reply
/// or a chunked stream of reply text, depending on the provider.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Response, ApiError> {
    let reply = state.relay.handle(payload).await?;

    let resp = match reply {
        ChatReply::Message(message) => Json(public::ChatResponse::new(&message)).into_response(),
        ChatReply::Stream(stream) => {
            // The status line is already sent once the stream starts
            // so a failure here can only abort the body
            let stream = stream.inspect_err(|e| {
                tracing::error!("Chat stream aborted: {}", e);
            });
            (
                [(header::CONTENT_TYPE, HeaderValue::from_static(STREAM_CONTENT_TYPE))],
                Body::from_stream(stream),
            )
                .into_response()
        }
    };

    Ok(resp)
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
