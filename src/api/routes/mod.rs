//! API routes module

pub mod chat;
pub mod languages;

use axum::Router;

use crate::api::state::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Chat relay
        .nest("/chat", chat::router())
        // Language picker data
        .nest("/languages", languages::router())
}
