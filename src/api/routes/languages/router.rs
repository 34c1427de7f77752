//! Router for the languages API

use axum::{Json, Router, routing::get};

use super::public;
use crate::api::state::SharedState;
use crate::chat::{DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};

/// List the languages a conversation can be held in
async fn languages() -> Json<public::LanguagesResponse> {
    Json(public::LanguagesResponse {
        default: DEFAULT_LANGUAGE.id().to_string(),
        languages: SUPPORTED_LANGUAGES,
    })
}

/// Create the languages router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(languages))
}
