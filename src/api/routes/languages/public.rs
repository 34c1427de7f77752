//! Public types for the languages API
use serde::Serialize;

use crate::chat::LanguageInfo;

#[derive(Serialize)]
pub struct LanguagesResponse {
    pub default: String,
    pub languages: &'static [LanguageInfo],
}
