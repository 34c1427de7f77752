use http::StatusCode;
use thiserror::Error;

pub const INVALID_KEY_ERROR: &str = "Invalid API key. Please check your Gemini API key.";
pub const RATE_LIMIT_ERROR: &str = "Rate limit exceeded. Please wait a moment before trying again.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const NETWORK_ERROR: &str = "Network error. Please check your internet connection.";
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Shown when the relay answers successfully but without any text
pub const NO_REPLY_FALLBACK: &str = "No response from Gemini.";

/// Why an exchange with the relay failed. The display strings are
/// what `user_facing_message` matches on and must not contain URLs
/// or any digits besides the status code.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API error {}", .0.as_u16())]
    Status(StatusCode),

    #[error("network error: the relay could not be reached")]
    Network(#[source] reqwest::Error),

    #[error("reply stream interrupted")]
    Interrupted(#[source] reqwest::Error),

    #[error("invalid reply from the relay")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Map an error description onto the message shown in the banner.
pub fn user_facing_message(description: &str) -> &'static str {
    if description.contains("401") {
        INVALID_KEY_ERROR
    } else if description.contains("429") {
        RATE_LIMIT_ERROR
    } else if description.contains("500") {
        SERVER_ERROR
    } else if description.contains("network") || description.contains("fetch") {
        NETWORK_ERROR
    } else {
        GENERIC_ERROR
    }
}
