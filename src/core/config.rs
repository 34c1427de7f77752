use std::env;
use std::fs;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Error, Result, anyhow};

pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
pub const DEFAULT_OPENAI_API_HOSTNAME: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WEB_UI_PATH: &str = "./web-ui/src";

/// Which upstream model the relay talks to. Picked once per
/// deployment, never per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    /// Google Gemini `generateContent`, replies with a single JSON body
    Gemini,
    /// OpenAI compatible chat completions, replies with a token stream
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(anyhow!(
                "Unknown provider '{}', expected 'gemini' or 'openai'",
                other
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub gemini_api_url: String,
    pub gemini_api_key: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub upstream_timeout: Duration,
    // Contents of a custom system prompt template
    pub prompt_template: Option<String>,
    pub web_ui_path: String,
}

impl AppConfig {
    /// Read the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the config through `lookup` so callers can supply values
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("SAATHI_PROVIDER") {
            Some(value) => value.parse()?,
            None => ProviderKind::Gemini,
        };

        // Only the credential for the active provider is required
        let gemini_api_key = lookup("GEMINI_API_KEY").unwrap_or_default();
        let openai_api_key = lookup("OPENAI_API_KEY").unwrap_or_default();
        match provider {
            ProviderKind::Gemini if gemini_api_key.is_empty() => {
                return Err(anyhow!("Missing env var GEMINI_API_KEY"));
            }
            ProviderKind::OpenAi if openai_api_key.is_empty() => {
                return Err(anyhow!("Missing env var OPENAI_API_KEY"));
            }
            _ => {}
        }

        let gemini_api_url =
            lookup("SAATHI_GEMINI_API_URL").unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string());
        let openai_api_hostname = lookup("SAATHI_OPENAI_API_HOST")
            .unwrap_or_else(|| DEFAULT_OPENAI_API_HOSTNAME.to_string());
        let openai_model =
            lookup("SAATHI_OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

        let upstream_timeout = match lookup("SAATHI_UPSTREAM_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid SAATHI_UPSTREAM_TIMEOUT_SECS '{}'", secs))?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let prompt_template = match lookup("SAATHI_PROMPT_TEMPLATE_PATH") {
            Some(path) => Some(
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read prompt template {}", path))?,
            ),
            None => None,
        };

        let web_ui_path =
            lookup("SAATHI_WEB_UI_PATH").unwrap_or_else(|| DEFAULT_WEB_UI_PATH.to_string());

        Ok(Self {
            provider,
            gemini_api_url,
            gemini_api_key,
            openai_api_hostname,
            openai_api_key,
            openai_model,
            upstream_timeout: Duration::from_secs(upstream_timeout),
            prompt_template,
            web_ui_path,
        })
    }
}
