//! The languages a conversation can be held in.
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LanguageInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub native: &'static str,
}

/// Languages offered by the client, in display order.
pub const SUPPORTED_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo { id: "english", label: "English", native: "English" },
    LanguageInfo { id: "hindi", label: "Hindi", native: "हिंदी" },
    LanguageInfo { id: "tamil", label: "Tamil", native: "தமிழ்" },
    LanguageInfo { id: "telugu", label: "Telugu", native: "తెలుగు" },
    LanguageInfo { id: "bengali", label: "Bengali", native: "বাংলা" },
    LanguageInfo { id: "marathi", label: "Marathi", native: "मराठी" },
    LanguageInfo { id: "gujarati", label: "Gujarati", native: "ગુજરાતી" },
    LanguageInfo { id: "kannada", label: "Kannada", native: "ಕನ್ನಡ" },
    LanguageInfo { id: "malayalam", label: "Malayalam", native: "മലയാളം" },
    LanguageInfo { id: "punjabi", label: "Punjabi", native: "ਪੰਜਾਬੀ" },
];

pub const DEFAULT_LANGUAGE: Language = Language::English;

/// The language selected for a conversation.
///
/// Identifiers outside of the supported set are kept as `Other` rather
/// than rejected. Anything that isn't English gets the native script
/// treatment when the prompt is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    English,
    Hindi,
    Tamil,
    Telugu,
    Bengali,
    Marathi,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
    Other(String),
}

impl Language {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "english" => Language::English,
            "hindi" => Language::Hindi,
            "tamil" => Language::Tamil,
            "telugu" => Language::Telugu,
            "bengali" => Language::Bengali,
            "marathi" => Language::Marathi,
            "gujarati" => Language::Gujarati,
            "kannada" => Language::Kannada,
            "malayalam" => Language::Malayalam,
            "punjabi" => Language::Punjabi,
            _ => Language::Other(value.trim().to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Tamil => "tamil",
            Language::Telugu => "telugu",
            Language::Bengali => "bengali",
            Language::Marathi => "marathi",
            Language::Gujarati => "gujarati",
            Language::Kannada => "kannada",
            Language::Malayalam => "malayalam",
            Language::Punjabi => "punjabi",
            Language::Other(value) => value,
        }
    }

    /// Display details, `None` for languages outside the supported set
    pub fn info(&self) -> Option<&'static LanguageInfo> {
        SUPPORTED_LANGUAGES.iter().find(|i| i.id == self.id())
    }

    /// English name used in prompts, falls back to the raw identifier
    pub fn label(&self) -> &str {
        match self.info() {
            Some(info) => info.label,
            None => self.id(),
        }
    }

    /// Name written in the language's own script
    pub fn native(&self) -> &str {
        match self.info() {
            Some(info) => info.native,
            None => self.id(),
        }
    }

    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }
}

impl Default for Language {
    fn default() -> Self {
        DEFAULT_LANGUAGE
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Language::parse(&value)
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.id().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}
