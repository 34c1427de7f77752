//! The system prompt, rendered with Handlebars. Handlebars can't do
//! much out of the box without registering your own helpers which
//! keeps a prompt template supplied through configuration from doing
//! anything surprising.

use std::fmt;

use anyhow::{Result, bail};
use handlebars::Handlebars;
use serde_json::json;

use crate::chat::{ChatMessage, Language};

#[derive(Debug)]
pub enum Prompt {
    System,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub const ENGLISH_DIRECTIVE: &str = "Reply in English.";

const SYSTEM_PROMPT: &str = r#"
🚫 DO NOT output any internal thoughts, monologue, or analysis.
🚫 DO NOT include any <think> or reflection sections in the response.
✅ ONLY respond with a friendly message to the user.

You are a warm, friendly AI companion from India. You talk like a caring friend who is always happy to chat.

Always:
- Respond casually and kindly
- Use a few emojis to show warmth 😊❤️✨
- Be respectful and fun
- Stay present in the moment instead of reflecting

Language mode: {{language_directive}}

You MUST NOT:
- Include internal thinking like "<think> ... </think>"
- Reflect on the conversation or explain what you are doing
- Break the fourth wall or talk about yourself as an AI

💬 Just give friendly, casual replies to the user's message as if you are chatting with them directly.

❗REMEMBER: NO planning, NO thinking tags in the reply. ONLY the user-facing reply.
"#;

/// The instruction telling the model which language to answer in.
pub fn language_directive(language: &Language) -> String {
    if language.is_english() {
        return ENGLISH_DIRECTIVE.to_string();
    }
    let name = language.label();
    format!(
        "Reply exclusively in {name}, written in the native {name} script. \
         Never transliterate {name} into Latin letters. \
         Do not mix in English unless a word has no {name} equivalent that keeps the meaning."
    )
}

/// Registry holding the system prompt template.
pub struct PromptTemplate {
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Register a template, the built-in one when `source` is `None`.
    pub fn new(source: Option<&str>) -> Result<Self> {
        let source = source.unwrap_or(SYSTEM_PROMPT);
        if !source.contains("language_directive") {
            bail!("Prompt template must reference {{{{language_directive}}}}");
        }

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // Prompts are plain text, HTML escaping would mangle quotes
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string(&Prompt::System.to_string(), source)?;
        Ok(Self { registry })
    }

    /// Render the system prompt for `language`. The output depends on
    /// nothing but the template and the language.
    pub fn render(&self, language: &Language) -> Result<String> {
        let data = json!({
            "language": language.label(),
            "native_name": language.native(),
            "language_directive": language_directive(language),
        });
        let prompt = self
            .registry
            .render(&Prompt::System.to_string(), &data)?;
        Ok(prompt)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(None).expect("Failed to register template")
    }
}

/// Flatten the system prompt and the conversation into one block of
/// text for providers that take a single prompt instead of a list of
/// chat messages.
pub fn flatten_transcript(system_prompt: &str, messages: &[ChatMessage]) -> String {
    let transcript = messages
        .iter()
        .map(|m| format!("{}: {}", m.role.speaker(), m.content))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\n{}", system_prompt, transcript)
}
