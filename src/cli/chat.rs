use std::io::{self, Write};

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{Language, SUPPORTED_LANGUAGES};
use crate::client::{Conversation, HttpTransport, SUGGESTIONS, Submission};

fn print_help() {
    println!("Commands:");
    println!("  /lang <id>   switch language (see /languages)");
    println!("  /languages   list supported languages");
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        println!("  /{}           send \"{}\"", i + 1, suggestion);
    }
    println!("  /dismiss     hide the last error");
    println!("  /quit        exit");
}

fn print_error(conversation: &Conversation) {
    if let Some(err) = conversation.error() {
        println!("⚠ {}", err);
    }
}

pub async fn run(relay_url: &str, language: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let transport = HttpTransport::new(relay_url);
    let mut conversation = Conversation::new(Language::parse(language));

    println!("👋 Hello! I'm your AI friend! Type /help for commands.");

    loop {
        println!("{}", conversation.placeholder());
        let readline = rl.readline(">>> ");
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let text = match line.trim() {
            "/quit" => break,
            "/help" => {
                print_help();
                continue;
            }
            "/languages" => {
                for lang in SUPPORTED_LANGUAGES {
                    println!("  {:<10} {}", lang.id, lang.native);
                }
                continue;
            }
            "/dismiss" => {
                conversation.dismiss_error();
                continue;
            }
            cmd if cmd.starts_with("/lang ") => {
                let language = Language::parse(cmd.trim_start_matches("/lang "));
                println!("Language set to {}", language.native());
                conversation.set_language(language);
                continue;
            }
            cmd if cmd.starts_with('/') => {
                match cmd[1..]
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| SUGGESTIONS.get(i))
                {
                    Some(suggestion) => suggestion.to_string(),
                    None => {
                        print_help();
                        continue;
                    }
                }
            }
            other => other.to_string(),
        };

        // Blank lines never reach the relay
        if !conversation.can_submit(&text) {
            continue;
        }
        let _ = rl.add_history_entry(text.as_str());

        let mut on_chunk = |chunk: &str| {
            print!("{}", chunk);
            let _ = io::stdout().flush();
        };
        match conversation.submit(&transport, &text, &mut on_chunk).await {
            Submission::Replied => println!(),
            Submission::Failed => print_error(&conversation),
            Submission::Ignored => {}
        }
    }

    Ok(())
}
