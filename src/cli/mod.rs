use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod languages;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the chat relay and serve the browser client
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Chat with the relay from the terminal
    Chat {
        /// Base URL of a running relay
        #[arg(long, default_value = "http://127.0.0.1:2222")]
        relay_url: String,

        /// Language to chat in
        #[arg(long, default_value = "english")]
        language: String,
    },
    /// List the supported languages
    Languages {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Chat {
            relay_url,
            language,
        }) => {
            chat::run(&relay_url, &language).await?;
        }
        Some(Command::Languages {}) => {
            languages::run();
        }
        None => {}
    }

    Ok(())
}
