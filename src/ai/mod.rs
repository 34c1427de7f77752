pub mod prompt;
pub mod provider;
pub mod relay;

pub use provider::{ChatReply, CompletionProvider, ResponseMode, TokenStream};
pub use relay::{Relay, RelayError};
