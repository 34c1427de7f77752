//! The conversation client. Holds the history in memory, drives one
//! exchange with the relay at a time and turns failures into messages
//! a person can act on.
mod conversation;
mod error;
mod transport;

pub use conversation::{Conversation, ExchangeState, SUGGESTIONS, Submission};
pub use error::{
    ClientError, GENERIC_ERROR, INVALID_KEY_ERROR, NETWORK_ERROR, NO_REPLY_FALLBACK,
    RATE_LIMIT_ERROR, SERVER_ERROR, user_facing_message,
};
pub use transport::{ChunkSink, HttpTransport, RelayTransport};
