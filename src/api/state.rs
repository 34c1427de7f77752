use std::sync::Arc;

use crate::ai::Relay;
use crate::core::AppConfig;

/// Handlers only ever read the state, the relay holds nothing that
/// changes between requests.
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub relay: Relay,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(relay: Relay, config: AppConfig) -> Self {
        Self { relay, config }
    }
}
