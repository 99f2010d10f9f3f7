use std::sync::Arc;

use crate::config::AppConfig;
use crate::provider::JokeProvider;

/// Shared handler state; cloned per request, everything inside is behind an Arc
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn JokeProvider>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(provider: Arc<dyn JokeProvider>, config: AppConfig) -> Self {
        Self {
            provider,
            config: Arc::new(config),
        }
    }
}
