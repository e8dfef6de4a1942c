use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::DocumentStore;

/// Shared application state: immutable config plus the store handle
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
