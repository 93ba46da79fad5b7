use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::TableStore;

/// Shared handler state: the read-only config (carrying the scoping toggle)
/// and the store handle. No other cross-request state exists.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn TableStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn TableStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
