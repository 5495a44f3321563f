use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::storage::WarRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<RwLock<WarRepository>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repo: WarRepository, config: AppConfig) -> Self {
        Self {
            repo: Arc::new(RwLock::new(repo)),
            config: Arc::new(config),
        }
    }
}
