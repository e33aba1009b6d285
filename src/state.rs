use std::sync::Arc;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::modules::students::store::{PgStudentStore, StudentStore};

/// Shared application state. The store is held behind the trait so tests can
/// swap in the in-memory backend.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub cors_config: CorsConfig,
}

pub async fn init_app_state() -> AppState {
    AppState {
        store: Arc::new(PgStudentStore::new(init_db_pool().await)),
        cors_config: CorsConfig::from_env(),
    }
}
