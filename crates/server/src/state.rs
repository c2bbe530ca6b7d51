//! Shared handler state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;

/// Everything a handler needs: configuration and the database pool.
///
/// `PgPool` is already reference-counted internally, so cloning the state is
/// two `Arc` bumps.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    pool: PgPool,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}
