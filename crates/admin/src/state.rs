//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AdminConfig;
use crate::services::ImageStore;

/// Application state shared across all handlers.
///
/// Everything an operation needs travels through here; there are no
/// process-wide globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: SqlitePool,
    images: ImageStore,
}

impl AppState {
    /// Bundle up configuration, the database pool, and the image store.
    #[must_use]
    pub fn new(config: AdminConfig, pool: SqlitePool, images: ImageStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.inner.images
    }
}
