use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{config, database};

#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub db: database::Pool,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all)]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let db = database::Pool::new(&cfg.db)
            .await
            .change_context(AppError)?;

        if cfg.db.auto_migrate && !cfg.db.readonly {
            db.run_migrations().await.change_context(AppError)?;
        }

        Ok(Self {
            config: Arc::new(cfg),
            db,
        })
    }

    /// App backed by a fresh, migrated in-memory database.
    #[cfg(test)]
    pub(crate) async fn new_for_tests() -> Self {
        crate::logging::init_for_tests();
        Self::new(crate::test_utils::config())
            .await
            .expect("failed to set up test app")
    }
}

impl App {
    #[tracing::instrument(skip_all)]
    pub async fn db_write(&self) -> Result<database::Transaction, database::Error> {
        self.db.begin().await
    }

    #[tracing::instrument(skip_all)]
    pub async fn db_read(&self) -> Result<database::PoolConnection, database::Error> {
        self.db.get().await
    }
}
