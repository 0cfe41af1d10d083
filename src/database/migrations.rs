use error_stack::{Result, ResultExt};
use sqlx::migrate::Migrator;
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

use super::Pool;

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Error)]
#[error("Failed to run database migrations")]
pub struct MigrationError;

impl Pool {
  /// Applies every migration under `migrations/` that has not been
  /// applied yet. Running it again is a no-op.
  #[tracing::instrument(skip_all, name = "migrations.run_pending")]
  pub async fn run_migrations(&self) -> Result<(), MigrationError> {
    let now = Instant::now();
    info!("Performing database migrations... (this may take a while)");

    MIGRATOR
      .run(&self.pool)
      .await
      .change_context(MigrationError)?;

    let elapsed = now.elapsed();
    info!("Successfully performed database migrations! took {elapsed:.2?}");

    Ok(())
  }

  /// Versions of the migrations recorded as applied, oldest first.
  pub async fn applied_migrations(&self) -> Result<Vec<i64>, MigrationError> {
    sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
      .fetch_all(&self.pool)
      .await
      .change_context(MigrationError)
  }
}
