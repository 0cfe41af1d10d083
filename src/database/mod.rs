use error_stack::{Report, ResultExt};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

use crate::config;

pub mod error;
mod migrations;

pub use error::*;
pub use migrations::MigrationError;

pub type Transaction = sqlx::Transaction<'static, sqlx::Sqlite>;
pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Sqlite>;
pub type Connection = sqlx::SqliteConnection;

#[derive(Clone)]
pub struct Pool {
  pool: sqlx::SqlitePool,
  readonly: bool,
}

impl Pool {
  pub async fn new(cfg: &config::Database) -> Result<Self> {
    let timeout = Duration::from_secs(cfg.timeout_secs.get());
    let mut connect_opts = SqliteConnectOptions::from_str(cfg.url.as_str())
      .change_context(Error::InvalidUrl)?
      .create_if_missing(!cfg.readonly)
      .read_only(cfg.readonly)
      .busy_timeout(timeout);

    if !cfg.is_in_memory() && !cfg.readonly {
      connect_opts = connect_opts.journal_mode(SqliteJournalMode::Wal);
    }

    let mut pool_opts = SqlitePoolOptions::new().acquire_timeout(timeout);

    if cfg.is_in_memory() {
      // An in-memory database lives as long as its last connection,
      // so exactly one is opened and never recycled.
      pool_opts = pool_opts
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None);
    } else {
      pool_opts = pool_opts.max_connections(cfg.pool_size.get());
      if let Some(min_idle) = cfg.min_idle {
        pool_opts = pool_opts.min_connections(min_idle.get());
      }
    }

    let pool = Self {
      pool: pool_opts.connect_lazy_with(connect_opts),
      readonly: cfg.readonly,
    };

    match pool.wait_until_healthy().await {
      Ok(..) => {},
      Err(err) if err.is_unhealthy() => {},
      Err(err) => return Err(err),
    }

    Ok(pool)
  }
}

impl std::fmt::Debug for Pool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.pool.fmt(f)
  }
}

impl Pool {
  #[inline]
  pub fn connections(&self) -> u32 {
    self.pool.size()
  }

  #[inline]
  pub fn is_healthy(&self) -> bool {
    self.connections() > 0
  }

  #[inline]
  pub fn is_readonly(&self) -> bool {
    self.readonly
  }

  /// Opens a write transaction.
  ///
  /// The write lock is taken up front (`BEGIN IMMEDIATE`), so a
  /// concurrent writer waits for it under the busy timeout instead of
  /// failing when its first read turns into a write.
  #[tracing::instrument(name = "db.transaction", skip(self))]
  pub async fn begin(&self) -> Result<Transaction> {
    if self.readonly {
      return Err(Error::Readonly.into());
    }

    match self.pool.begin_with("BEGIN IMMEDIATE").await {
      Err(error @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed)) => {
        Err(Report::new(error).change_context(Error::UnhealthyPool))
      },
      result => result.into_db_error(),
    }
  }

  #[tracing::instrument(name = "db.connect", skip(self))]
  pub async fn get(&self) -> Result<PoolConnection> {
    match self.pool.acquire().await {
      Ok(conn) => Ok(conn),
      Err(error @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed)) => {
        Err(Report::new(error).change_context(Error::UnhealthyPool))
      },
      Err(error) => Err(Report::new(Error::Internal(error))),
    }
  }

  #[tracing::instrument(skip(self))]
  pub async fn wait_until_healthy(&self) -> Result<()> {
    match self.pool.acquire().await {
      Ok(..) => Ok(()),
      Err(e) if !self.is_healthy() => Err(e).change_context(Error::UnhealthyPool),
      Err(err) => Err(Report::new(Error::Internal(err))),
    }
  }
}
