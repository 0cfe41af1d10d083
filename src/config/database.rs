use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::{Validate, ValidateError};

use crate::util::Sensitive;

/// Configuration for connecting to the SQLite database.
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// Connection URL of the SQLite database, for example
    /// `sqlite://obraconecta.db` or `sqlite::memory:`.
    ///
    /// **Environment variables**:
    /// - `OBRACONECTA_DB_URL` or `DATABASE_URL`
    pub url: Sensitive<String>,
    /// Maximum amount of connections the pool keeps open.
    ///
    /// **Environment variables**:
    /// - `OBRACONECTA_DB_POOL_SIZE`
    #[serde(default = "Database::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Minimum idle connections kept around between requests.
    ///
    /// **Environment variables**:
    /// - `OBRACONECTA_DB_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// How long a request may wait for a connection before it fails.
    ///
    /// **Environment variables**:
    /// - `OBRACONECTA_DB_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
    /// Opens the database in read-only mode. Every write is answered
    /// with `503 Service Unavailable`.
    ///
    /// **Environment variables**:
    /// - `OBRACONECTA_DB_READONLY`
    #[serde(default)]
    pub readonly: bool,
    /// Applies pending migrations when the server starts.
    ///
    /// **Environment variables**:
    /// - `OBRACONECTA_DB_AUTO_MIGRATE`
    #[serde(default = "Database::default_auto_migrate")]
    pub auto_migrate: bool,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    const fn default_auto_migrate() -> bool {
        true
    }

    /// Whether the database lives in memory and disappears with the
    /// last connection.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        let url = self.url.as_str();
        url.contains(":memory:") || url.contains("mode=memory")
    }
}

impl Validate for Database {
    fn validate(&self) -> Result<(), ValidateError> {
        let url = self.url.as_str();
        let mut errors = ValidateError::builder();
        errors.check(
            !url.starts_with("sqlite:") || !validator::extras::validate_url(url),
            "db.url",
            "Invalid SQLite connection URL",
        );
        errors.check(
            self.min_idle.is_some_and(|n| n > self.pool_size),
            "db.min_idle",
            "Minimum idle connections must not exceed the pool size",
        );
        errors.build().into_result()
    }
}
