use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use validator::{Validate, ValidateError};

use super::{Database, Logging, ParseError};
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// **Environment variable**: `OBRACONECTA_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// **Environment variables**: `OBRACONECTA_PORT` or `PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// Amount of HTTP worker threads. Defaults to the amount of
    /// available CPU cores.
    ///
    /// **Environment variable**: `OBRACONECTA_WORKERS`
    #[serde(default = "Server::default_workers")]
    pub workers: usize,
    /// Largest JSON body accepted, in bytes. CNPJ cards are uploaded
    /// inline so this has to fit a scanned document.
    ///
    /// **Environment variable**: `OBRACONECTA_BODY_LIMIT`
    #[serde(default = "Server::default_body_limit")]
    pub body_limit: usize,
    #[serde(default)]
    pub cors: Cors,
    pub db: Database,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cors {
    /// Origins allowed to call the API from a browser.
    ///
    /// **Environment variable**: `OBRACONECTA_CORS_ALLOWED_ORIGINS`
    #[serde(default = "Cors::default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for Cors {
    fn default() -> Self {
        Self {
            allowed_origins: Self::default_allowed_origins(),
        }
    }
}

impl Cors {
    fn default_allowed_origins() -> Vec<String> {
        vec!["http://localhost:8080".into()]
    }
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();
        Self::from_figment(&Self::figment())
    }

    pub fn from_figment(figment: &figment::Figment) -> Result<Self, ParseError> {
        let config = figment
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }

    #[must_use]
    pub fn address(&self) -> (IpAddr, u16) {
        (self.ip, self.port)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "obraconecta.toml";
    const DEFAULT_PORT: u16 = 8081;
    const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

    fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_workers() -> usize {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }

    fn default_body_limit() -> usize {
        Self::DEFAULT_BODY_LIMIT
    }

    /// Creates a default [`Figment`] object to load server
    /// configuration from. Exposed to the crate for testing.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // Keys with underscores in them cannot be told apart from
            // nested keys, so they are spelled out.
            .merge(Env::prefixed("OBRACONECTA_").map(|v| match v.as_str() {
                "BODY_LIMIT" => "body_limit".into(),
                "CORS_ALLOWED_ORIGINS" => "cors.allowed_origins".into(),

                "DB_POOL_SIZE" => "db.pool_size".into(),
                "DB_MIN_IDLE" => "db.min_idle".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),
                "DB_AUTO_MIGRATE" => "db.auto_migrate".into(),

                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL", "PORT"])
                    .map(|v| match v.as_str() {
                        "DATABASE_URL" => "db.url".into(),
                        _ => v.into(),
                    }),
            )
    }
}

impl Validate for Server {
    fn validate(&self) -> std::result::Result<(), ValidateError> {
        let mut errors = ValidateError::builder();
        errors.check(self.workers == 0, "workers", "At least one worker is required");
        errors.check(self.body_limit == 0, "body_limit", "Body limit must not be zero");

        for origin in &self.cors.allowed_origins {
            errors.check(
                origin != "*" && !validator::extras::validate_url(origin),
                "cors.allowed_origins",
                format!("Invalid origin {origin:?}"),
            );
        }

        if let Err(error) = self.db.validate() {
            errors.merge(error);
        }

        errors.build().into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::num::{NonZeroU32, NonZeroU64};

    #[test]
    fn defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite::memory:");

            let config = Server::from_figment(&Server::figment()).unwrap();
            assert_eq!(config.address(), (Server::default_ip(), 8081));
            assert_eq!(config.body_limit, 10 * 1024 * 1024);
            assert_eq!(config.cors.allowed_origins, ["http://localhost:8080"]);
            assert!(config.db.auto_migrate);
            assert!(!config.db.readonly);
            assert!(config.workers > 0);

            Ok(())
        });
    }

    #[test]
    fn env_aliases() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite://obraconecta.db");
            jail.set_env("PORT", "9000");

            jail.set_env("OBRACONECTA_BODY_LIMIT", "2048");
            jail.set_env("OBRACONECTA_DB_POOL_SIZE", "10");
            jail.set_env("OBRACONECTA_DB_MIN_IDLE", "2");
            jail.set_env("OBRACONECTA_DB_TIMEOUT_SECS", "30");
            jail.set_env("OBRACONECTA_DB_READONLY", "true");
            jail.set_env("OBRACONECTA_DB_AUTO_MIGRATE", "false");
            jail.set_env("OBRACONECTA_LOGGING_STYLE", "json");

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.db.url.as_str(), "sqlite://obraconecta.db");
            assert_eq!(config.port, 9000);
            assert_eq!(config.body_limit, 2048);
            assert_eq!(config.db.pool_size, NonZeroU32::new(10).unwrap());
            assert_eq!(config.db.min_idle, NonZeroU32::new(2));
            assert_eq!(config.db.timeout_secs, NonZeroU64::new(30).unwrap());
            assert!(config.db.readonly);
            assert!(!config.db.auto_migrate);
            assert_eq!(config.logging.style, crate::config::LoggingStyle::JSON);

            Ok(())
        });
    }

    #[test]
    fn toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "obraconecta.toml",
                r#"
                    port = 3000

                    [cors]
                    allowed_origins = ["https://obraconecta.com.br"]

                    [db]
                    url = "sqlite://data/obraconecta.db"
                "#,
            )?;

            let config = Server::from_figment(&Server::figment()).unwrap();
            assert_eq!(config.port, 3000);
            assert_eq!(config.cors.allowed_origins, ["https://obraconecta.com.br"]);
            assert_eq!(config.db.url.as_str(), "sqlite://data/obraconecta.db");

            Ok(())
        });
    }

    #[test]
    fn rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "obraconecta.db");
            assert!(Server::from_figment(&Server::figment()).is_err());

            jail.set_env("DATABASE_URL", "sqlite::memory:");
            jail.set_env("OBRACONECTA_WORKERS", "0");
            assert!(Server::from_figment(&Server::figment()).is_err());

            Ok(())
        });
    }
}
