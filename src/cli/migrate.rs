use clap::Parser;
use error_stack::{Result, ResultExt};
use obraconecta::config::Server as Config;
use obraconecta::database::{MigrationError, Pool};
use obraconecta::logging;
use tracing::info;

/// Apply pending database migrations and exit
#[derive(Debug, Parser)]
pub struct MigrateCommand {}

pub fn run(_args: MigrateCommand) -> Result<(), MigrationError> {
    let config = Config::load().change_context(MigrationError)?;
    logging::init(&config.logging).change_context(MigrationError)?;

    if config.db.readonly {
        return Err(error_stack::Report::new(MigrationError))
            .attach_printable("database is configured as read-only");
    }

    super::runtime(None)
        .change_context(MigrationError)
        .attach_printable("could not build tokio runtime")?
        .block_on(async move {
            let pool = Pool::new(&config.db).await.change_context(MigrationError)?;
            pool.run_migrations().await?;

            let applied = pool.applied_migrations().await?;
            info!(?applied, "Database schema is up to date");
            Ok(())
        })
}
