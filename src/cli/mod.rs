use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

mod migrate;
mod server;

/// Command line options for obraconecta.
#[derive(Debug, Parser)]
#[command(
    about = "Backend of the obraconecta construction marketplace",
    version,
    author,
    long_about
)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, Error)]
#[error("obraconecta command failed")]
pub struct CommandError;

impl Cli {
    pub fn run(self) -> Result<(), CommandError> {
        match self.subcommand {
            Subcommand::Server(args) => self::server::run(args).change_context(CommandError),
            Subcommand::Migrate(args) => self::migrate::run(args).change_context(CommandError),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Server(self::server::ServerCommand),
    Migrate(self::migrate::MigrateCommand),
}

/// Multi-threaded tokio runtime with every driver enabled.
fn runtime(workers: Option<usize>) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(workers) = workers {
        builder.worker_threads(workers);
    }
    builder.enable_all().build()
}
