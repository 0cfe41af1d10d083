use clap::Parser;
use error_stack::{Result, ResultExt};
use obraconecta::config::Server as Config;
use obraconecta::http::StartServerError;
use obraconecta::{http, logging, App};
use std::net::IpAddr;
use std::num::NonZeroUsize;

/// Expose the obraconecta HTTP API
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    let mut config = Config::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    logging::init(&config.logging).change_context(StartServerError)?;
    if cfg!(debug_assertions) {
        tracing::info!("Starting server with config: {config:#?}");
    }

    super::runtime(Some(config.workers.max(1)))
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(async move {
            let app = App::new(config).await.change_context(StartServerError)?;
            http::run(app).await
        })
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = workers.get();
        }
    }
}
