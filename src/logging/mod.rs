use error_stack::{Result, ResultExt};
use std::io::{self, IsTerminal};
use thiserror::Error;
use tracing::{level_filters::LevelFilter, warn, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::{time::ChronoUtc, MakeWriter, TestWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize logging")]
pub struct LoggingInitError;

/// Installs the global subscriber, writing to stderr.
pub fn init(config: &Logging) -> Result<(), LoggingInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let targets = match (&rust_log, config.targets.is_empty()) {
        (Some(rust_log), true) => rust_log.as_str(),
        _ => config.targets.as_str(),
    };

    let console = console_layer(io::stderr, io::stderr().is_terminal(), config.style, targets);
    let registry = Registry::default().with(console).with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(LoggingInitError)
        .attach_printable("already initialized logging")?;

    if rust_log.is_some() && !config.targets.is_empty() {
        warn!("Both `RUST_LOG` and `OBRACONECTA_LOGGING_TARGETS` are set, using the latter");
    }

    Ok(())
}

/// Sends logs to the test harness. Safe to call from every test.
pub fn init_for_tests() {
    let targets = std::env::var("RUST_LOG").unwrap_or_default();
    let console = console_layer(TestWriter::new, false, LoggingStyle::Full, &targets);
    let registry = Registry::default().with(console).with(ErrorLayer::default());

    // only the first test gets to install it
    tracing::subscriber::set_global_default(registry).ok();
}

fn console_layer<S, W>(
    writer: W,
    ansi: bool,
    style: LoggingStyle,
    targets: &str,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = make_env_filter(targets);
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(ansi && style != LoggingStyle::JSON)
        .with_timer(ChronoUtc::new(TIMESTAMP_FORMAT.into()))
        .with_writer(writer);

    match style {
        LoggingStyle::Compact => layer.compact().with_filter(filter).boxed(),
        LoggingStyle::Full => layer.with_filter(filter).boxed(),
        LoggingStyle::Pretty => layer.pretty().with_filter(filter).boxed(),
        LoggingStyle::JSON => layer.json().with_filter(filter).boxed(),
    }
}

/// RFC 3339 in UTC, down to the microsecond.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
