//! Tracing setup: a terminal layer on stderr and an optional daily log file.

use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chatsh_infrastructure::dto::LoggingConfig;

use crate::Cli;

/// Terminal filter: `--debug`, then `-v`, then `RUST_LOG`, then `warn`.
fn terminal_filter(cli: &Cli) -> EnvFilter {
    if cli.debug {
        EnvFilter::new("debug,rustyline=warn")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process so buffered file output is flushed.
pub fn init(cli: &Cli, config: &LoggingConfig, log_dir: &Path) -> Result<Option<WorkerGuard>> {
    let terminal_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(terminal_filter(cli));

    if !config.file {
        tracing_subscriber::registry().with(terminal_layer).init();
        return Ok(None);
    }

    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, "chatsh.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(terminal_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}
