use anyhow::Context;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::shared::config::{CONFIG, LoggingConfig};

/// File name prefix of the daily-rolled log under `log_dir`.
pub const LOG_FILE_PREFIX: &str = "ts_dataset.log";

/// Installs the global subscriber from the process-wide settings.
pub fn init() -> anyhow::Result<()> {
    init_with(&CONFIG.logging)
}

/// Console plus daily-rolled file output, each with its own level.
///
/// Fails without touching the global subscriber when a level does not parse, and
/// fails when a subscriber is already installed.
pub fn init_with(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let (stdout_level, file_level) = levels(cfg)?;

    let file_writer = tracing_appender::rolling::daily(&cfg.log_dir, LOG_FILE_PREFIX);
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).with_filter(stdout_level))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(file_level),
        )
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    info!(log_dir = %cfg.log_dir, %stdout_level, %file_level, "Logging initialized");
    Ok(())
}

/// Parses the stdout and file levels, naming the offending setting on failure.
pub fn levels(cfg: &LoggingConfig) -> anyhow::Result<(LevelFilter, LevelFilter)> {
    let stdout = cfg
        .stdout_level
        .parse::<LevelFilter>()
        .with_context(|| format!("invalid logging.stdout_level {:?}", cfg.stdout_level))?;
    let file = cfg
        .file_level
        .parse::<LevelFilter>()
        .with_context(|| format!("invalid logging.file_level {:?}", cfg.file_level))?;
    Ok((stdout, file))
}

#[cfg(test)]
pub fn init_for_tests() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter =
            EnvFilter::from_default_env().add_directive("ts_dataset=debug".parse().unwrap());

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
