//! Logging setup.
//!
//! stderr always; a daily-rolling file in `log_dir` when one is configured.
//! `RUST_LOG` overrides the default filter.

use std::path::Path;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "news_sync=info,market_data_ingestor=info";
const LOG_FILE_PREFIX: &str = "news_sync.log";
/// Rotated files kept in `log_dir`, one per day.
pub const LOG_FILES_KEPT: usize = 7;

/// Keeps the background file writer alive. Dropping it flushes pending lines,
/// so `main` holds it until exit.
#[must_use]
pub struct TelemetryGuard {
    _file: Option<WorkerGuard>,
}

/// Midnight-rotated log file in `dir`, pruned to [`LOG_FILES_KEPT`] days.
pub fn file_appender(dir: &Path) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(LOG_FILES_KEPT)
        .build(dir)?)
}

pub fn init(log_dir: Option<&Path>) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = file_appender(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(TelemetryGuard { _file: guard })
}
