use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    align::{Cutoff, align_windows, current_window},
    context::RunContext,
    dedup,
    export::{ExportFormat, write_current, write_window},
    store::{BarStore, NewsStore},
};

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub out_dir: PathBuf,
    pub cutoff: Cutoff,
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub windows: Vec<PathBuf>,
    pub current: Option<PathBuf>,
    pub purged: usize,
}

/// Purge duplicates, then write one artifact per closed window and refresh
/// `current`.
#[instrument(skip_all, fields(out_dir = %settings.out_dir.display()))]
pub fn run_export(
    bars: &mut BarStore,
    news: &mut NewsStore,
    settings: &ExportSettings,
    ctx: &RunContext,
) -> anyhow::Result<ExportReport> {
    let purged = dedup::purge(news)?.deleted;

    let series = bars.load_bars()?;
    if series.is_empty() {
        warn!("bar store is empty, nothing to export");
        return Ok(ExportReport {
            purged,
            ..Default::default()
        });
    }

    let windows = align_windows(&series, &settings.cutoff, news)?;
    let mut written = Vec::with_capacity(windows.len());
    for w in &windows {
        if let Some(path) = write_window(&settings.out_dir, w, settings.format)? {
            written.push(path);
        }
    }

    let as_of = ctx.as_of_in(settings.cutoff.store_zone);
    let current = match current_window(&series, &settings.cutoff, as_of, news)? {
        Some(records) => Some(write_current(&settings.out_dir, &records, settings.format)?),
        None => None,
    };

    info!(windows = written.len(), current = current.is_some(), "export done");
    Ok(ExportReport {
        windows: written,
        current,
        purged,
    })
}

/// Fail with a diagnostic when an input store does not exist.
///
/// Opening a missing SQLite path would silently create an empty store.
pub fn require_existing(path: &Path, what: &str) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("{what} not found: {}", path.display());
    }
    Ok(())
}
