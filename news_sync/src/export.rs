//! Flat-file artifacts, one per aligned window plus a rolling `current` file.
//!
//! Markdown (`.md`):
//!
//! ```text
//! ---
//! next_bar: down
//! ---
//!
//! - first title
//! - second title
//! ```
//!
//! TSV (`.txt`) carries the same header followed by `timestamp<TAB>title` lines.
//!
//! Titles are written on a single line: tabs, carriage returns and newlines are
//! replaced by a space. Everything else is passed through verbatim.

use std::{
    borrow::Cow,
    fmt, fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use market_data_ingestor::models::{bar::Direction, news::NewsRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::AlignedWindow;

pub const LABEL_KEY: &str = "next_bar";
pub const CURRENT_STEM: &str = "current";
const FENCE: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Tsv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Tsv => "txt",
        }
    }
}

/// Header label of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Resolved(Direction),
    /// The window is still open.
    Current,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Resolved(d) => fmt::Display::fmt(d, f),
            Label::Current => f.write_str(CURRENT_STEM),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} has no `next_bar` header")]
    MissingHeader { path: PathBuf },
}

/// An artifact read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub label: String,
    pub titles: Vec<String>,
}

/// Single-line form of a title.
pub fn sanitize_title(title: &str) -> Cow<'_, str> {
    if title.contains(['\t', '\r', '\n']) {
        Cow::Owned(title.replace(['\t', '\r', '\n'], " "))
    } else {
        Cow::Borrowed(title)
    }
}

/// Render an artifact body.
pub fn render(records: &[NewsRecord], label: Label, format: ExportFormat) -> String {
    let mut out = match format {
        ExportFormat::Markdown => format!("{FENCE}\n{LABEL_KEY}: {label}\n{FENCE}\n\n"),
        ExportFormat::Tsv => format!("{LABEL_KEY}: {label}\n\n"),
    };
    for r in records {
        let title = sanitize_title(&r.title);
        match format {
            ExportFormat::Markdown => out.push_str(&format!("- {title}\n")),
            ExportFormat::Tsv => out.push_str(&format!("{}\t{title}\n", r.timestamp_str())),
        }
    }
    out
}

fn write_file(path: PathBuf, body: &str) -> Result<PathBuf, ExportError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| ExportError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, body).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "artifact written");
    Ok(path)
}

/// Write `<trade_date>.<ext>` for a window. Empty windows produce no file.
pub fn write_window(
    out_dir: &Path,
    window: &AlignedWindow,
    format: ExportFormat,
) -> Result<Option<PathBuf>, ExportError> {
    if window.records.is_empty() {
        return Ok(None);
    }
    let path = out_dir.join(format!(
        "{}.{}",
        window.trade_date.format("%Y-%m-%d"),
        format.extension()
    ));
    let body = render(&window.records, Label::Resolved(window.label), format);
    write_file(path, &body).map(Some)
}

/// Overwrite `current.<ext>`, even when `records` is empty.
pub fn write_current(
    out_dir: &Path,
    records: &[NewsRecord],
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let path = out_dir.join(format!("{CURRENT_STEM}.{}", format.extension()));
    write_file(path, &render(records, Label::Current, format))
}

fn header_value(line: &str) -> Option<&str> {
    line.strip_prefix(LABEL_KEY)?
        .strip_prefix(':')
        .map(str::trim)
}

/// Parse an artifact written by either format.
pub fn read_artifact(path: &Path) -> Result<Artifact, ExportError> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut label = None;
    let mut titles = Vec::new();
    let mut in_body = false;
    for line in text.lines() {
        if !in_body {
            if let Some(v) = header_value(line) {
                label = Some(v.to_string());
            } else if line.is_empty() && label.is_some() {
                in_body = true;
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        let title = match line.strip_prefix("- ") {
            Some(t) => t,
            None => line.split_once('\t').map_or(line, |(_, t)| t),
        };
        titles.push(title.to_string());
    }

    let label = label.ok_or_else(|| ExportError::MissingHeader {
        path: path.to_path_buf(),
    })?;
    Ok(Artifact { label, titles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(h: u32, title: &str) -> NewsRecord {
        NewsRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 3)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            title,
        )
    }

    #[test]
    fn markdown_body() {
        let body = render(
            &[rec(9, "Oil rises"), rec(10, "Gold\tfalls")],
            Label::Resolved(Direction::Down),
            ExportFormat::Markdown,
        );
        insta::assert_snapshot!(body, @r"
        ---
        next_bar: down
        ---

        - Oil rises
        - Gold falls
        ");
    }

    #[test]
    fn tsv_body() {
        let body = render(&[rec(9, "Oil rises")], Label::Current, ExportFormat::Tsv);
        assert_eq!(body, "next_bar: current\n\n2025-01-03 09:00:00\tOil rises\n");
    }

    #[test]
    fn sanitize_only_allocates_when_needed() {
        assert!(matches!(sanitize_title("plain"), Cow::Borrowed(_)));
        assert_eq!(sanitize_title("a\r\nb"), "a  b");
    }
}
