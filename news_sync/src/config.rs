//! TOML configuration.
//!
//! Every section and key is optional; an absent file means all defaults.
//! Unknown keys are rejected so typos fail loudly.
//!
//! ```toml
//! [paths]
//! bars_db = "data/futures.db"
//! news_db = "data/news.db"
//! out_dir = "out"
//! log_dir = "logs"
//!
//! [bars]
//! symbol = "RTS"
//! start_date = "2025-01-01"
//!
//! [news]
//! feed_zone = "gmt"
//! prefilter_lookback_days = 3
//!
//! [export]
//! cutoff = "18:45:00"
//! cutoff_zone = "moscow"
//! store_zone = "gmt"
//! format = "markdown"
//!
//! [http]
//! retries = 3
//! timeout_secs = 5
//! ```
//!
//! Precedence, lowest first: defaults, file, `NEWS_SYNC_*` environment
//! variables, command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{NaiveDate, NaiveTime};
use market_data_ingestor::{
    models::zone::Zone,
    providers::{investing_rss::DEFAULT_PORTAL_URL, moex::DEFAULT_BASE_URL},
    requests::RetryPolicy,
};
use serde::{Deserialize, Serialize};
use shared_utils::env::env_path_override;

use crate::{align::Cutoff, export::ExportFormat};

pub const DEFAULT_CONFIG_PATH: &str = "news_sync.toml";

pub const ENV_BARS_DB: &str = "NEWS_SYNC_BARS_DB";
pub const ENV_NEWS_DB: &str = "NEWS_SYNC_NEWS_DB";
pub const ENV_OUT_DIR: &str = "NEWS_SYNC_OUT_DIR";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: PathsCfg,
    pub bars: BarsCfg,
    pub news: NewsCfg,
    pub export: ExportCfg,
    pub http: HttpCfg,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsCfg {
    pub bars_db: PathBuf,
    pub news_db: PathBuf,
    pub out_dir: PathBuf,
    /// Daily-rolling log files go here; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for PathsCfg {
    fn default() -> Self {
        Self {
            bars_db: PathBuf::from("futures.db"),
            news_db: PathBuf::from("news.db"),
            out_dir: PathBuf::from("out"),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarsCfg {
    /// Exchange asset code, e.g. `RTS` or `Si`.
    pub symbol: String,
    /// First date fetched into an empty store.
    pub start_date: NaiveDate,
    pub moex_base_url: String,
}

impl Default for BarsCfg {
    fn default() -> Self {
        Self {
            symbol: "RTS".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            moex_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsCfg {
    pub portal_url: String,
    /// Zone of `pubDate` values that carry no offset.
    pub feed_zone: Zone,
    /// Drop already stored keys of the last N days before inserting.
    pub prefilter_lookback_days: Option<u32>,
}

impl Default for NewsCfg {
    fn default() -> Self {
        Self {
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            feed_zone: Zone::Gmt,
            prefilter_lookback_days: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportCfg {
    pub cutoff: NaiveTime,
    pub cutoff_zone: Zone,
    /// Zone stored news timestamps are written in.
    pub store_zone: Zone,
    pub format: ExportFormat,
}

impl Default for ExportCfg {
    fn default() -> Self {
        Self {
            cutoff: NaiveTime::from_hms_opt(18, 45, 0).unwrap_or_default(),
            cutoff_zone: Zone::Moscow,
            store_zone: Zone::Gmt,
            format: ExportFormat::Markdown,
        }
    }
}

impl ExportCfg {
    pub fn cutoff(&self) -> Cutoff {
        Cutoff::new(self.cutoff, self.cutoff_zone, self.store_zone)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpCfg {
    pub retries: u32,
    pub timeout_secs: u64,
}

impl Default for HttpCfg {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            retries: p.attempts,
            timeout_secs: p.timeout.as_secs(),
        }
    }
}

impl HttpCfg {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_secs(self.timeout_secs))
    }
}

/// Parse a config from a TOML string.
pub fn load_config_str(s: &str, origin: &Path) -> Result<Config, ConfigError> {
    toml::from_str(s).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// `path`, or [`DEFAULT_CONFIG_PATH`] when none was given.
pub fn resolve_config_path(path: Option<&Path>) -> &Path {
    path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
}

/// Load `path` (or [`DEFAULT_CONFIG_PATH`]), then apply environment overrides.
///
/// A missing file is not an error; a malformed one is. This runs before
/// logging is set up, so it does not log; callers report the defaulting.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = resolve_config_path(path);
    let mut cfg = if path.exists() {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        load_config_str(&s, path)?
    } else {
        Config::default()
    };
    cfg.apply_env();
    Ok(cfg)
}

impl Config {
    fn apply_env(&mut self) {
        if let Some(p) = env_path_override(ENV_BARS_DB) {
            self.paths.bars_db = p;
        }
        if let Some(p) = env_path_override(ENV_NEWS_DB) {
            self.paths.news_db = p;
        }
        if let Some(p) = env_path_override(ENV_OUT_DIR) {
            self.paths.out_dir = p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = load_config_str("", Path::new("x.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.export.cutoff, NaiveTime::from_hms_opt(18, 45, 0).unwrap());
        assert_eq!(cfg.http.retry_policy().attempts, 3);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let cfg = load_config_str(
            r#"
            [export]
            cutoff = "15:45:00"
            cutoff_zone = "gmt"
            format = "tsv"

            [news]
            prefilter_lookback_days = 3
            "#,
            Path::new("x.toml"),
        )
        .unwrap();
        assert_eq!(cfg.export.cutoff_zone, Zone::Gmt);
        assert_eq!(cfg.export.store_zone, Zone::Gmt);
        assert_eq!(cfg.export.format, ExportFormat::Tsv);
        assert_eq!(cfg.news.prefilter_lookback_days, Some(3));
        assert_eq!(cfg.bars.symbol, "RTS");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = load_config_str("[export]\ncutof = \"18:45:00\"\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn default_path_when_none_given() {
        assert_eq!(resolve_config_path(None), Path::new(DEFAULT_CONFIG_PATH));
        let p = Path::new("elsewhere.toml");
        assert_eq!(resolve_config_path(Some(p)), p);
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.bars, BarsCfg::default());
    }
}
