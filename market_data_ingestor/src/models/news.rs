//! News headlines as captured from the syndication feeds.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage format of news timestamps. Lexical order equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One captured headline.
///
/// `timestamp` is a naive wall-clock value in the zone of the store it is
/// headed for (see [`Zone`](crate::models::zone::Zone)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewsRecord {
    pub timestamp: NaiveDateTime,
    /// Feed channel title. May be empty.
    pub section: String,
    pub title: String,
    /// Article link. Not persisted.
    pub link: String,
}

/// Identity of a logical news item: calendar day of the timestamp plus the exact title.
///
/// Repeated polling captures the same item with sub-day jitter; all captures share
/// one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NewsKey {
    pub day: NaiveDate,
    pub title: String,
}

impl NewsRecord {
    pub fn new(timestamp: NaiveDateTime, title: impl Into<String>) -> Self {
        Self {
            timestamp,
            section: String::new(),
            title: title.into(),
            link: String::new(),
        }
    }

    pub fn key(&self) -> NewsKey {
        NewsKey {
            day: self.timestamp.date(),
            title: self.title.clone(),
        }
    }

    /// Timestamp rendered in [`TIMESTAMP_FORMAT`].
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
