#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use market_data_ingestor::models::{bar::Bar, news::NewsRecord};
use news_sync::align::NewsSource;
use news_sync::store::{BarStore, NewsStore, StoreError};
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDir {
    pub dir: TempDir, // keep alive for the life of the test
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}

pub fn setup_news() -> (TestDir, NewsStore) {
    let dir = TestDir::new();
    let store = NewsStore::open(&dir.path("news.db")).expect("open news store");
    (dir, store)
}

pub fn setup_bars() -> (TestDir, BarStore) {
    let dir = TestDir::new();
    let store = BarStore::open(&dir.path("futures.db")).expect("open bar store");
    (dir, store)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn rec(s: &str, title: &str) -> NewsRecord {
    NewsRecord::new(ts(s), title)
}

pub fn bar(trade_date: NaiveDate, open: f64, close: f64) -> Bar {
    Bar {
        trade_date,
        sec_id: "RIH5".into(),
        open,
        low: open.min(close),
        high: open.max(close),
        close,
        last_trade_date: d(2025, 3, 20),
    }
}

/// News held in memory; remembers every window it was asked for.
#[derive(Default)]
pub struct MemoryNews {
    pub records: Vec<NewsRecord>,
    pub queries: Vec<(NaiveDateTime, NaiveDateTime)>,
}

impl MemoryNews {
    pub fn new(records: Vec<NewsRecord>) -> Self {
        Self {
            records,
            queries: Vec::new(),
        }
    }
}

impl NewsSource for MemoryNews {
    fn news_between(
        &mut self,
        lower: NaiveDateTime,
        upper: NaiveDateTime,
    ) -> Result<Vec<NewsRecord>, StoreError> {
        self.queries.push((lower, upper));
        Ok(self
            .records
            .iter()
            .filter(|r| r.timestamp > lower && r.timestamp < upper)
            .cloned()
            .collect())
    }
}
