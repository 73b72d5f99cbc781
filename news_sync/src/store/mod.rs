//! SQLite-backed stores for daily bars and captured news.
//!
//! Every failure here is a [`StoreError`] and is fatal for the run. The one
//! recoverable condition, inserting a bar whose trade date already exists, is
//! reported as [`InsertOutcome::Duplicate`] instead.

pub mod bars;
pub mod news;

pub use bars::BarStore;
pub use news::NewsStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("database error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("migrations failed: {0}")]
    Migration(String),

    #[error("unreadable value {value:?} in {column}")]
    Corrupt { column: &'static str, value: String },
}

/// Result of inserting a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A bar for that trade date is already stored; nothing was written.
    Duplicate,
}
