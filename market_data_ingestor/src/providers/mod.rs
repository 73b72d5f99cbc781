//! Provider abstraction for the two upstream collaborators.
//!
//! - [`BarProvider`]: one daily bar for a date and asset code (MOEX ISS in
//!   [`moex`]).
//! - [`FeedSource`]: feed discovery from a portal page plus fetch/parse of a
//!   single feed (investing.com in [`investing_rss`]).
//!
//! Both traits are async and object safe, so the runtime can hold them as
//! `Box<dyn ... + Send + Sync>` and tests can substitute in-memory fakes.
//!
//! Exhausted retries are not errors here: implementations return `Ok(None)` or
//! an empty list. Errors are reserved for responses that arrived but could not
//! be understood.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use chrono::NaiveDate;
//! use market_data_ingestor::models::bar::Bar;
//! use market_data_ingestor::providers::{BarProvider, ProviderError};
//!
//! struct NoBars;
//!
//! #[async_trait]
//! impl BarProvider for NoBars {
//!     async fn fetch_daily_bar(
//!         &self,
//!         _date: NaiveDate,
//!         _symbol: &str,
//!     ) -> Result<Option<Bar>, ProviderError> {
//!         Ok(None)
//!     }
//! }
//! ```

pub mod investing_rss;
pub mod moex;

use async_trait::async_trait;
use chrono::NaiveDate;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::Bar, news::NewsRecord};

/// Source of daily bars.
#[async_trait]
pub trait BarProvider {
    /// Fetch the front-month bar traded on `date` for asset code `symbol`.
    ///
    /// `Ok(None)` means no data: a non-trading day, an ambiguous contract
    /// choice, or an upstream that stayed unreachable after all retries.
    async fn fetch_daily_bar(
        &self,
        date: NaiveDate,
        symbol: &str,
    ) -> Result<Option<Bar>, ProviderError>;
}

/// Source of syndicated headlines.
#[async_trait]
pub trait FeedSource {
    /// Resolve feed endpoints listed on a portal page.
    async fn list_feed_urls(&self, portal_url: &str) -> Result<Vec<String>, ProviderError>;

    /// Fetch one feed and convert its items into news records.
    async fn fetch_feed(&self, url: &str) -> Result<Vec<NewsRecord>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a provider implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// Network failure, timeout or non-success status. Retried by the fetcher.
    #[snafu(display("request to {url} failed: {source}"))]
    Request {
        url: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// A feed body arrived but is not well-formed XML.
    #[snafu(display("malformed feed {url}: {source}"))]
    MalformedFeed {
        url: String,
        source: roxmltree::Error,
        backtrace: Backtrace,
    },

    /// An exchange response arrived but does not have the expected shape.
    #[snafu(display("unexpected response from {url}: {message}"))]
    UnexpectedResponse {
        url: String,
        message: String,
        backtrace: Backtrace,
    },
}
