//! investing.com RSS: portal discovery plus RSS 2.0 parsing.

pub mod discover;
pub mod parse;
pub mod provider;

pub use provider::{DEFAULT_PORTAL_URL, InvestingRssProvider};
