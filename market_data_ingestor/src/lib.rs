//! Network collaborators and the shared domain model for the news/bar toolkit.
//!
//! - [`models`]: [`Bar`](models::bar::Bar), [`NewsRecord`](models::news::NewsRecord),
//!   [`Zone`](models::zone::Zone).
//! - [`providers`]: MOEX ISS daily bars and the investing.com RSS portal.
//! - [`requests`]: bounded retry policy and the HTTP fetcher built on it.
//! - [`feeds`]: concurrent fan-out over many RSS feeds.

pub mod feeds;
pub mod models;
pub mod providers;
pub mod requests;
