//! MOEX ISS futures history.
//!
//! Two endpoints are used:
//! - `/iss/history/engines/futures/markets/forts/securities.json?date=..&assetcode=..`
//!   lists every contract of an asset traded on a date.
//! - `/iss/securities/{SECID}.json` describes one contract, including its last
//!   trading date.
//!
//! The daily bar of an asset is the row of the nearest-expiring contract that is
//! still trading after the date.

pub mod provider;
pub mod response;

pub use provider::{DEFAULT_BASE_URL, MoexProvider, select_front_contract};
