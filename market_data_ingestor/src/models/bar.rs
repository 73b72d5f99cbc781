//! Canonical in-memory representation of one daily trading bar.
//!
//! Bars are produced by a [`BarProvider`](crate::providers::BarProvider) and stored
//! once per trade date. The derived [`Direction`] is what the exporter attaches to
//! each news window.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLC bar for the front-month contract of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading session date. Unique within a bar store.
    pub trade_date: NaiveDate,

    /// Exchange security id of the contract the bar was taken from (e.g. "RIH5").
    pub sec_id: String,

    /// Opening price.
    pub open: f64,

    /// Lowest price of the session.
    pub low: f64,

    /// Highest price of the session.
    pub high: f64,

    /// Closing price.
    pub close: f64,

    /// Last trading date of the contract. Never earlier than `trade_date`.
    pub last_trade_date: NaiveDate,
}

impl Bar {
    /// `Up` when the bar closed above its open, `Down` otherwise (ties are `Down`).
    pub fn direction(&self) -> Direction {
        if self.open < self.close {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Up/down label of a closed bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
