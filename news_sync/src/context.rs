//! Reference time for one run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use market_data_ingestor::models::zone::Zone;

/// Everything a run would otherwise read from the wall clock.
///
/// Built once in `main` from [`RunContext::now`]; tests construct it with a
/// fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub as_of: DateTime<Utc>,
}

impl RunContext {
    pub fn now() -> Self {
        Self { as_of: Utc::now() }
    }

    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    /// `as_of` as wall-clock time in `zone`.
    pub fn as_of_in(&self, zone: Zone) -> NaiveDateTime {
        zone.wall_clock(self.as_of)
    }

    /// Calendar date of `as_of` in `zone`.
    pub fn today_in(&self, zone: Zone) -> NaiveDate {
        self.as_of_in(zone).date()
    }
}
