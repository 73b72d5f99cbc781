//! Time zones of stored and fetched timestamps.
//!
//! Only two zones ever appear: GMT and Moscow wall-clock. Moscow has not observed
//! DST since 2014-10-26, so it is modelled as a fixed `+03:00` offset. Timestamps
//! before that date, or any future DST reintroduction, would need a real tz
//! database lookup instead.
//!
//! Examples
//! - Moscow 18:45 -> GMT 15:45 on the same day
//! - Moscow 01:30 -> GMT 22:30 on the previous day

use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MOSCOW_OFFSET_SECS: i32 = 3 * 3600;

/// Zone a naive wall-clock timestamp is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// GMT / UTC.
    Gmt,
    /// Europe/Moscow, fixed +03:00.
    Moscow,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown zone: {0} (expected \"gmt\" or \"moscow\")")]
pub struct ZoneParseError(String);

impl Zone {
    pub fn offset(self) -> FixedOffset {
        let secs = match self {
            Zone::Gmt => 0,
            Zone::Moscow => MOSCOW_OFFSET_SECS,
        };
        FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
    }

    /// Interpret `naive` as wall-clock time in this zone and return the UTC instant.
    pub fn to_utc(self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.offset().from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            // a fixed offset never yields a gap or an overlap
            _ => Utc.from_utc_datetime(&naive),
        }
    }

    /// Wall-clock time in this zone for a given instant.
    pub fn wall_clock(self, instant: DateTime<Utc>) -> NaiveDateTime {
        self.offset().from_utc_datetime(&instant.naive_utc()).naive_local()
    }

    /// Re-express a wall-clock time of zone `self` in zone `target`.
    pub fn convert(self, naive: NaiveDateTime, target: Zone) -> NaiveDateTime {
        if self == target {
            return naive;
        }
        target.wall_clock(self.to_utc(naive))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Zone::Gmt => "gmt",
            Zone::Moscow => "moscow",
        })
    }
}

impl FromStr for Zone {
    type Err = ZoneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gmt" | "utc" | "etc/gmt" => Ok(Zone::Gmt),
            "moscow" | "msk" | "europe/moscow" => Ok(Zone::Moscow),
            other => Err(ZoneParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn moscow_cutoff_maps_to_gmt_cutoff() {
        let msk = at(2025, 1, 3, 18, 45);
        assert_eq!(Zone::Moscow.convert(msk, Zone::Gmt), at(2025, 1, 3, 15, 45));
    }

    #[test]
    fn conversion_crosses_midnight() {
        let msk = at(2025, 1, 3, 1, 30);
        assert_eq!(Zone::Moscow.convert(msk, Zone::Gmt), at(2025, 1, 2, 22, 30));
        assert_eq!(Zone::Gmt.convert(at(2025, 1, 2, 22, 30), Zone::Moscow), msk);
    }

    #[test]
    fn same_zone_is_identity() {
        let t = at(2025, 6, 1, 12, 0);
        assert_eq!(Zone::Gmt.convert(t, Zone::Gmt), t);
        assert_eq!(Zone::Moscow.convert(t, Zone::Moscow), t);
    }

    #[test]
    fn fixed_offset_agrees_with_tz_database_after_2014() {
        use chrono_tz::Europe::Moscow;

        // summer and winter dates; no DST after 2014-10-26
        for naive in [at(2015, 1, 15, 18, 45), at(2020, 7, 1, 18, 45), at(2025, 3, 30, 2, 30)] {
            let want = Moscow
                .from_local_datetime(&naive)
                .single()
                .expect("unambiguous")
                .with_timezone(&Utc);
            assert_eq!(Zone::Moscow.to_utc(naive), want, "at {naive}");
        }
    }

    #[test]
    fn wall_clock_of_an_instant() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 2, 22, 30, 0).unwrap();
        assert_eq!(Zone::Moscow.wall_clock(instant), at(2025, 1, 3, 1, 30));
        assert_eq!(Zone::Gmt.wall_clock(instant), at(2025, 1, 2, 22, 30));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("GMT".parse::<Zone>().unwrap(), Zone::Gmt);
        assert_eq!("Europe/Moscow".parse::<Zone>().unwrap(), Zone::Moscow);
        assert!("cet".parse::<Zone>().is_err());
    }
}
