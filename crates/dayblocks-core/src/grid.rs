//! Day-grid configuration and snap-to-increment arithmetic.
//!
//! All block boundaries align to a fixed increment (30 minutes by default).
//! The grid is passed explicitly into every engine call rather than held as
//! global state, so concurrent requests can use different day bounds.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Default first hour of the working day.
pub const DEFAULT_DAY_START_HOUR: u32 = 8;

/// Default last hour of the working day (exclusive).
pub const DEFAULT_DAY_END_HOUR: u32 = 20;

/// Default grid increment in minutes.
pub const DEFAULT_INCREMENT_MINUTES: i64 = 30;

/// Day bounds and grid increment for one scheduling request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// First hour of the day window (inclusive).
    pub day_start_hour: u32,
    /// Last hour of the day window (exclusive).
    pub day_end_hour: u32,
    /// Minimum time resolution; every boundary snaps to a multiple of this.
    pub increment_minutes: i64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            day_start_hour: DEFAULT_DAY_START_HOUR,
            day_end_hour: DEFAULT_DAY_END_HOUR,
            increment_minutes: DEFAULT_INCREMENT_MINUTES,
        }
    }
}

impl GridConfig {
    /// Create a validated config.
    ///
    /// Returns an error when the hours do not describe a non-empty window
    /// within a single calendar day, or when the increment is not positive.
    pub fn new(day_start_hour: u32, day_end_hour: u32, increment_minutes: i64) -> Result<Self, EngineError> {
        if day_end_hour > 23 {
            return Err(EngineError::InvalidConfig(format!(
                "day_end_hour must be at most 23, got {day_end_hour}"
            )));
        }
        if day_start_hour >= day_end_hour {
            return Err(EngineError::InvalidConfig(format!(
                "day_start_hour ({day_start_hour}) must be before day_end_hour ({day_end_hour})"
            )));
        }
        if increment_minutes <= 0 {
            return Err(EngineError::InvalidConfig(format!(
                "increment_minutes must be positive, got {increment_minutes}"
            )));
        }
        Ok(Self {
            day_start_hour,
            day_end_hour,
            increment_minutes,
        })
    }

    /// Start of the day window.
    pub fn day_start(&self) -> NaiveTime {
        time_from_minutes(self.day_start_minutes())
    }

    /// End of the day window (exclusive for block starts).
    pub fn day_end(&self) -> NaiveTime {
        time_from_minutes(self.day_end_minutes())
    }

    /// Start of the day window in minutes from midnight.
    pub fn day_start_minutes(&self) -> i64 {
        self.day_start_hour as i64 * 60
    }

    /// End of the day window in minutes from midnight.
    pub fn day_end_minutes(&self) -> i64 {
        self.day_end_hour as i64 * 60
    }

    /// Total schedulable minutes in the day window.
    pub fn total_minutes(&self) -> i64 {
        self.day_end_minutes() - self.day_start_minutes()
    }

    /// Round a time to the nearest grid increment.
    ///
    /// Idempotent: `snap(snap(t)) == snap(t)`. Rounding past midnight wraps
    /// to 00:00, which the bounds check then rejects.
    pub fn snap(&self, t: NaiveTime) -> NaiveTime {
        let inc = self.increment_minutes;
        let m = minutes_from_midnight(t);
        let snapped = ((m + inc / 2) / inc) * inc;
        time_from_minutes(snapped)
    }

    /// Whether a time lies within `[day_start, day_end)`.
    pub fn within_bounds(&self, t: NaiveTime) -> bool {
        let m = minutes_from_midnight(t);
        m >= self.day_start_minutes() && m < self.day_end_minutes()
    }
}

/// Minutes elapsed since midnight, ignoring seconds.
pub fn minutes_from_midnight(t: NaiveTime) -> i64 {
    t.hour() as i64 * 60 + t.minute() as i64
}

/// Build a time from minutes since midnight, wrapping at the day boundary.
pub fn time_from_minutes(minutes: i64) -> NaiveTime {
    let m = minutes.rem_euclid(24 * 60);
    NaiveTime::from_num_seconds_from_midnight_opt(m as u32 * 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Serde adapter for `HH:MM` time fields on the wire.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub(crate) fn parse(s: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map_err(|_| format!("invalid time '{s}', expected HH:MM"))
    }
}

/// Serde adapter for optional `HH:MM` time fields.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => serializer.serialize_some(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            Some(s) => super::hhmm::parse(&s).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
