//! The position of an occurrence inside its interval.
//!
//! An [`Offset`] is a whole number of days plus a time of day. It is stored as
//! an integer count of seconds (see [`Offset::as_seconds`]) and exchanged as
//! text in the form `[D day[s], ]H:MM:SS`.

use chrono::{NaiveTime, Timelike};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Offset {
    days: u32,
    time_of_day: NaiveTime,
}

impl Offset {
    /// Builds an offset from its components, rejecting out-of-range fields.
    pub fn new(days: u32, hours: u32, minutes: u32, seconds: u32) -> Result<Self, CoreError> {
        let time_of_day = NaiveTime::from_hms_opt(hours, minutes, seconds).ok_or_else(|| {
            CoreError::MalformedOffset(format!(
                "time of day {}:{:02}:{:02} is out of range",
                hours, minutes, seconds
            ))
        })?;
        Ok(Self { days, time_of_day })
    }

    pub const fn zero() -> Self {
        Self {
            days: 0,
            time_of_day: NaiveTime::MIN,
        }
    }

    /// Decodes the storage form: a non-negative number of seconds.
    pub fn from_seconds(total: i64) -> Result<Self, CoreError> {
        if total < 0 {
            return Err(CoreError::MalformedOffset(format!(
                "offset must not be negative, got {} seconds",
                total
            )));
        }
        let days = u32::try_from(total / SECONDS_PER_DAY).map_err(|_| {
            CoreError::MalformedOffset(format!("offset of {} seconds is too large", total))
        })?;
        let remainder = (total % SECONDS_PER_DAY) as u32;
        Self::new(days, remainder / 3600, (remainder / 60) % 60, remainder % 60)
    }

    /// Encodes the storage form.
    pub fn as_seconds(&self) -> i64 {
        i64::from(self.days) * SECONDS_PER_DAY
            + i64::from(self.time_of_day.num_seconds_from_midnight())
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn hours(&self) -> u32 {
        self.time_of_day.hour()
    }

    pub fn minutes(&self) -> u32 {
        self.time_of_day.minute()
    }

    pub fn seconds(&self) -> u32 {
        self.time_of_day.second()
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.time_of_day
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.days {
            0 => {}
            1 => write!(f, "1 day, ")?,
            n => write!(f, "{} days, ", n)?,
        }
        write!(
            f,
            "{}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

impl FromStr for Offset {
    type Err = CoreError;

    /// Parses `H:MM:SS`, `D day, H:MM:SS` or `D days, H:MM:SS`. A fractional
    /// seconds part is accepted and truncated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            CoreError::MalformedOffset(format!(
                "'{}' is not in the form [D day[s], ][H]H:MM:SS[.UUUUUU]",
                s
            ))
        };

        let trimmed = s.trim();
        let (days, clock) = match trimmed.split_once(',') {
            Some((day_part, clock)) => {
                let count = day_part
                    .trim()
                    .strip_suffix("days")
                    .or_else(|| day_part.trim().strip_suffix("day"))
                    .ok_or_else(malformed)?
                    .trim();
                if count.starts_with('-') {
                    return Err(CoreError::MalformedOffset(format!(
                        "offset must not be negative: '{}'",
                        s
                    )));
                }
                (count.parse::<u32>().map_err(|_| malformed())?, clock.trim())
            }
            None => (0, trimmed),
        };

        let mut fields = clock.split(':');
        let (Some(hours), Some(minutes), Some(seconds), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };
        let whole_seconds = seconds.split_once('.').map_or(seconds, |(whole, _)| whole);

        let parse = |field: &str| field.parse::<u32>().map_err(|_| malformed());
        Self::new(days, parse(hours)?, parse(minutes)?, parse(whole_seconds)?)
    }
}

impl Serialize for Offset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct OffsetVisitor;

impl<'de> Visitor<'de> for OffsetVisitor {
    type Value = Offset;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an offset string like '2 days, 3:00:00' or a number of seconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Offset, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Offset, E> {
        Offset::from_seconds(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Offset, E> {
        let seconds = i64::try_from(v).map_err(E::custom)?;
        Offset::from_seconds(seconds).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Offset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OffsetVisitor)
    }
}
