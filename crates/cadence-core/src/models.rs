use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;
use crate::offset::Offset;
use crate::recurrence;

/// The repeating period of a recurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Interval {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Interval {
    pub const ALL: [Interval; 5] = [
        Interval::Day,
        Interval::Week,
        Interval::Month,
        Interval::Quarter,
        Interval::Year,
    ];

    /// The stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "DAY",
            Interval::Week => "WEEK",
            Interval::Month => "MONTH",
            Interval::Quarter => "QUARTER",
            Interval::Year => "YEAR",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DAY" => Ok(Interval::Day),
            "WEEK" => Ok(Interval::Week),
            "MONTH" => Ok(Interval::Month),
            "QUARTER" => Ok(Interval::Quarter),
            "YEAR" => Ok(Interval::Year),
            _ => Err(CoreError::InvalidInterval(s.to_string())),
        }
    }
}

/// Sentinel used for `previous_scheduled` and `next_scheduled` before the
/// first schedule update.
pub fn unscheduled() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// An event that recurs at a fixed offset into every interval, in the
/// wall-clock time of `timezone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedRecurrence {
    pub id: Uuid,
    pub interval: Interval,
    pub offset: Offset,
    /// IANA timezone name (e.g., "US/Eastern")
    pub timezone: String,
    pub previous_scheduled: DateTime<Utc>,
    pub next_scheduled: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for LocalizedRecurrence {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            interval: Interval::Day,
            offset: Offset::zero(),
            timezone: "UTC".to_string(),
            previous_scheduled: unscheduled(),
            next_scheduled: unscheduled(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl LocalizedRecurrence {
    /// The next occurrence in UTC strictly after `current_time`.
    ///
    /// Has no side effects; persisting the result is up to the caller (see
    /// [`LocalizedRecurrence::apply_schedule`] and the repository layer).
    pub fn utc_of_next_schedule(&self, current_time: DateTime<Utc>) -> Result<DateTime<Utc>, CoreError> {
        recurrence::next_schedule(current_time, self.interval, &self.offset, &self.timezone)
    }

    /// Advances the in-memory schedule as of `time`.
    pub fn apply_schedule(&mut self, time: DateTime<Utc>) -> Result<(), CoreError> {
        self.next_scheduled = self.utc_of_next_schedule(time)?;
        self.previous_scheduled = time;
        Ok(())
    }

    pub fn is_due(&self, time: DateTime<Utc>) -> bool {
        self.next_scheduled < time
    }
}

impl fmt::Display for LocalizedRecurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Interval: {}, Next Scheduled: {}",
            self.id,
            self.interval,
            self.next_scheduled.to_rfc3339()
        )
    }
}

/// Data required to create a new recurrence
#[derive(Debug, Clone, Default)]
pub struct NewRecurrenceData {
    pub interval: Interval,
    pub offset: Offset,
    /// Defaults to "UTC" when absent
    pub timezone: Option<String>,
}

/// Partial update of a recurrence's defining fields
#[derive(Debug, Clone, Default)]
pub struct UpdateRecurrenceData {
    pub interval: Option<Interval>,
    pub offset: Option<Offset>,
    pub timezone: Option<String>,
}

impl UpdateRecurrenceData {
    pub fn is_empty(&self) -> bool {
        self.interval.is_none() && self.offset.is_none() && self.timezone.is_none()
    }
}

/// Identifies an external object whose schedule follows a shared recurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub object_type: String,
    pub object_id: String,
}

impl ObjectRef {
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

/// Schedule of a single tracked object, advanced independently of the
/// recurrence it shares its interval, offset and timezone with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrackedObjectSchedule {
    pub recurrence_id: Uuid,
    pub object_type: String,
    pub object_id: String,
    pub previous_scheduled: DateTime<Utc>,
    pub next_scheduled: DateTime<Utc>,
}

impl TrackedObjectSchedule {
    pub fn object(&self) -> ObjectRef {
        ObjectRef::new(self.object_type.clone(), self.object_id.clone())
    }

    pub fn is_due(&self, time: DateTime<Utc>) -> bool {
        self.next_scheduled < time
    }
}
