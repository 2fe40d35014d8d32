use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    LocalizedRecurrence, NewRecurrenceData, ObjectRef, TrackedObjectSchedule,
    UpdateRecurrenceData,
};
use crate::offset::Offset;
use crate::query::RecurrenceQuery;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export domain modules
pub mod objects;
pub mod query_builder;
pub mod recurrences;

/// Row shape of `localized_recurrences`. Interval and offset are decoded
/// explicitly in the `TryFrom` conversion below.
#[derive(Debug, Clone, FromRow)]
pub struct RecurrenceRow {
    pub id: Uuid,
    pub interval: String,
    pub offset_seconds: i64,
    pub timezone: String,
    pub previous_scheduled: DateTime<Utc>,
    pub next_scheduled: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RecurrenceRow> for LocalizedRecurrence {
    type Error = CoreError;

    fn try_from(row: RecurrenceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            interval: row.interval.parse()?,
            offset: Offset::from_seconds(row.offset_seconds)?,
            timezone: row.timezone,
            previous_scheduled: row.previous_scheduled,
            next_scheduled: row.next_scheduled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn decode_rows(rows: Vec<RecurrenceRow>) -> Result<Vec<LocalizedRecurrence>, CoreError> {
    rows.into_iter().map(LocalizedRecurrence::try_from).collect()
}

/// Domain-specific trait for recurrence definitions and their schedules
#[async_trait]
pub trait RecurrenceRepository {
    async fn add_recurrence(&self, data: NewRecurrenceData) -> Result<LocalizedRecurrence, CoreError>;
    async fn find_recurrence_by_id(&self, id: Uuid) -> Result<Option<LocalizedRecurrence>, CoreError>;
    async fn find_recurrences_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<LocalizedRecurrence>, CoreError>;
    async fn find_recurrences(&self, query: &RecurrenceQuery) -> Result<Vec<LocalizedRecurrence>, CoreError>;
    async fn find_due_recurrences(&self, time: Option<DateTime<Utc>>) -> Result<Vec<LocalizedRecurrence>, CoreError>;
    async fn update_recurrence(&self, id: Uuid, data: UpdateRecurrenceData) -> Result<LocalizedRecurrence, CoreError>;
    async fn delete_recurrence(&self, id: Uuid) -> Result<(), CoreError>;
    /// Advances one recurrence as of `time` (now when `None`).
    async fn update_schedule(&self, id: Uuid, time: Option<DateTime<Utc>>) -> Result<LocalizedRecurrence, CoreError>;
    /// Advances a previously read recurrence as of `time` (now when `None`).
    /// Fails with `Conflict` if its stored `next_scheduled` has moved since it was read.
    async fn advance_recurrence(&self, recurrence: LocalizedRecurrence, time: Option<DateTime<Utc>>) -> Result<LocalizedRecurrence, CoreError>;
    /// Advances every recurrence matching `query` as of `time` (now when `None`).
    async fn update_schedules(&self, query: &RecurrenceQuery, time: Option<DateTime<Utc>>) -> Result<Vec<LocalizedRecurrence>, CoreError>;
}

/// Domain-specific trait for per-object schedules sharing a recurrence
#[async_trait]
pub trait ObjectScheduleRepository {
    async fn track_object(&self, recurrence_id: Uuid, object: &ObjectRef) -> Result<TrackedObjectSchedule, CoreError>;
    async fn find_object_schedules(&self, recurrence_id: Uuid) -> Result<Vec<TrackedObjectSchedule>, CoreError>;
    /// Objects among `objects` with no schedule yet or whose next schedule is before `time`.
    async fn find_due_objects(&self, recurrence_id: Uuid, objects: &[ObjectRef], time: Option<DateTime<Utc>>) -> Result<Vec<ObjectRef>, CoreError>;
    /// Creates or advances the schedules of `objects` as of `time`.
    async fn update_object_schedules(&self, recurrence_id: Uuid, objects: &[ObjectRef], time: Option<DateTime<Utc>>) -> Result<Vec<TrackedObjectSchedule>, CoreError>;
    async fn untrack_object(&self, recurrence_id: Uuid, object: &ObjectRef) -> Result<(), CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository: RecurrenceRepository + ObjectScheduleRepository {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
