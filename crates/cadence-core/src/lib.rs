//! # Cadence Core Library
//!
//! Timezone-aware interval recurrences: events that fire at a fixed offset
//! into every day, week, month, quarter or year, in a user's local time.
//!
//! ## Features
//!
//! - **Local-time scheduling**: offsets are wall-clock positions in an IANA
//!   zone; the resulting UTC instants follow DST transitions
//! - **Calendar-aware intervals**: month, quarter and year lengths vary, and
//!   offsets past the end of an occurrence clamp to its last day
//! - **Persistence**: recurrences and per-object schedules in SQLite via sqlx,
//!   with transactional schedule advancement
//!
//! ## Core Modules
//!
//! - [`recurrence`]: Offset placement and next-schedule computation
//! - [`offset`]: The offset value type and its storage/text codecs
//! - [`models`]: Intervals, recurrences and tracked object schedules
//! - [`timezone`]: Timezone resolution and DST-safe conversion
//! - [`repository`]: Data access layer with Repository pattern
//! - [`db`]: Database connection and migration management
//! - [`query`]: Recurrence filters
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cadence_core::{
//!     db, models::{Interval, NewRecurrenceData}, offset::Offset,
//!     repository::{RecurrenceRepository, SqliteRepository},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cadence_core::error::CoreError> {
//!     let pool = db::establish_connection("cadence.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     // Every day at 15:00 New York time
//!     let recurrence = repo.add_recurrence(NewRecurrenceData {
//!         interval: Interval::Day,
//!         offset: Offset::new(0, 15, 0, 0)?,
//!         timezone: Some("America/New_York".to_string()),
//!     }).await?;
//!
//!     // Act on whatever is due, then move each one to its next occurrence
//!     for due in repo.find_due_recurrences(None).await? {
//!         println!("due: {}", due);
//!         repo.update_schedule(due.id, None).await?;
//!     }
//!     # let _ = recurrence;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod offset;
pub mod query;
pub mod recurrence;
pub mod repository;
pub mod timezone;
