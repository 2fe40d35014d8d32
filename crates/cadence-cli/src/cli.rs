use cadence_core::models::{Interval, ObjectRef};
use cadence_core::offset::Offset;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::util::{parse_object_ref, parse_time};

/// Timezone-aware recurring schedules: every day, week, month, quarter or
/// year, at a fixed offset in local time
#[derive(Parser, Debug)]
#[command(name = "cadence", author, version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new recurrence
    Add(AddCommand),
    /// List recurrences
    List(ListCommand),
    /// Show a recurrence in detail
    Show(ShowCommand),
    /// Preview upcoming schedules without saving anything
    Next(NextCommand),
    /// Edit a recurrence's interval, offset or timezone
    Edit(EditCommand),
    /// Delete a recurrence and its tracked objects
    Delete(DeleteCommand),
    /// Advance every due recurrence to its next schedule
    Tick(TickCommand),
    /// Start tracking an object against a recurrence
    Track(TrackCommand),
    /// Stop tracking an object
    Untrack(TrackCommand),
    /// List the tracked objects of a recurrence that are due
    Due(DueCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// Repeating period (day, week, month, quarter, year)
    #[arg(short, long, default_value = "day")]
    pub interval: Interval,
    /// Position within each period, e.g. "14:30:00" or "2 days, 9:00:00"
    #[arg(short, long, default_value = "0:00:00")]
    pub offset: Offset,
    /// IANA timezone (defaults to the configured timezone)
    #[arg(short, long)]
    pub timezone: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only recurrences with this interval
    #[arg(short, long)]
    pub interval: Option<Interval>,
    /// Only recurrences in this timezone
    #[arg(short, long)]
    pub timezone: Option<String>,
    /// Only recurrences that are due now
    #[arg(long)]
    pub due: bool,
    /// Maximum number of rows (defaults to the configured limit)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID (or unique ID prefix) of the recurrence
    pub id: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct NextCommand {
    /// The ID (or unique ID prefix) of the recurrence
    pub id: String,
    /// Compute from this RFC 3339 time instead of now
    #[arg(long, value_parser = parse_time)]
    pub at: Option<DateTime<Utc>>,
    /// How many schedules to show
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or unique ID prefix) of the recurrence
    pub id: String,
    #[arg(short, long)]
    pub interval: Option<Interval>,
    #[arg(short, long)]
    pub offset: Option<Offset>,
    #[arg(short, long)]
    pub timezone: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique ID prefix) of the recurrence
    pub id: String,
    /// Force deletion without confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TickCommand {
    /// Advance as of this RFC 3339 time instead of now
    #[arg(long, value_parser = parse_time)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackCommand {
    /// The ID (or unique ID prefix) of the recurrence
    pub id: String,
    /// Kind of object, e.g. "user"
    pub object_type: String,
    /// Identifier of the object within its kind
    pub object_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DueCommand {
    /// The ID (or unique ID prefix) of the recurrence
    pub id: String,
    /// Objects to check as "type:id"; all tracked objects when omitted
    #[arg(value_parser = parse_object_ref)]
    pub objects: Vec<ObjectRef>,
    /// Check as of this RFC 3339 time instead of now
    #[arg(long, value_parser = parse_time)]
    pub at: Option<DateTime<Utc>>,
    /// Also move the due objects to their next schedule
    #[arg(long)]
    pub advance: bool,
    #[arg(long)]
    pub json: bool,
}
