use anyhow::Result;
use cadence_core::recurrence::upcoming_schedules;
use cadence_core::repository::Repository;
use chrono::Utc;
use tracing::debug;

use crate::cli::NextCommand;
use crate::util::load_recurrence;
use crate::views::table::display_schedules;

/// Previews upcoming schedules; nothing is written.
pub async fn preview_next(repo: &impl Repository, command: NextCommand) -> Result<()> {
    let recurrence = load_recurrence(repo, &command.id).await?;
    let id = recurrence.id;

    let from = command.at.unwrap_or_else(Utc::now);
    let schedules = upcoming_schedules(
        from,
        recurrence.interval,
        &recurrence.offset,
        &recurrence.timezone,
        command.count,
    )?;
    debug!(%id, %from, count = schedules.len(), "previewed schedules");

    if command.json {
        println!("{}", serde_json::to_string_pretty(&schedules)?);
    } else {
        display_schedules(&schedules, &recurrence.timezone);
    }
    Ok(())
}
