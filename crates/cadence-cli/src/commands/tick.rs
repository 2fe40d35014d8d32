use anyhow::Result;
use cadence_core::query::RecurrenceQuery;
use cadence_core::repository::{RecurrenceRepository, Repository};
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::cli::TickCommand;
use crate::views::table::display_recurrences;

/// Advances every recurrence due at the given time.
pub async fn tick(repo: &impl Repository, command: TickCommand) -> Result<()> {
    let at = command.at.unwrap_or_else(Utc::now);
    let advanced = repo.update_schedules(&RecurrenceQuery::due(at), Some(at)).await?;

    if advanced.is_empty() {
        println!("Nothing is due.");
        return Ok(());
    }

    println!(
        "{} Advanced {} recurrence{}",
        "✓".green().bold(),
        advanced.len(),
        if advanced.len() == 1 { "" } else { "s" }
    );
    display_recurrences(&advanced, at);
    Ok(())
}
