use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use cadence_core::models::UpdateRecurrenceData;
use cadence_core::repository::{RecurrenceRepository, Repository};
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::util::resolve_recurrence_id;

pub async fn edit_recurrence(repo: &impl Repository, command: EditCommand) -> Result<()> {
    let id = resolve_recurrence_id(repo, &command.id).await?;

    let update = UpdateRecurrenceData {
        interval: command.interval,
        offset: command.offset,
        timezone: command.timezone,
    };
    if update.is_empty() {
        return Err(anyhow!(CoreError::InvalidInput(
            "Nothing to change; pass --interval, --offset or --timezone.".to_string()
        )));
    }

    let updated = repo.update_recurrence(id, update).await?;
    println!(
        "{} Updated recurrence {}: every {} at {} ({})",
        "✓".green().bold(),
        updated.id.to_string().yellow(),
        updated.interval.to_string().to_lowercase(),
        updated.offset,
        updated.timezone
    );
    println!("  The next schedule is recomputed on the next tick.");
    Ok(())
}
