use anyhow::Result;
use cadence_core::repository::{ObjectScheduleRepository, RecurrenceRepository, Repository};
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::cli::DeleteCommand;
use crate::util::load_recurrence;

pub async fn delete_recurrence(repo: &impl Repository, command: DeleteCommand) -> Result<()> {
    let recurrence = load_recurrence(repo, &command.id).await?;
    let id = recurrence.id;

    if !command.force {
        let tracked = repo.find_object_schedules(id).await?.len();
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete recurrence {} ({} at {}, {} tracked objects)?",
                recurrence.id, recurrence.interval, recurrence.offset, tracked
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_recurrence(id).await?;
    println!("{} Deleted recurrence {}", "✓".green().bold(), id.to_string().yellow());
    Ok(())
}
