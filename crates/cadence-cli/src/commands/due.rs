use anyhow::Result;
use cadence_core::repository::{ObjectScheduleRepository, Repository};
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::cli::DueCommand;
use crate::util::load_recurrence;
use crate::views::table::display_due_objects;

/// Lists which objects are due on a recurrence and optionally advances them.
pub async fn due_objects(repo: &impl Repository, command: DueCommand) -> Result<()> {
    let recurrence = load_recurrence(repo, &command.id).await?;
    let id = recurrence.id;

    let at = command.at.unwrap_or_else(Utc::now);
    let tracked = repo.find_object_schedules(id).await?;
    let candidates = if command.objects.is_empty() {
        tracked.iter().map(|s| s.object()).collect()
    } else {
        command.objects
    };

    let due = repo.find_due_objects(id, &candidates, Some(at)).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&due)?);
    } else {
        display_due_objects(&due, &tracked, &recurrence.timezone);
    }

    if command.advance && !due.is_empty() {
        let updated = repo.update_object_schedules(id, &due, Some(at)).await?;
        if !command.json {
            println!(
                "{} Advanced {} object{}",
                "✓".green().bold(),
                updated.len(),
                if updated.len() == 1 { "" } else { "s" }
            );
        }
    }
    Ok(())
}
