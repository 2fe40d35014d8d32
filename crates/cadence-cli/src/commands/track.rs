use anyhow::Result;
use cadence_core::models::ObjectRef;
use cadence_core::repository::{ObjectScheduleRepository, Repository};
use owo_colors::OwoColorize;

use crate::cli::TrackCommand;
use crate::util::resolve_recurrence_id;

pub async fn track_object(repo: &impl Repository, command: TrackCommand) -> Result<()> {
    let id = resolve_recurrence_id(repo, &command.id).await?;
    let object = ObjectRef::new(command.object_type, command.object_id);

    repo.track_object(id, &object).await?;
    println!("{} Tracking {} on recurrence {}", "✓".green().bold(), object, id.to_string().yellow());
    Ok(())
}

pub async fn untrack_object(repo: &impl Repository, command: TrackCommand) -> Result<()> {
    let id = resolve_recurrence_id(repo, &command.id).await?;
    let object = ObjectRef::new(command.object_type, command.object_id);

    repo.untrack_object(id, &object).await?;
    println!("{} Stopped tracking {}", "✓".green().bold(), object);
    Ok(())
}
