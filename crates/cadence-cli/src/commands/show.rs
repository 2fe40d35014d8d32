use anyhow::Result;
use cadence_core::repository::{ObjectScheduleRepository, Repository};
use chrono::Utc;

use crate::cli::ShowCommand;
use crate::util::load_recurrence;
use crate::views::table::display_recurrence_detail;

pub async fn show_recurrence(repo: &impl Repository, command: ShowCommand) -> Result<()> {
    let recurrence = load_recurrence(repo, &command.id).await?;
    let id = recurrence.id;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&recurrence)?);
    } else {
        let tracked = repo.find_object_schedules(id).await?;
        display_recurrence_detail(&recurrence, &tracked, Utc::now());
    }
    Ok(())
}
