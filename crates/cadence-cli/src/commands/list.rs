use anyhow::Result;
use cadence_core::query::{Filter, RecurrenceQuery};
use cadence_core::repository::{RecurrenceRepository, Repository};
use chrono::Utc;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::views::table::display_recurrences;

pub async fn list_recurrences(repo: &impl Repository, command: ListCommand, config: &Config) -> Result<()> {
    let now = Utc::now();

    let mut query = RecurrenceQuery::all();
    if let Some(interval) = command.interval {
        query = query.filter(Filter::Interval(interval));
    }
    if let Some(timezone) = command.timezone {
        query = query.filter(Filter::Timezone(timezone));
    }
    if command.due {
        query = query.filter(Filter::DueBefore(now));
    }

    let mut recurrences = repo.find_recurrences(&query).await?;
    recurrences.truncate(command.limit.unwrap_or(config.list_limit));

    if command.json {
        println!("{}", serde_json::to_string_pretty(&recurrences)?);
    } else {
        display_recurrences(&recurrences, now);
    }
    Ok(())
}
