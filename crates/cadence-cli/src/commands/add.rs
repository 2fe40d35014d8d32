use anyhow::Result;
use cadence_core::models::NewRecurrenceData;
use cadence_core::repository::{RecurrenceRepository, Repository};
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::config::Config;

pub async fn add_recurrence(repo: &impl Repository, command: AddCommand, config: &Config) -> Result<()> {
    let timezone = command
        .timezone
        .unwrap_or_else(|| config.default_timezone.clone());

    let recurrence = repo
        .add_recurrence(NewRecurrenceData {
            interval: command.interval,
            offset: command.offset,
            timezone: Some(timezone),
        })
        .await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    println!(
        "{} Created recurrence: every {} at {} ({})",
        "✓".style(success_style),
        recurrence.interval.to_string().to_lowercase(),
        recurrence.offset,
        recurrence.timezone
    );
    println!("  {} ID: {}", "→".style(info_style), recurrence.id.to_string().yellow());
    println!(
        "  {} Due immediately; run `cadence tick` to schedule it",
        "→".style(info_style)
    );
    Ok(())
}
