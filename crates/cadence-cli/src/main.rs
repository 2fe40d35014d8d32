use cadence_core::db;
use cadence_core::error::CoreError;
use cadence_core::repository::SqliteRepository;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_recurrence(&repository, command, &config).await,
        cli::Commands::List(command) => commands::list::list_recurrences(&repository, command, &config).await,
        cli::Commands::Show(command) => commands::show::show_recurrence(&repository, command).await,
        cli::Commands::Next(command) => commands::next::preview_next(&repository, command).await,
        cli::Commands::Edit(command) => commands::edit::edit_recurrence(&repository, command).await,
        cli::Commands::Delete(command) => commands::delete::delete_recurrence(&repository, command).await,
        cli::Commands::Tick(command) => commands::tick::tick(&repository, command).await,
        cli::Commands::Track(command) => commands::track::track_object(&repository, command).await,
        cli::Commands::Untrack(command) => commands::track::untrack_object(&repository, command).await,
        cli::Commands::Due(command) => commands::due::due_objects(&repository, command).await,
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.chain().find_map(|e| e.downcast_ref::<CoreError>()) {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(recurrences) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, summary) in recurrences {
                    eprintln!("  {} ({})", id.yellow(), summary);
                }
            }
            CoreError::InvalidTimezone(tz) => {
                eprintln!(
                    "{} Invalid timezone: '{}'. Use IANA timezone names like 'America/New_York'",
                    "Error:".style(error_style),
                    tz.yellow()
                );
            }
            CoreError::Conflict(s) => {
                eprintln!(
                    "{} {} (another process advanced it first; try again)",
                    "Error:".style(error_style),
                    s
                );
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::Database(e) => {
                eprintln!("{} Database error: {}", "Error:".style(error_style), e);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), core_error),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
