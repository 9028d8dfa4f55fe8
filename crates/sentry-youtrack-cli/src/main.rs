mod cli;
mod color;
mod commands;
mod config;
mod logging;
mod output;
mod store;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use output::output_error;
use sentry_youtrack::YouTrackPlugin;
use std::process::ExitCode;
use store::JsonFileStore;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    logging::init();

    if let Err(e) = run(&cli) {
        output_error(&e, cli.format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        Cli::generate_completions(*shell);
        return Ok(());
    }

    let settings = config::load_settings(cli.settings.as_deref())?;
    debug!(store = %cli.store.display(), project = %cli.project, "Starting");

    let store = JsonFileStore::new(&cli.store);
    let plugin = YouTrackPlugin::youtrack(Box::new(store.clone()), Box::new(store), settings);
    let project = cli.project.as_str();
    let format = cli.format;

    match &cli.command {
        Commands::Config { action } => commands::config::handle_config(
            &plugin,
            project,
            action,
            cli.settings.as_deref(),
            format,
        ),
        Commands::Projects => commands::tracker::handle_projects(&plugin, project, format),
        Commands::Fields => commands::tracker::handle_fields(&plugin, project, format),
        Commands::Priorities => commands::tracker::handle_priorities(&plugin, project, format),
        Commands::IssueTypes => commands::tracker::handle_issue_types(&plugin, project, format),
        Commands::Issues {
            query,
            page,
            page_limit,
        } => commands::issue::handle_issues(
            &plugin,
            project,
            query.as_deref(),
            *page,
            *page_limit,
            format,
        ),
        Commands::Create {
            group,
            title,
            description,
            tags,
            fields,
        } => commands::issue::handle_create(
            &plugin,
            project,
            commands::issue::CreateArgs {
                group,
                title: title.as_deref(),
                description: description.as_deref(),
                tags: tags.as_deref(),
                fields,
            },
            format,
        ),
        Commands::Assign { group, issue } => {
            commands::issue::handle_assign(&plugin, project, group, issue, format)
        }
        Commands::DefaultField { field, value } => {
            commands::issue::handle_default_field(&plugin, project, field, value, format)
        }
        Commands::Url { group, open } => {
            commands::issue::handle_url(&plugin, project, group, *open, format)
        }
        Commands::Completions { .. } => Ok(()),
    }
}
