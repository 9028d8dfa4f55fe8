use crate::cli::{ConfigCommands, OutputFormat};
use crate::output::{output_result, output_success, ConfigReport};
use anyhow::{Context, Result};
use sentry_youtrack::{ProjectOptions, YouTrackPlugin};
use serde_json::json;
use std::path::Path;

pub fn handle_config(
    plugin: &YouTrackPlugin,
    project: &str,
    action: &ConfigCommands,
    settings_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match action {
        ConfigCommands::Show => handle_show(plugin, project, format),
        ConfigCommands::Set {
            url,
            username,
            api_key,
            youtrack_project,
            ignore_fields,
            default_tags,
        } => {
            let stored = plugin.options(project)?;
            // Unset flags keep the stored value
            let submitted = ProjectOptions {
                url: url.clone().or(stored.url),
                username: username.clone().or(stored.username),
                api_key: api_key.clone(),
                project: youtrack_project.clone().or(stored.project),
                ignore_fields: if ignore_fields.is_empty() {
                    stored.ignore_fields
                } else {
                    ignore_fields.clone()
                },
                default_tags: default_tags.clone().or(stored.default_tags),
                default_fields: stored.default_fields,
            };
            handle_set(plugin, project, submitted, format)
        }
        ConfigCommands::Reset => {
            plugin.reset_options(project)?;
            output_success(
                &format!("Options of project '{}' reset", project),
                json!({ "project": project }),
                format,
            );
            Ok(())
        }
        ConfigCommands::Path => {
            let path = settings_path
                .map(Path::to_path_buf)
                .or_else(crate::config::settings_path)
                .context("No settings directory available")?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_show(plugin: &YouTrackPlugin, project: &str, format: OutputFormat) -> Result<()> {
    let report = ConfigReport {
        project: project.to_string(),
        options: plugin.options(project)?,
        configuration: plugin.get_config(project)?,
    };
    output_result(&report, format);
    Ok(())
}

fn handle_set(
    plugin: &YouTrackPlugin,
    project: &str,
    submitted: ProjectOptions,
    format: OutputFormat,
) -> Result<()> {
    let saved = plugin
        .validate_config(project, submitted)
        .context("Invalid configuration")?;
    output_success(
        &format!(
            "Project '{}' linked to YouTrack project {}",
            project,
            saved.project.as_deref().unwrap_or_default()
        ),
        json!({ "project": project, "youtrack_project": saved.project }),
        format,
    );
    Ok(())
}
