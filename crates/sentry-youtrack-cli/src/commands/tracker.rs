//! Read-only listings straight from the tracker.

use crate::cli::OutputFormat;
use crate::output::output_list;
use anyhow::{Context, Result};
use sentry_youtrack::YouTrackPlugin;

pub fn handle_projects(plugin: &YouTrackPlugin, project: &str, format: OutputFormat) -> Result<()> {
    let projects = plugin
        .tracker(project)?
        .get_projects()
        .context("Failed to list projects")?;
    output_list(&projects, format);
    Ok(())
}

pub fn handle_fields(plugin: &YouTrackPlugin, project: &str, format: OutputFormat) -> Result<()> {
    let fields = plugin
        .project_fields(project)
        .context("Failed to fetch project fields")?;
    output_list(&fields, format);
    Ok(())
}

pub fn handle_priorities(
    plugin: &YouTrackPlugin,
    project: &str,
    format: OutputFormat,
) -> Result<()> {
    let values = plugin
        .tracker(project)?
        .get_priorities()
        .context("Failed to fetch priorities")?;
    output_list(&values, format);
    Ok(())
}

pub fn handle_issue_types(
    plugin: &YouTrackPlugin,
    project: &str,
    format: OutputFormat,
) -> Result<()> {
    let values = plugin
        .tracker(project)?
        .get_issue_types()
        .context("Failed to fetch issue types")?;
    output_list(&values, format);
    Ok(())
}
