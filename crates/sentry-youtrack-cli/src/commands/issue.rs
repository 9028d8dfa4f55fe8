use crate::cli::OutputFormat;
use crate::commands::{group, parse_assignment};
use crate::output::{output_result, output_success, CreatedIssue};
use anyhow::{anyhow, Context, Result};
use sentry_youtrack::{FormData, YouTrackPlugin};
use serde_json::json;

pub fn handle_issues(
    plugin: &YouTrackPlugin,
    project: &str,
    query: Option<&str>,
    page: usize,
    page_limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let page = plugin
        .project_issues(project, query, page, page_limit)
        .context("Failed to search issues")?;
    output_result(&page, format);
    Ok(())
}

pub struct CreateArgs<'a> {
    pub group: &'a str,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub fields: &'a [String],
}

pub fn handle_create(
    plugin: &YouTrackPlugin,
    project: &str,
    args: CreateArgs<'_>,
    format: OutputFormat,
) -> Result<()> {
    let group = group(project, args.group);
    let form = plugin.new_issue_form(&group)?;

    let mut data = FormData::new();
    data.append("title", args.title.unwrap_or(&form.initial.title));
    data.append("description", args.description.unwrap_or(&form.initial.description));
    let tags = args.tags.or(form.initial.tags.as_deref()).unwrap_or_default();
    data.append("tags", tags);

    for raw in args.fields {
        let (name, value) = parse_assignment(raw)?;
        let control = form
            .project_fields
            .controls
            .iter()
            .find(|c| c.data_field.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Unknown or ignored field '{}'", name))?;
        data.append(&control.name, value);
    }

    let id = plugin
        .create_issue(&group, &data)
        .context("Failed to create issue")?;
    let url = plugin.issue_url(project, &id)?;
    output_result(&CreatedIssue { id, url }, format);
    Ok(())
}

pub fn handle_assign(
    plugin: &YouTrackPlugin,
    project: &str,
    group_id: &str,
    issue: &str,
    format: OutputFormat,
) -> Result<()> {
    let group = group(project, group_id);
    let issue_id = plugin.assign_issue(&group, &FormData::new().with("issue", issue))?;
    output_success(
        &format!("Group {} linked to {}", group_id, issue_id),
        json!({ "group": group_id, "issue": issue_id }),
        format,
    );
    Ok(())
}

pub fn handle_default_field(
    plugin: &YouTrackPlugin,
    project: &str,
    field: &str,
    value: &str,
    format: OutputFormat,
) -> Result<()> {
    let data = FormData::new().with("field", field).with("value", value);
    plugin.save_field_as_default(project, &data)?;
    output_success(
        &format!("Default for '{}' saved", field),
        json!({ "field": field, "value": value }),
        format,
    );
    Ok(())
}

pub fn handle_url(
    plugin: &YouTrackPlugin,
    project: &str,
    group_id: &str,
    open_browser: bool,
    format: OutputFormat,
) -> Result<()> {
    let issue_id = plugin
        .linked_issue(&group(project, group_id))?
        .ok_or_else(|| anyhow!("Group {} is not linked to an issue", group_id))?;
    let url = plugin.issue_url(project, &issue_id)?;

    if open_browser {
        open::that(&url).with_context(|| format!("Failed to open {}", url))?;
    }
    output_result(&url, format);
    Ok(())
}
