use crate::cli::OutputFormat;
use colored::Colorize;
use sentry_youtrack::{ConfigField, ProjectOptions, YouTrackConfiguration};
use serde::Serialize;
use tracker_core::{CustomFieldDetail, IssuePage, IssueSummary, Project};

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

pub fn output_list<T: Serialize + Displayable>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", "Nothing found.".dimmed());
            }
            for item in items {
                println!("{}", item.display());
            }
        }
    }
}

/// Print a one-line confirmation, or `{"success": true, ...}` in JSON
pub fn output_success(message: &str, extra: serde_json::Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let mut body = serde_json::json!({ "success": true, "message": message });
            if let (Some(body), serde_json::Value::Object(extra)) = (body.as_object_mut(), extra) {
                body.extend(extra);
            }
            if let Ok(json) = serde_json::to_string_pretty(&body) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => println!("{}", message.green()),
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for String {
    fn display(&self) -> String {
        self.clone()
    }
}

impl Displayable for Project {
    fn display(&self) -> String {
        format!("{} {}", self.id.cyan().bold(), self.name)
    }
}

impl Displayable for CustomFieldDetail {
    fn display(&self) -> String {
        let mut output = format!("{} [{}]", self.name.bold(), self.field_type.dimmed());
        if let Some(empty) = &self.empty_text {
            output.push_str(&format!("\n  {}: {}", "Empty".dimmed(), empty));
        }
        if let Some(values) = &self.values {
            let values = if values.is_empty() {
                "(none)".dimmed().to_string()
            } else {
                values.join(", ")
            };
            output.push_str(&format!("\n  {}: {}", "Values".dimmed(), values));
        }
        output
    }
}

impl Displayable for IssueSummary {
    fn display(&self) -> String {
        let state = match &self.state {
            Some(state) if is_resolved(state) => state.green().to_string(),
            Some(state) => state.yellow().to_string(),
            None => "-".dimmed().to_string(),
        };
        format!("{} [{}] {}", self.id.cyan().bold(), state, self.summary)
    }
}

fn is_resolved(state: &str) -> bool {
    ["fixed", "done", "verified"]
        .iter()
        .any(|s| state.eq_ignore_ascii_case(s))
}

impl Displayable for IssuePage<IssueSummary> {
    fn display(&self) -> String {
        let mut lines: Vec<String> = self.issues.iter().map(Displayable::display).collect();
        if self.issues.is_empty() {
            lines.push("No issues found.".dimmed().to_string());
        }
        if self.more {
            lines.push("More issues available on the next page.".dimmed().to_string());
        }
        lines.join("\n")
    }
}

impl Displayable for ConfigField {
    fn display(&self) -> String {
        let required = if self.required { "*" } else { "" };
        let mut output = format!("{}{} ({})", self.label.bold(), required, self.name.dimmed());
        if self.has_saved_value {
            output.push_str(&format!(" {}", "[saved]".green()));
        }
        if let Some(help) = &self.help {
            output.push_str(&format!("\n  {}", help.dimmed()));
        }
        for (value, label) in &self.choices {
            output.push_str(&format!("\n  - {} = {}", value, label));
        }
        output
    }
}

/// Stored options plus the live configuration form
#[derive(Serialize)]
pub struct ConfigReport {
    pub project: String,
    pub options: ProjectOptions,
    pub configuration: YouTrackConfiguration,
}

impl Displayable for ConfigReport {
    fn display(&self) -> String {
        let option = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        let api_key = if self.options.api_key.is_some() {
            "********".to_string()
        } else {
            "-".to_string()
        };

        let mut lines = vec![
            format!("{} {}", "Project:".dimmed(), self.project.bold()),
            format!("  {}: {}", "url".dimmed(), option(&self.options.url)),
            format!("  {}: {}", "username".dimmed(), option(&self.options.username)),
            format!("  {}: {}", "api_key".dimmed(), api_key),
            format!("  {}: {}", "youtrack project".dimmed(), option(&self.options.project)),
            format!("  {}: {}", "ignore fields".dimmed(), self.options.ignore_fields.join(", ")),
            format!("  {}: {}", "default tags".dimmed(), option(&self.options.default_tags)),
            String::new(),
            "Configuration:".dimmed().to_string(),
        ];
        lines.extend(self.configuration.fields.iter().map(Displayable::display));
        for (field, message) in &self.configuration.errors {
            lines.push(format!("{} {}: {}", "!".red().bold(), field, message.red()));
        }
        lines.join("\n")
    }
}

/// Result of creating an issue
#[derive(Serialize)]
pub struct CreatedIssue {
    pub id: String,
    pub url: String,
}

impl Displayable for CreatedIssue {
    fn display(&self) -> String {
        format!("Created issue {}\n  {}", self.id.cyan().bold(), self.url)
    }
}
