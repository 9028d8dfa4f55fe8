//! Builds the project configuration form.
//!
//! The base credential fields are always present. Once the credentials check
//! out against the tracker, the project-scoped fields are appended. Failures
//! are recorded per field and stop further discovery.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use tracker_core::{ClientSettings, Connector, IssueTracker, Project, TrackerError};

use crate::error::ConfigErrorKind;
use crate::host::ProjectOptions;

const CHOOSE_PROJECT: (&str, &str) = (" ", "- Choose project -");

/// Already known settings; blank values count as absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigInput {
    pub url: Option<String>,
    pub username: Option<String>,
    pub api_key: Option<String>,
    pub project: Option<String>,
}

impl ConfigInput {
    pub fn url(&self) -> Option<&str> {
        present(&self.url)
    }

    pub fn username(&self) -> Option<&str> {
        present(&self.username)
    }

    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    pub fn project(&self) -> Option<&str> {
        present(&self.project)
    }
}

impl From<&ProjectOptions> for ConfigInput {
    fn from(options: &ProjectOptions) -> Self {
        Self {
            url: options.url.clone(),
            username: options.username.clone(),
            api_key: options.api_key.clone(),
            project: options.project.clone(),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFieldType {
    Text,
    Secret,
    Select,
}

/// Descriptor of one configuration field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: ConfigFieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<(String, String)>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_saved_value: bool,
}

impl ConfigField {
    fn new(name: &str, label: &str, field_type: ConfigFieldType, required: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required,
            placeholder: None,
            help: None,
            choices: Vec::new(),
            has_saved_value: false,
        }
    }

    fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    fn choices(mut self, choices: Vec<(String, String)>) -> Self {
        self.choices = choices;
        self
    }
}

/// Configuration fields to render, plus error messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YouTrackConfiguration {
    pub fields: Vec<ConfigField>,
    pub errors: BTreeMap<String, String>,
}

impl YouTrackConfiguration {
    pub fn build(input: &ConfigInput, connector: &dyn Connector, verify_ssl: bool) -> Self {
        let mut config = Self {
            fields: base_fields(input),
            errors: BTreeMap::new(),
        };

        let (Some(url), Some(username), Some(api_key)) =
            (input.url(), input.username(), input.api_key())
        else {
            return config;
        };

        let settings = ClientSettings {
            url: url.to_string(),
            api_key: Some(api_key.to_string()),
            verify_ssl_certificate: verify_ssl,
        };
        let Some(client) = config.verified_client(connector, &settings, username) else {
            return config;
        };

        let project = input.project().unwrap_or_default();
        let ignore_choices = match input.project() {
            Some(project) => config.ignore_field_choices(client.as_ref(), project),
            None => Vec::new(),
        };
        config.fields.push(
            ConfigField::new("ignore_fields", "Ignore Fields", ConfigFieldType::Select, false)
                .help("These fields will not appear on the form.")
                .choices(ignore_choices),
        );

        let project_choices = config.project_choices(client.as_ref(), project);
        config.fields.push(
            ConfigField::new("project", "Linked Project", ConfigFieldType::Select, true)
                .choices(project_choices),
        );

        config.fields.push(
            ConfigField::new("default_tags", "Default Tags", ConfigFieldType::Text, false)
                .placeholder("e.g. sentry")
                .help("Comma-separated list of tags."),
        );

        config
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Keep the first message recorded for a field
    fn record(&mut self, field: &str, kind: ConfigErrorKind, subject: &str) {
        debug!(field, ?kind, "Configuration error");
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| kind.message(subject));
    }

    fn verified_client(
        &mut self,
        connector: &dyn Connector,
        settings: &ClientSettings,
        username: &str,
    ) -> Option<Box<dyn IssueTracker>> {
        let client = match connector.connect(settings) {
            Ok(client) => client,
            Err(TrackerError::Tls(_)) => {
                self.record("url", ConfigErrorKind::InvalidSsl, "");
                return None;
            }
            Err(_) => {
                self.record("url", ConfigErrorKind::Client, "");
                return None;
            }
        };

        match client.get_user(username) {
            Ok(_) => Some(client),
            Err(e) => {
                let (field, kind) = classify_user_error(&e);
                self.record(field, kind, "");
                None
            }
        }
    }

    fn ignore_field_choices(
        &mut self,
        client: &dyn IssueTracker,
        project: &str,
    ) -> Vec<(String, String)> {
        match client.get_project_fields_list(project) {
            Ok(fields) => fields
                .into_iter()
                .map(|f| (f.name.clone(), f.name))
                .collect(),
            Err(e) => {
                self.record("project", classify_project_error(&e), project);
                Vec::new()
            }
        }
    }

    fn project_choices(&mut self, client: &dyn IssueTracker, project: &str) -> Vec<(String, String)> {
        let mut choices = vec![(CHOOSE_PROJECT.0.to_string(), CHOOSE_PROJECT.1.to_string())];
        match client.get_projects() {
            Ok(projects) => choices.extend(projects.into_iter().map(project_choice)),
            Err(e) => self.record("project", classify_project_error(&e), project),
        }
        choices
    }
}

fn base_fields(input: &ConfigInput) -> Vec<ConfigField> {
    let url = ConfigField::new("url", "YouTrack Instance URL", ConfigFieldType::Text, true)
        .placeholder("e.g. \"https://yoursitename.myjetbrains.com/youtrack/\"");
    let username = ConfigField::new("username", "Username", ConfigFieldType::Text, true)
        .help("User should have admin rights.");
    let mut api_key = ConfigField::new("api_key", "API key", ConfigFieldType::Secret, false)
        .help("Only enter a api_key if you want to change it.");
    api_key.has_saved_value = input.api_key().is_some();

    vec![url, username, api_key]
}

fn project_choice(project: Project) -> (String, String) {
    let display = format!("{} ({})", project.name, project.id);
    (project.id, display)
}

fn classify_user_error(error: &TrackerError) -> (&'static str, ConfigErrorKind) {
    match error {
        TrackerError::Tls(_) => ("url", ConfigErrorKind::InvalidSsl),
        e if e.status() == Some(401) => ("username", ConfigErrorKind::InvalidApiKey),
        e if e.status() == Some(403) => ("username", ConfigErrorKind::Permissions),
        _ => ("url", ConfigErrorKind::Client),
    }
}

fn classify_project_error(error: &TrackerError) -> ConfigErrorKind {
    if error.is_not_found() {
        ConfigErrorKind::ProjectNotFound
    } else if error.status().is_some() {
        ConfigErrorKind::InvalidProject
    } else {
        ConfigErrorKind::ProjectUnknown
    }
}
