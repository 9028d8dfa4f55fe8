//! Input forms for issue creation, assignment and field defaults.
//!
//! Project fields become controls named `field_1`, `field_2`, ... and carry
//! the tracker field name as `data_field`. Submitted data is a multi-map of
//! strings, the way an HTML form posts it.

use chrono::NaiveDate;
use md5::{Digest, Md5};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;
use tracker_core::{Cardinality, CustomFieldDetail};

use crate::error::FormError;

const FIELD_PREFIX: &str = "field_";
const DATE_FORMAT: &str = "%Y-%m-%d";
const EMPTY_CHOICE: (&str, &str) = ("", "-----");
const DEFAULT_FIELD_MAX_LENGTH: usize = 255;

/// Storage key of a field's default value
///
/// Defaults are stored under the lowercase hex MD5 of the field name rather
/// than the name itself. Existing stored defaults depend on this key.
pub fn default_field_key(field_name: &str) -> String {
    format!("{:x}", Md5::digest(field_name.as_bytes()))
}

/// Submitted form data; a name may carry several values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.append(name, value);
        self
    }

    pub fn append(&mut self, name: &str, value: &str) {
        self.values
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// First value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    fn non_empty(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Float,
    Integer,
    Date,
    Text,
    Select { choices: Vec<(String, String)> },
    MultiSelect { choices: Vec<(String, String)> },
}

impl FieldKind {
    fn scalar(field_type: &str) -> Option<Self> {
        match field_type {
            "float" => Some(FieldKind::Float),
            "integer" => Some(FieldKind::Integer),
            "date" => Some(FieldKind::Date),
            "string" => Some(FieldKind::Text),
            _ => None,
        }
    }
}

/// Pre-filled value of a control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Initial {
    Value(String),
    Values(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormControl {
    pub name: String,
    pub label: String,
    /// Tracker field the control edits
    pub data_field: String,
    pub kind: FieldKind,
    pub required: bool,
    pub initial: Option<Initial>,
}

/// A cleaned project field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Date(NaiveDate),
    Text(String),
    Choices(Vec<String>),
}

impl FieldValue {
    /// Values as they appear in tracker commands, one per command
    pub fn command_values(&self) -> Vec<String> {
        match self {
            FieldValue::Float(v) => vec![v.to_string()],
            FieldValue::Integer(v) => vec![v.to_string()],
            FieldValue::Date(d) => vec![d.format(DATE_FORMAT).to_string()],
            FieldValue::Text(v) => vec![v.clone()],
            FieldValue::Choices(values) => values.clone(),
        }
    }
}

/// Controls for the custom fields of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectFieldsForm {
    pub controls: Vec<FormControl>,
}

impl ProjectFieldsForm {
    /// Fields without a scalar type and without values get no control
    pub fn new(fields: &[CustomFieldDetail], defaults: &BTreeMap<String, String>) -> Self {
        let mut controls = Vec::new();
        for field in fields {
            let Some(kind) = control_kind(field) else {
                continue;
            };
            let initial = defaults
                .get(&default_field_key(&field.name))
                .filter(|v| !v.is_empty())
                .map(|v| match &kind {
                    FieldKind::MultiSelect { .. } => {
                        Initial::Values(v.split(',').map(str::to_string).collect())
                    }
                    _ => Initial::Value(v.clone()),
                });
            controls.push(FormControl {
                name: format!("{}{}", FIELD_PREFIX, controls.len() + 1),
                label: field.name.clone(),
                data_field: field.name.clone(),
                kind,
                required: false,
                initial,
            });
        }
        Self { controls }
    }

    pub fn control(&self, name: &str) -> Option<&FormControl> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// Clean submitted values per control, keyed by tracker field name
    ///
    /// Missing or invalid input yields `None` for that field; it never fails
    /// the whole form.
    pub fn field_values(&self, data: &FormData) -> Vec<(String, Option<FieldValue>)> {
        self.controls
            .iter()
            .map(|control| {
                let value = clean_control(control, data);
                (control.data_field.clone(), value)
            })
            .collect()
    }
}

fn control_kind(field: &CustomFieldDetail) -> Option<FieldKind> {
    if let Some(kind) = FieldKind::scalar(&field.field_type) {
        return Some(kind);
    }
    let values = field.values.as_ref().filter(|v| !v.is_empty())?;
    let choices: Vec<(String, String)> = values.iter().map(|v| (v.clone(), v.clone())).collect();

    if field.cardinality() == Some(Cardinality::Multiple) {
        Some(FieldKind::MultiSelect { choices })
    } else {
        let mut with_empty = vec![(EMPTY_CHOICE.0.to_string(), EMPTY_CHOICE.1.to_string())];
        with_empty.extend(choices);
        Some(FieldKind::Select {
            choices: with_empty,
        })
    }
}

fn clean_control(control: &FormControl, data: &FormData) -> Option<FieldValue> {
    let is_choice = |choices: &[(String, String)], value: &str| {
        choices.iter().any(|(key, _)| !key.is_empty() && key == value)
    };

    if let FieldKind::MultiSelect { choices } = &control.kind {
        let submitted: Vec<String> = data
            .get_all(&control.name)
            .iter()
            .filter(|v| !v.is_empty())
            .cloned()
            .collect();
        if submitted.is_empty() {
            return None;
        }
        if let Some(bad) = submitted.iter().find(|v| !is_choice(choices, v)) {
            warn!(field = %control.data_field, value = %bad, "Dropping invalid choice");
            return None;
        }
        return Some(FieldValue::Choices(submitted));
    }

    let raw = data.non_empty(&control.name)?;
    let value = match &control.kind {
        FieldKind::Float => raw.parse().ok().map(FieldValue::Float),
        FieldKind::Integer => raw.parse().ok().map(FieldValue::Integer),
        FieldKind::Date => NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .ok()
            .map(FieldValue::Date),
        FieldKind::Text => Some(FieldValue::Text(raw.clone())),
        FieldKind::Select { choices } if is_choice(choices, &raw) => {
            Some(FieldValue::Choices(vec![raw.clone()]))
        }
        _ => None,
    };
    if value.is_none() {
        warn!(field = %control.data_field, value = %raw, "Dropping invalid input");
    }
    value
}

/// Values pre-filled into a new issue form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitialData {
    pub title: String,
    pub description: String,
    pub tags: Option<String>,
    pub default_fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssueForm {
    pub initial: InitialData,
    pub project_fields: ProjectFieldsForm,
}

/// A validated new issue submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub field_values: Vec<(String, Option<FieldValue>)>,
}

impl NewIssueForm {
    pub fn new(fields: &[CustomFieldDetail], initial: InitialData) -> Self {
        let project_fields = ProjectFieldsForm::new(fields, &initial.default_fields);
        Self {
            initial,
            project_fields,
        }
    }

    pub fn clean(&self, data: &FormData) -> Result<NewIssue, FormError> {
        let title = data.non_empty("title");
        let description = data.non_empty("description");

        let (title, description) = match (title, description) {
            (Some(title), Some(description)) => (title, description),
            (title, description) => {
                let mut missing = Vec::new();
                if title.is_none() {
                    missing.push("title".to_string());
                }
                if description.is_none() {
                    missing.push("description".to_string());
                }
                return Err(FormError::MissingFields(missing));
            }
        };

        Ok(NewIssue {
            title,
            description,
            tags: split_tags(data.get("tags").unwrap_or_default()),
            field_values: self.project_fields.field_values(data),
        })
    }
}

/// Comma separated tags, trimmed, blanks dropped
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Link a group to an existing issue
pub struct AssignIssueForm;

impl AssignIssueForm {
    /// The issue id to link
    pub fn clean(data: &FormData) -> Result<String, FormError> {
        data.non_empty("issue")
            .ok_or_else(|| FormError::MissingFields(vec!["issue".to_string()]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultField {
    pub field: String,
    pub value: String,
}

/// Store a field value as the project default
pub struct DefaultFieldForm;

impl DefaultFieldForm {
    pub fn clean(data: &FormData) -> Result<DefaultField, FormError> {
        let field = data
            .non_empty("field")
            .ok_or_else(|| FormError::MissingFields(vec!["field".to_string()]))?;
        let value = data.get("value").map(str::trim).unwrap_or_default().to_string();

        for (name, text) in [("field", &field), ("value", &value)] {
            if text.chars().count() > DEFAULT_FIELD_MAX_LENGTH {
                return Err(FormError::TooLong {
                    field: name.to_string(),
                    max: DEFAULT_FIELD_MAX_LENGTH,
                });
            }
        }

        Ok(DefaultField { field, value })
    }
}
