use serde::{Deserialize, Serialize};

/// Tracker project, keyed by its short name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Short name (e.g., "PROJ"), used as the key of every project-scoped call
    pub id: String,
    pub name: String,
}

/// Custom field as listed for a project; `url` points at its detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldRef {
    pub name: String,
    pub url: String,
}

/// Whether a custom field holds one value or many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    Single,
    Multiple,
}

/// Fully resolved custom field with its permissible values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldDetail {
    pub name: String,
    /// Type tag such as `enum[1]`, `version[*]` or `string`
    #[serde(rename = "type")]
    pub field_type: String,
    pub empty_text: Option<String>,
    /// `None` when the field type is not backed by a bundle
    pub values: Option<Vec<String>>,
}

impl CustomFieldDetail {
    pub fn cardinality(&self) -> Option<Cardinality> {
        if self.field_type.ends_with("[*]") {
            Some(Cardinality::Multiple)
        } else if self.field_type.ends_with("[1]") {
            Some(Cardinality::Single)
        } else {
            None
        }
    }
}

/// Strip the `[..]` suffix from a field type tag
pub fn type_prefix(field_type: &str) -> &str {
    match field_type.find('[') {
        Some(idx) => &field_type[..idx],
        None => field_type,
    }
}

/// Minimal issue projection used for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub id: String,
    pub state: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Connection settings for a tracker instance, as stored by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub url: String,
    /// Backends may fall back to an environment token when `None`
    pub api_key: Option<String>,
    pub verify_ssl_certificate: bool,
}

/// Data for creating a new issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIssue {
    /// Project short name
    pub project: String,
    pub summary: String,
    pub description: String,
}
