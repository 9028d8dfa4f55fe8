//! Storage the host application provides to the plugin.
//!
//! Options are stored per host project, group metadata per issue group. The
//! in-memory stores back tests and embedders without their own persistence.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;

/// Per-project plugin options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Linked YouTrack project id (short name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_fields: Vec<String>,
    /// Comma separated tags proposed on new issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tags: Option<String>,
    /// Default field values keyed by [`crate::forms::default_field_key`]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_fields: BTreeMap<String, String>,
}

impl ProjectOptions {
    /// Linked project id, ignoring blank values
    pub fn tracker_project(&self) -> Option<&str> {
        self.project
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// An issue group of the host, as far as the plugin needs to know it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    /// Host project the group belongs to
    pub project: String,
    pub title: String,
    pub description: String,
    /// Absolute url of the group page
    pub url: String,
}

pub trait OptionStore: Send + Sync {
    /// Stored options, or defaults for an unknown project
    fn load(&self, project: &str) -> Result<ProjectOptions>;
    fn save(&self, project: &str, options: &ProjectOptions) -> Result<()>;
    fn reset(&self, project: &str) -> Result<()>;
}

pub trait GroupMetaStore: Send + Sync {
    fn get(&self, group: &str, key: &str) -> Result<Option<String>>;
    fn set(&self, group: &str, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryOptionStore {
    projects: Mutex<HashMap<String, ProjectOptions>>,
}

impl InMemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project: &str, options: ProjectOptions) -> Self {
        self.lock().insert(project.to_string(), options);
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ProjectOptions>> {
        self.projects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl OptionStore for InMemoryOptionStore {
    fn load(&self, project: &str) -> Result<ProjectOptions> {
        Ok(self.lock().get(project).cloned().unwrap_or_default())
    }

    fn save(&self, project: &str, options: &ProjectOptions) -> Result<()> {
        self.lock().insert(project.to_string(), options.clone());
        Ok(())
    }

    fn reset(&self, project: &str) -> Result<()> {
        self.lock().remove(project);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryGroupMetaStore {
    values: Mutex<HashMap<(String, String), String>>,
}

impl InMemoryGroupMetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(String, String), String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl GroupMetaStore for InMemoryGroupMetaStore {
    fn get(&self, group: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .lock()
            .get(&(group.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&self, group: &str, key: &str, value: &str) -> Result<()> {
        self.lock()
            .insert((group.to_string(), key.to_string()), value.to_string());
        Ok(())
    }
}
