//! JSON file storage for project options and group links.

use sentry_youtrack::{GroupMetaStore, OptionStore, PluginError, ProjectOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

type StoreResult<T> = sentry_youtrack::Result<T>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    projects: BTreeMap<String, ProjectOptions>,
    /// Group id -> key -> value
    #[serde(default)]
    groups: BTreeMap<String, BTreeMap<String, String>>,
}

/// Both stores in one file, read and written on every operation
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.error("read", e))?;
        serde_json::from_str(&content).map_err(|e| self.error("parse", e))
    }

    fn write(&self, file: &StoreFile) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(file).map_err(|e| self.error("encode", e))?;
        fs::write(&self.path, content).map_err(|e| self.error("write", e))
    }

    fn update(&self, change: impl FnOnce(&mut StoreFile)) -> StoreResult<()> {
        let mut file = self.read()?;
        change(&mut file);
        self.write(&file)
    }

    fn error(&self, action: &str, err: impl std::fmt::Display) -> PluginError {
        PluginError::Storage(format!(
            "Failed to {} {}: {}",
            action,
            self.path.display(),
            err
        ))
    }
}

impl OptionStore for JsonFileStore {
    fn load(&self, project: &str) -> StoreResult<ProjectOptions> {
        Ok(self
            .read()?
            .projects
            .remove(project)
            .unwrap_or_default())
    }

    fn save(&self, project: &str, options: &ProjectOptions) -> StoreResult<()> {
        self.update(|file| {
            file.projects.insert(project.to_string(), options.clone());
        })
    }

    fn reset(&self, project: &str) -> StoreResult<()> {
        self.update(|file| {
            file.projects.remove(project);
        })
    }
}

impl GroupMetaStore for JsonFileStore {
    fn get(&self, group: &str, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .read()?
            .groups
            .get(group)
            .and_then(|values| values.get(key))
            .cloned())
    }

    fn set(&self, group: &str, key: &str, value: &str) -> StoreResult<()> {
        self.update(|file| {
            file.groups
                .entry(group.to_string())
                .or_default()
                .insert(key.to_string(), value.to_string());
        })
    }
}
