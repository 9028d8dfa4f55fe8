//! Time-bounded cache of resolved project field schemas.
//!
//! Resolving a project's fields costs one request per field plus one per
//! bundle, so the issue form reuses the result for a while. Entries are keyed
//! by host project, tracker project and ignore set, and are dropped when the
//! host project's options change.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;
use tracker_core::{CustomFieldDetail, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    host_project: String,
    tracker_project: String,
    ignore_fields: Vec<String>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    fields: Vec<CustomFieldDetail>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at >= ttl
    }
}

pub struct FieldSchemaCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl FieldSchemaCache {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return cached fields or fetch and store them
    ///
    /// Fetch errors are returned as-is and leave the cache untouched.
    pub fn get_or_fetch<F>(
        &self,
        host_project: &str,
        tracker_project: &str,
        ignore_fields: &[String],
        fetch: F,
    ) -> Result<Vec<CustomFieldDetail>>
    where
        F: FnOnce() -> Result<Vec<CustomFieldDetail>>,
    {
        self.get_or_fetch_at(host_project, tracker_project, ignore_fields, Utc::now(), fetch)
    }

    fn get_or_fetch_at<F>(
        &self,
        host_project: &str,
        tracker_project: &str,
        ignore_fields: &[String],
        now: DateTime<Utc>,
        fetch: F,
    ) -> Result<Vec<CustomFieldDetail>>
    where
        F: FnOnce() -> Result<Vec<CustomFieldDetail>>,
    {
        let mut ignore_fields = ignore_fields.to_vec();
        ignore_fields.sort();
        let key = CacheKey {
            host_project: host_project.to_string(),
            tracker_project: tracker_project.to_string(),
            ignore_fields,
        };

        if let Some(entry) = self.lock().get(&key) {
            if !entry.is_expired(now, self.ttl) {
                debug!(project = tracker_project, "Field schema cache hit");
                return Ok(entry.fields.clone());
            }
        }

        // Fetch without holding the lock; a concurrent miss just fetches twice
        let fields = fetch()?;
        let mut entries = self.lock();
        let ttl = self.ttl;
        entries.retain(|_, entry| !entry.is_expired(now, ttl));
        entries.insert(
            key,
            CacheEntry {
                fetched_at: now,
                fields: fields.clone(),
            },
        );
        Ok(fields)
    }

    /// Drop every entry of a host project
    pub fn invalidate_project(&self, host_project: &str) {
        self.lock().retain(|key, _| key.host_project != host_project);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
