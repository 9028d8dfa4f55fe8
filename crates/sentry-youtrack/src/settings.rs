//! Plugin-wide settings, independent of any single host project.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix of the environment variables overriding settings
pub const ENV_PREFIX: &str = "YOUTRACK_";

const DEFAULT_FIELD_CACHE_TTL_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PluginSettings {
    /// Verify the tracker's TLS certificate
    pub verify_ssl_certificate: bool,
    /// Lifetime of cached project field schemas
    pub field_cache_ttl_secs: u64,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            verify_ssl_certificate: true,
            field_cache_ttl_secs: DEFAULT_FIELD_CACHE_TTL_SECS,
        }
    }
}

impl PluginSettings {
    /// Defaults, then the TOML file (if it exists), then `YOUTRACK_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(PluginSettings::default()));

        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX)).extract()
    }

    pub fn field_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.field_cache_ttl_secs)
    }
}
