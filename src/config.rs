// Configuration resolution with priority

use serde::{Deserialize, Serialize};

use crate::questionnaire::DEFAULT_GCLOUD_VERSION;

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL for the backend API
    pub api_base_url: String,
    /// G-Cloud framework version to target
    pub gcloud_version: String,
    /// Draft autosave interval in seconds
    pub autosave_interval_secs: u64,
}

impl Default for AppConfig {
    /// Hardcoded fallback values, used when no source provides a field
    fn default() -> Self {
        Self {
            api_base_url: "/api".to_string(),
            gcloud_version: DEFAULT_GCLOUD_VERSION.to_string(),
            autosave_interval_secs: 30,
        }
    }
}

/// Partial configuration for merging
/// Uses Option<T> for all fields to support partial overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialAppConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub gcloud_version: Option<String>,
    #[serde(default)]
    pub autosave_interval_secs: Option<u64>,
}

/// Configuration resolver
/// Priority order: runtime override -> build-time default -> hardcoded fallback.
/// Sources are held highest-priority first; the first Some wins per field.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    sources: Vec<PartialAppConfig>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source below every source added so far
    pub fn with_source(mut self, source: PartialAppConfig) -> Self {
        self.sources.push(source);
        self
    }

    pub fn resolve(&self) -> AppConfig {
        let fallback = AppConfig::default();
        AppConfig {
            api_base_url: self
                .first(|s| s.api_base_url.clone())
                .unwrap_or(fallback.api_base_url),
            gcloud_version: self
                .first(|s| s.gcloud_version.clone())
                .unwrap_or(fallback.gcloud_version),
            autosave_interval_secs: self
                .first(|s| s.autosave_interval_secs)
                .unwrap_or(fallback.autosave_interval_secs),
        }
    }

    fn first<T>(&self, get: impl Fn(&PartialAppConfig) -> Option<T>) -> Option<T> {
        self.sources.iter().find_map(get)
    }
}
