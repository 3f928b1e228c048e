//! Configuration
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables. Every field has a default so an empty file is valid.

use crate::error::{Result, SceneError};
use crate::model::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable overriding the bridge URL
pub const ENV_SERVICE_URL: &str = "SCENECAST_SERVICE_URL";

/// Environment variable overriding the request timeout
pub const ENV_SERVICE_TIMEOUT_MS: &str = "SCENECAST_SERVICE_TIMEOUT_MS";

/// Environment variable selecting `mock` or `http`
pub const ENV_SERVICE_BACKEND: &str = "SCENECAST_SERVICE_BACKEND";

const DEFAULT_SERVICE_URL: &str = "http://localhost:8001";

/// 5 minutes
const DEFAULT_TIMEOUT_MS: u64 = 300_000;

const DEFAULT_MOCK_LATENCY_MS: u64 = 250;

/// Which generation service implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceBackend {
    #[default]
    Mock,
    Http,
}

impl ServiceBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Some(Self::Mock),
            "http" | "bridge" => Some(Self::Http),
            _ => None,
        }
    }
}

/// Generation service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub backend: ServiceBackend,
    pub url: String,
    pub timeout_ms: u64,
    pub mock_latency_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: ServiceBackend::default(),
            url: DEFAULT_SERVICE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            mock_latency_ms: DEFAULT_MOCK_LATENCY_MS,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,

    /// Starting point for the generator form
    pub defaults: GeneratorConfig,
}

impl AppConfig {
    /// Load from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load from an optional file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| env::var(key).ok())?;
        tracing::debug!(service = ?config.service, "configuration loaded");
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    ///
    /// Takes the lookup as a closure so tests do not touch the process
    /// environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVICE_URL) {
            self.service.url = url;
        }

        if let Some(raw) = lookup(ENV_SERVICE_TIMEOUT_MS) {
            self.service.timeout_ms = raw.trim().parse().map_err(|_| SceneError::Config {
                reason: format!("{} must be an integer, got '{}'", ENV_SERVICE_TIMEOUT_MS, raw),
            })?;
        }

        if let Some(raw) = lookup(ENV_SERVICE_BACKEND) {
            self.service.backend =
                ServiceBackend::from_str(&raw).ok_or_else(|| SceneError::Config {
                    reason: format!("{} must be 'mock' or 'http', got '{}'", ENV_SERVICE_BACKEND, raw),
                })?;
        }

        Ok(())
    }
}
