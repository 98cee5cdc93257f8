//! Configuration loading for the feed clients.
//!
//! Configuration lives in a small YAML file; every field has a default so an
//! absent file or an empty document is a valid configuration. The sources API
//! key supports `${VAR}` indirection resolved from the environment at load
//! time, keeping secrets out of the file itself.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tokio::fs;

use crate::errors::FeedError;
use crate::quake::ALL_MONTH_CSV_URL;
use crate::sources::DEFAULT_SOURCES_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedlineConfig {
    #[serde(default)]
    pub quake: QuakeFeedConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for FeedlineConfig {
    fn default() -> Self {
        Self {
            quake: QuakeFeedConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuakeFeedConfig {
    #[serde(default = "default_quake_url")]
    pub url: String,
}

impl Default for QuakeFeedConfig {
    fn default() -> Self {
        Self {
            url: default_quake_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_sources_url")]
    pub url: String,
    /// Literal key, or `${VAR}` to read it from the environment at load time.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            url: default_sources_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_quake_url() -> String {
    ALL_MONTH_CSV_URL.to_string()
}

fn default_sources_url() -> String {
    DEFAULT_SOURCES_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl FeedlineConfig {
    fn validate(&self) -> Result<(), FeedError> {
        if self.quake.url.is_empty() {
            return Err(FeedError::Config("quake.url must not be empty".to_string()));
        }
        if self.sources.url.is_empty() {
            return Err(FeedError::Config(
                "sources.url must not be empty".to_string(),
            ));
        }
        if self.sources.timeout_secs == 0 {
            return Err(FeedError::Config(
                "sources.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration loader with environment resolution
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<FeedlineConfig, FeedError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            FeedError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_str(&content)
    }

    /// Load configuration from a YAML string. An empty document yields the
    /// defaults.
    pub fn from_str(content: &str) -> Result<FeedlineConfig, FeedError> {
        let mut config: FeedlineConfig = if content.trim().is_empty() {
            FeedlineConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| FeedError::Config(format!("Failed to parse YAML config: {}", e)))?
        };

        Self::resolve_environment(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve `${VAR}` indirections against the process environment.
    fn resolve_environment(config: &mut FeedlineConfig) -> Result<(), FeedError> {
        if let Some(ref key) = config.sources.api_key {
            if let Some(var) = key.strip_prefix("${").and_then(|k| k.strip_suffix('}')) {
                let value = env::var(var).map_err(|_| {
                    FeedError::Config(format!(
                        "Environment variable '{}' referenced by sources.api_key is not set",
                        var
                    ))
                })?;
                config.sources.api_key = Some(value);
            }
        }
        Ok(())
    }
}
