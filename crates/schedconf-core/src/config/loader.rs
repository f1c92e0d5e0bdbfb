//! Configuration loader for YAML documents
//!
//! Loading is decode-only: the document is parsed, its kind checked, and
//! plugin arguments of registry-known kinds are lifted to their typed form.
//! Defaulting is a separate, explicit step so callers can inspect exactly
//! what the operator wrote.

use crate::config::defaults::{set_defaults_configuration, ArgsRegistry, DefaultingContext};
use crate::config::types::{Configuration, API_VERSION, CONFIGURATION_KIND};
use crate::errors::DefaultingError;
use std::path::Path;
use tokio::fs;

/// Configuration loader with argument decoding
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(
        path: P,
        registry: &ArgsRegistry,
    ) -> Result<Configuration, DefaultingError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            DefaultingError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        log::debug!("Loaded configuration document from {}", path.display());
        Self::from_str(&content, registry)
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str, registry: &ArgsRegistry) -> Result<Configuration, DefaultingError> {
        let mut config: Configuration = if content.trim().is_empty() {
            Configuration::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                DefaultingError::Config(format!("Failed to parse YAML config: {}", e))
            })?
        };

        if config.kind != CONFIGURATION_KIND {
            return Err(DefaultingError::Config(format!(
                "Unexpected document kind '{}', expected '{}'",
                config.kind, CONFIGURATION_KIND
            )));
        }
        if config.api_version != API_VERSION {
            log::warn!(
                "Configuration apiVersion is '{}', decoding as '{}'",
                config.api_version,
                API_VERSION
            );
        }

        for profile in config.profiles.iter_mut() {
            registry.decode_profile_args(profile);
        }

        Ok(config)
    }

    /// Load a YAML file and run the defaulting pass on it
    pub async fn load_defaulted<P: AsRef<Path>>(
        path: P,
        ctx: &DefaultingContext,
    ) -> Result<Configuration, DefaultingError> {
        let mut config = Self::from_file(path, ctx.registry()).await?;
        set_defaults_configuration(&mut config, ctx)?;
        Ok(config)
    }

    /// Render a configuration as YAML
    pub fn to_yaml(config: &Configuration) -> Result<String, DefaultingError> {
        serde_yaml::to_string(config).map_err(DefaultingError::from)
    }
}
