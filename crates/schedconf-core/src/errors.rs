//! Error types for the configuration defaulting pass
//!
//! Defaulting itself has very few failure modes: a registry miss is a normal
//! outcome and malformed argument blobs are left for validation to report.
//! What remains is grouped by source so the process bootstrap can print an
//! actionable message before aborting startup.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefaultingError {
    #[error("Plugin merge failed for profile {profile}: {message}")]
    Merge { profile: String, message: String },
    #[error("Argument registry error: {0}")]
    Registry(String),
    #[error("Failed to decode arguments of kind '{kind}': {message}")]
    Decode { kind: String, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Feature gate error: {0}")]
    FeatureGate(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DefaultingError {
    fn from(err: std::io::Error) -> Self {
        DefaultingError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for DefaultingError {
    fn from(err: serde_yaml::Error) -> Self {
        DefaultingError::Config(err.to_string())
    }
}
