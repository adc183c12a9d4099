//! Core error types for questmap-core.
//!
//! Only a malformed curriculum aborts a derivation. Ledger gaps, orphan
//! records and empty inputs are steady-state conditions and never show up
//! here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for questmap-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The curriculum tree is structurally broken
    #[error("Invalid curriculum: {0}")]
    InvalidTree(#[from] InvalidTreeError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural defects in a curriculum document.
///
/// Empty collections are valid ("no content yet"); only a missing
/// collection or a repeated subtopic id is a defect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTreeError {
    /// A module has no `topics` collection at all
    #[error("module {module_index} ('{module_title}') has no topics collection")]
    MissingTopics {
        module_index: usize,
        module_title: String,
    },

    /// A topic has no `subtopics` collection at all
    #[error("topic {topic_index} ('{topic_title}') of module {module_index} has no subtopics collection")]
    MissingSubtopics {
        module_index: usize,
        topic_index: usize,
        topic_title: String,
    },

    /// Two subtopics share one identifier
    #[error("subtopic id '{id}' appears more than once (modules {first_module} and {second_module})")]
    DuplicateSubtopicId {
        id: String,
        first_module: usize,
        second_module: usize,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration document
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
