//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading `course-versions.toml` or applying the CLI prefix.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid course-versions.toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
