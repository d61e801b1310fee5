//! Errors produced while loading and validating relay configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable error: {variable} - {reason}")]
    Environment { variable: String, reason: String },

    #[error("file error: {path} - {reason}")]
    File { path: String, reason: String },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
