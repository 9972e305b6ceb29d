//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Network failures during
//! a scan are not errors: they are folded into the port records. Only bad
//! input and bad configuration surface here.

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before a scan starts.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid ports: {0}")]
    InvalidPorts(#[from] PortError),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors from loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings in {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
