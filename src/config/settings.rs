//! Scan settings and where to find them.
//!
//! Settings live in a JSON file. An explicit `--config` path wins, then
//! `settings.json` in the XDG config directory, then built-in defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{ScanConfig, DEFAULT_CONCURRENCY};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Location of the per-user settings file, if a home directory exists.
pub fn default_settings_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "portsweep", "portsweep")
        .map(|project| project.config_dir().join("settings.json"))
}

/// Tunable scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Banner negotiation envelope in milliseconds.
    pub banner_timeout_ms: u64,
    /// Generic line-read deadline in milliseconds.
    pub generic_banner_timeout_ms: u64,
    /// Probes in flight at once, 0 for unbounded.
    pub concurrency: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 2000,
            banner_timeout_ms: 3000,
            generic_banner_timeout_ms: 500,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ScanSettings {
    /// Resolve settings: explicit path, then the default file, then defaults.
    ///
    /// A missing default file is not an error; a missing explicit one is.
    pub fn resolve(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match default_settings_file() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        debug!(path = %path.display(), "loading settings");
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Turn the settings into runtime scan knobs.
    pub fn to_scan_config(&self) -> ScanConfig {
        ScanConfig {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            banner_timeout: Duration::from_millis(self.banner_timeout_ms),
            generic_banner_timeout: Duration::from_millis(self.generic_banner_timeout_ms),
            concurrency: self.concurrency,
            show_progress: false,
        }
    }
}
