//! Scan request: what to scan.

use super::PortRange;
use crate::error::ScanError;
use serde::Serialize;
use std::fmt;

/// A host plus the inclusive port range to sweep on it.
///
/// The host is kept as given (name or address literal); resolution happens
/// per connection attempt so a resolution failure reads as a closed port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    host: String,
    range: PortRange,
}

impl ScanRequest {
    /// Create a new request, rejecting an empty host.
    pub fn new(host: impl Into<String>, range: PortRange) -> Result<Self, ScanError> {
        let host = host.into();
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(ScanError::InvalidConfig("host must not be empty".to_string()));
        }
        Ok(Self {
            host: trimmed.to_string(),
            range,
        })
    }

    /// Create a request from raw port bounds.
    pub fn from_bounds(host: impl Into<String>, start: u16, end: u16) -> Result<Self, ScanError> {
        Self::new(host, PortRange::from_bounds(start, end)?)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn range(&self) -> PortRange {
        self.range
    }
}

impl fmt::Display for ScanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ports {}", self.host, self.range)
    }
}
