//! Prober trait abstraction and the per-port record it produces.
//!
//! The coordinator only talks to a `Prober`, so the fan-out and collection
//! logic can be driven by test doubles as well as by real TCP probes.

use crate::types::Port;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Outcome of probing a single port. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortRecord {
    port: Port,
    open: bool,
    service: String,
    banner: String,
}

impl PortRecord {
    /// A port nothing answered on. Service and banner stay empty.
    pub fn closed(port: Port) -> Self {
        Self {
            port,
            open: false,
            service: String::new(),
            banner: String::new(),
        }
    }

    /// A port that accepted the connection.
    pub fn open(port: Port, service: impl Into<String>, banner: impl Into<String>) -> Self {
        Self {
            port,
            open: true,
            service: service.into(),
            banner: banner.into(),
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Service name, empty for closed ports.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Captured banner, empty when none.
    pub fn banner(&self) -> &str {
        &self.banner
    }
}

impl fmt::Display for PortRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.open {
            return write!(f, "Port {} is CLOSED", self.port);
        }
        write!(f, "Port {} is OPEN", self.port)?;
        if !self.service.is_empty() {
            write!(f, " - Service: {}", self.service)?;
        }
        if !self.banner.is_empty() {
            write!(f, " - Banner: {}", self.banner)?;
        }
        Ok(())
    }
}

/// Something that can probe one port and always produce a record.
///
/// Implementations must not fail: every network problem is expressed in
/// the returned record.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single port.
    async fn probe(&self, port: Port) -> PortRecord;
}
