//! TCP connect prober.
//!
//! Completes a full handshake with the target using the operating system's
//! socket API, then hands the stream to the banner negotiator. Needs no
//! special privileges.

use crate::banner::BannerNegotiator;
use crate::scanner::traits::{PortRecord, Prober};
use crate::services;
use crate::types::Port;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Default connect timeout per port.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Probes ports on one host with TCP connect.
#[derive(Debug, Clone)]
pub struct TcpProber {
    host: String,
    connect_timeout: Duration,
    negotiator: BannerNegotiator,
}

impl TcpProber {
    /// Create a new prober.
    ///
    /// # Arguments
    /// * `host` - Host name or address literal, resolved on every connect
    /// * `connect_timeout` - Deadline for establishing each connection
    /// * `negotiator` - Banner strategy runner for open ports
    pub fn new(
        host: impl Into<String>,
        connect_timeout: Duration,
        negotiator: BannerNegotiator,
    ) -> Self {
        Self {
            host: host.into(),
            connect_timeout,
            negotiator,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Dial `dial_port` but classify the result as `port`.
    ///
    /// `probe` is `probe_as(port.as_u16(), port)`. Splitting the two lets a
    /// service on an arbitrary local port stand in for a well-known one.
    pub async fn probe_as(&self, dial_port: u16, port: Port) -> PortRecord {
        let Some(mut stream) = self.connect(dial_port).await else {
            return PortRecord::closed(port);
        };

        let service = services::lookup(port.as_u16());
        let banner = self.negotiator.negotiate(&mut stream, port.as_u16()).await;
        debug!(host = %self.host, %port, service, banner = %banner, "port open");

        PortRecord::open(port, service, banner)
    }

    /// Attempt to connect. Every failure kind is treated the same.
    async fn connect(&self, port: u16) -> Option<TcpStream> {
        match timeout(self.connect_timeout, TcpStream::connect((self.host.as_str(), port))).await
        {
            Ok(Ok(stream)) => Some(stream),
            Ok(Err(e)) => {
                debug!(host = %self.host, port, error = %e, "connect failed");
                None
            }
            Err(_) => {
                debug!(host = %self.host, port, "connect timed out");
                None
            }
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, port: Port) -> PortRecord {
        self.probe_as(port.as_u16(), port).await
    }
}
