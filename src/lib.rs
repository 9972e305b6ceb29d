//! # portsweep - concurrent TCP port scanning with banner grabbing
//!
//! Probes an inclusive range of ports on one host. Every port gets exactly
//! one [`PortRecord`]: closed if the connect failed, otherwise open with a
//! service name from a static table and a best-effort banner.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::scanner::{run_scan, ScanConfig};
//! use portsweep::types::ScanRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let request = ScanRequest::from_bounds("localhost", 20, 1024)?;
//!     let report = run_scan(&request, &ScanConfig::default()).await?;
//!
//!     for record in report.records() {
//!         println!("{}", record);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`services`] - Well-known port to service name table
//! - [`banner`] - Per-port banner negotiation strategies
//! - [`scanner`] - TCP prober and the scan coordinator
//! - [`types`] - Validated ports, ranges and requests
//! - [`config`] - Settings file loading
//! - [`output`] - Plain, JSON and CSV report formatters
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ScanError};
pub use scanner::{run_scan, PortRecord, Prober, ScanConfig, ScanReport};
pub use types::{Port, PortRange, ScanRequest};
