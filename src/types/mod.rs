//! Core type definitions using newtype patterns for type safety.
//!
//! Invalid ports and inverted ranges cannot be constructed, so the scan
//! engine never has to re-check its input.

mod port;
mod request;

pub use port::{Port, PortError, PortRange};
pub use request::ScanRequest;
