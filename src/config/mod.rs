//! Configuration management for portsweep.
//!
//! Loads scan settings from an XDG-compliant location or an explicit file.

mod settings;

pub use settings::{default_settings_file, ScanSettings};
