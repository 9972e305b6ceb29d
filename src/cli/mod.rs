//! Command-line interface definitions.
//!
//! `portsweep <HOST> <START> <END>` with a handful of optional flags.

mod scan;

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Probe a range of TCP ports and identify the services behind them.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent TCP port scanner with banner grabbing", long_about = None)]
pub struct Cli {
    /// Host name or IP address to scan
    #[arg(value_name = "HOST")]
    pub host: String,

    /// First port of the range (inclusive)
    #[arg(value_name = "START", value_parser = clap::value_parser!(u16).range(1..))]
    pub start: u16,

    /// Last port of the range (inclusive)
    #[arg(value_name = "END", value_parser = clap::value_parser!(u16).range(1..))]
    pub end: u16,

    /// Maximum probes in flight (0 = one task per port, no limit)
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Show a progress bar while scanning
    #[arg(long)]
    pub progress: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a JSON settings file
    #[arg(long, value_name = "PATH", env = "PORTSWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["portsweep", "localhost", "20", "1024"]).unwrap();
        assert_eq!(cli.host, "localhost");
        assert_eq!((cli.start, cli.end), (20, 1024));
        assert_eq!(cli.output, OutputFormat::Plain);
        assert_eq!(cli.concurrency, None);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "portsweep", "10.0.0.1", "1", "100", "-c", "0", "-o", "json", "--progress",
        ])
        .unwrap();
        assert_eq!(cli.concurrency, Some(0));
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.progress);
    }

    #[test]
    fn test_malformed_ports_rejected() {
        assert!(Cli::try_parse_from(["portsweep", "localhost", "abc", "10"]).is_err());
        assert!(Cli::try_parse_from(["portsweep", "localhost", "0", "10"]).is_err());
        assert!(Cli::try_parse_from(["portsweep", "localhost", "1", "70000"]).is_err());
        assert!(Cli::try_parse_from(["portsweep", "localhost", "1"]).is_err());
    }
}
