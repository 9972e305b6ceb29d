//! Scan command execution.

use super::{Cli, OutputFormat};
use crate::config::ScanSettings;
use crate::error::CliResult;
use crate::output;
use crate::scanner::{run_scan, ScanConfig};
use crate::types::ScanRequest;
use tracing::debug;

impl Cli {
    /// Merge the settings file with command-line overrides.
    pub fn scan_config(&self, settings: &ScanSettings) -> ScanConfig {
        let mut config = settings.to_scan_config();
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if self.progress {
            config = config.with_progress();
        }
        config
    }

    /// Validate input, run the scan and print the report.
    pub async fn execute(&self) -> CliResult<()> {
        let request = ScanRequest::from_bounds(&self.host, self.start, self.end)?;
        let settings = ScanSettings::resolve(self.config.as_deref())?;
        let config = self.scan_config(&settings);
        config.validate()?;
        debug!(?config, "resolved scan configuration");

        if self.output == OutputFormat::Plain {
            output::print_scan_header(&request);
        }

        let report = run_scan(&request, &config).await?;
        output::print_report(&report, self.output)?;
        Ok(())
    }
}
