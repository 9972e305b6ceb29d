//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Print results in CSV format.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), report)
}

/// Write one row per port under a `port,open,service,banner` header.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "open", "service", "banner"])?;
    for record in report.records() {
        wtr.write_record([
            record.port().to_string().as_str(),
            if record.is_open() { "true" } else { "false" },
            record.service(),
            record.banner(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
