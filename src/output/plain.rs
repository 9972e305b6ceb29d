//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{PortRecord, ScanReport};
use crate::types::ScanRequest;
use console::style;
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

/// Print results in human-readable plain text format to stdout.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plain(&mut out, report)
}

/// Write the per-port lines followed by the summary block.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    for record in report.records() {
        write_record(out, record)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style("=".repeat(RULE_WIDTH)).cyan())?;
    writeln!(out, "{}", style("SCAN SUMMARY:").bold())?;
    writeln!(out, "Total ports scanned: {}", report.total())?;
    writeln!(out, "Open ports: {}", style(report.open_count()).green().bold())?;
    writeln!(out, "Closed ports: {}", style(report.closed_count()).red())?;

    let open = report.open_ports();
    if !open.is_empty() {
        let list: Vec<String> = open.iter().map(|p| p.to_string()).collect();
        writeln!(out, "Open ports list: [{}]", list.join(", "))?;
    }
    writeln!(
        out,
        "{}",
        style(format!("Completed in {:.2}s", report.duration_ms() as f64 / 1000.0)).dim()
    )?;

    Ok(())
}

fn write_record<W: Write>(out: &mut W, record: &PortRecord) -> io::Result<()> {
    if !record.is_open() {
        return writeln!(out, "Port {} is {}", record.port(), style("CLOSED").red());
    }

    write!(out, "Port {} is {}", record.port(), style("OPEN").green().bold())?;
    if !record.service().is_empty() {
        write!(out, " - Service: {}", record.service())?;
    }
    if !record.banner().is_empty() {
        write!(out, " - Banner: {}", sanitize_banner(record.banner()))?;
    }
    writeln!(out)
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(request: &ScanRequest) {
    println!(
        "{} host {} ports {}...",
        style("Scanning").cyan(),
        style(request.host()).white().bold(),
        request.range()
    );
    println!("Detailed scan with service detection enabled");
    println!("{}", style("=".repeat(RULE_WIDTH + 1)).cyan());
    println!();
}

/// Print an error message to stdout, where the report would have gone.
pub fn print_error(msg: &str) {
    let stdout = io::stdout();
    // Nothing sensible is left to do if stdout itself is gone.
    let _ = write_error(&mut stdout.lock(), msg);
}

/// Write an error line in the report's style.
pub fn write_error<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("Error:").red().bold(), msg.trim_end())
}

/// Replace control characters so a hostile banner cannot drive the terminal.
fn sanitize_banner(banner: &str) -> String {
    banner
        .chars()
        .map(|c| if c.is_control() { '.' } else { c })
        .collect()
}
