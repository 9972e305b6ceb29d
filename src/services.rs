//! Service detection based on well-known port numbers.
//!
//! Provides mapping from port numbers to likely service names.

/// Name reported for ports missing from the table.
pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Look up the probable service name for a given port.
///
/// Returns `None` if the port is not in the well-known services table.
pub fn get(port: u16) -> Option<&'static str> {
    let name = match port {
        20 => "FTP Data",
        21 => "FTP Control",
        22 => "SSH",
        23 => "Telnet",
        25 => "SMTP",
        53 => "DNS",
        80 => "HTTP",
        110 => "POP3",
        143 => "IMAP",
        443 => "HTTPS",
        993 => "IMAPS",
        995 => "POP3S",
        1433 => "MS SQL Server",
        1521 => "Oracle DB",
        3306 => "MySQL",
        3389 => "RDP",
        5000 | 5001 => "Flask/Python Dev Server",
        5432 => "PostgreSQL",
        6379 => "Redis",
        7000 => "Cassandra/Custom",
        8000 => "HTTP Alt/Django",
        8080 => "HTTP Alt/Tomcat",
        8443 => "HTTPS Alt",
        9200 => "Elasticsearch",
        27017 => "MongoDB",
        _ => return None,
    };
    Some(name)
}

/// Service name for a port, falling back to [`UNKNOWN_SERVICE`].
pub fn lookup(port: u16) -> &'static str {
    get(port).unwrap_or(UNKNOWN_SERVICE)
}
