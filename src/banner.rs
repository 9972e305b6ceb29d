//! Banner negotiation on an established connection.
//!
//! Picks a per-port strategy, performs at most one write and a bounded read,
//! and turns whatever comes back into a short identifying string. Nothing
//! here can fail: every I/O problem degrades to the strategy's fallback text.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::timeout;
use tracing::{debug, trace};

/// Maximum bytes to read for a banner.
pub const MAX_BANNER_SIZE: usize = 1024;

/// Overall deadline for one negotiation.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(3);

/// Tighter deadline for the generic line read.
pub const GENERIC_TIMEOUT: Duration = Duration::from_millis(500);

/// Longest line the generic strategy will buffer.
const MAX_LINE_SIZE: u64 = 64 * 1024;

/// Request sent to HTTP-classified ports.
pub const HTTP_PROBE: &[u8] =
    b"GET / HTTP/1.1\r\nHost: localhost\r\nUser-Agent: PortScanner\r\n\r\n";

/// How to coax a banner out of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Send [`HTTP_PROBE`], report the status line.
    Http,
    /// Wait for the unsolicited greeting and prefix it.
    Greeting {
        prefix: &'static str,
        fallback: &'static str,
    },
    /// Known service without a usable plaintext banner. No I/O.
    Fixed(&'static str),
    /// Binary handshake: only the presence of bytes matters.
    Handshake {
        present: &'static str,
        absent: &'static str,
    },
    /// Read a single line of text, if any arrives quickly.
    GenericLine,
}

impl Strategy {
    /// Select the strategy for a port.
    pub const fn for_port(port: u16) -> Self {
        match port {
            80 | 8000 | 8080 => Self::Http,
            21 => Self::Greeting {
                prefix: "FTP",
                fallback: "FTP Service",
            },
            22 => Self::Greeting {
                prefix: "SSH",
                fallback: "SSH Service",
            },
            25 => Self::Greeting {
                prefix: "SMTP",
                fallback: "SMTP Service",
            },
            5432 => Self::Fixed("PostgreSQL Database"),
            3306 => Self::Handshake {
                present: "MySQL Database Server",
                absent: "MySQL Service",
            },
            _ => Self::GenericLine,
        }
    }

    /// Text reported when the negotiation gets nothing usable.
    pub const fn fallback(&self) -> &'static str {
        match self {
            Self::Http => "HTTP Service",
            Self::Greeting { fallback, .. } => fallback,
            Self::Fixed(text) => text,
            Self::Handshake { absent, .. } => absent,
            Self::GenericLine => "",
        }
    }
}

/// Runs banner strategies under fixed deadlines.
#[derive(Debug, Clone, Copy)]
pub struct BannerNegotiator {
    envelope: Duration,
    generic_timeout: Duration,
}

impl Default for BannerNegotiator {
    fn default() -> Self {
        Self::new(BANNER_TIMEOUT, GENERIC_TIMEOUT)
    }
}

impl BannerNegotiator {
    /// Create a negotiator.
    ///
    /// # Arguments
    /// * `envelope` - Deadline for the whole negotiation
    /// * `generic_timeout` - Deadline for the generic line read
    pub fn new(envelope: Duration, generic_timeout: Duration) -> Self {
        Self {
            envelope,
            generic_timeout,
        }
    }

    /// Extract a banner from an open connection to `port`.
    pub async fn negotiate<S>(&self, stream: &mut S, port: u16) -> String
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let strategy = Strategy::for_port(port);
        trace!(port, ?strategy, "negotiating banner");

        match timeout(self.envelope, self.run(strategy, stream)).await {
            Ok(banner) => banner,
            Err(_) => {
                debug!(port, "banner negotiation timed out");
                strategy.fallback().to_string()
            }
        }
    }

    async fn run<S>(&self, strategy: Strategy, stream: &mut S) -> String
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match strategy {
            Strategy::Http => http_status_line(stream)
                .await
                .map(|line| format!("HTTP - {}", line))
                .unwrap_or_else(|| strategy.fallback().to_string()),
            Strategy::Greeting { prefix, fallback } => match read_chunk(stream).await {
                Some(data) => format!("{} - {}", prefix, String::from_utf8_lossy(&data).trim()),
                None => fallback.to_string(),
            },
            Strategy::Fixed(text) => text.to_string(),
            Strategy::Handshake { present, absent } => match read_chunk(stream).await {
                Some(_) => present.to_string(),
                None => absent.to_string(),
            },
            Strategy::GenericLine => timeout(self.generic_timeout, read_line(stream))
                .await
                .ok()
                .flatten()
                .unwrap_or_default(),
        }
    }
}

/// Send the HTTP probe and return the first line of the reply.
async fn http_status_line<S>(stream: &mut S) -> Option<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Err(e) = stream.write_all(HTTP_PROBE).await {
        trace!(error = %e, "http probe write failed");
        return None;
    }
    let data = read_chunk(stream).await?;
    let text = String::from_utf8_lossy(&data);
    let status_line = text.split("\r\n").next().unwrap_or_default().to_string();
    Some(status_line)
}

/// One read of up to [`MAX_BANNER_SIZE`] bytes. EOF counts as nothing.
async fn read_chunk<S>(stream: &mut S) -> Option<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; MAX_BANNER_SIZE];
    match stream.read(&mut buffer).await {
        Ok(0) => {
            trace!("peer closed before sending a banner");
            None
        }
        Ok(n) => {
            buffer.truncate(n);
            Some(buffer)
        }
        Err(e) => {
            trace!(error = %e, "banner read failed");
            None
        }
    }
}

/// Read one `\n`-terminated line (or the tail before EOF), trimmed.
///
/// Empty lines and lines that overflow [`MAX_LINE_SIZE`] yield `None`.
async fn read_line<S>(stream: &mut S) -> Option<String>
where
    S: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream.take(MAX_LINE_SIZE));
    let mut line = Vec::new();
    let n = reader.read_until(b'\n', &mut line).await.ok()?;
    if n == 0 || (line.last() != Some(&b'\n') && n as u64 >= MAX_LINE_SIZE) {
        return None;
    }

    let text = String::from_utf8_lossy(&line).trim().to_string();
    (!text.is_empty()).then_some(text)
}
