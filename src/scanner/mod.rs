//! Scanner module - coordinates per-port probes.
//!
//! Spawns one tokio task per port, optionally gated by a semaphore, drains
//! their records from a channel and hands back exactly one record per port,
//! ordered by port number.

pub mod tcp;
pub mod traits;

use crate::banner::{BannerNegotiator, BANNER_TIMEOUT, GENERIC_TIMEOUT};
use crate::error::{ScanError, ScanResult};
use crate::types::{Port, PortRange, ScanRequest};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

pub use tcp::{TcpProber, CONNECT_TIMEOUT};
pub use traits::{PortRecord, Prober};

/// Default number of probes allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 500;

/// Runtime knobs for a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Deadline for each TCP connect.
    pub connect_timeout: Duration,
    /// Overall deadline for one banner negotiation.
    pub banner_timeout: Duration,
    /// Deadline for the generic line read.
    pub generic_banner_timeout: Duration,
    /// Probes in flight at once; 0 launches every probe immediately.
    pub concurrency: usize,
    /// Draw a progress bar on stderr while collecting.
    pub show_progress: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            banner_timeout: BANNER_TIMEOUT,
            generic_banner_timeout: GENERIC_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            show_progress: false,
        }
    }
}

impl ScanConfig {
    /// Set the concurrency limit (0 = unbounded).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Reject settings no scan could run with.
    pub fn validate(&self) -> ScanResult<()> {
        let timeouts = [
            ("connect timeout", self.connect_timeout),
            ("banner timeout", self.banner_timeout),
            ("generic banner timeout", self.generic_banner_timeout),
        ];
        for (name, value) in timeouts {
            if value.is_zero() {
                return Err(ScanError::InvalidConfig(format!("{} must be non-zero", name)));
            }
        }
        if self.concurrency > Semaphore::MAX_PERMITS {
            return Err(ScanError::InvalidConfig(format!(
                "concurrency {} exceeds the maximum of {}",
                self.concurrency,
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }

    fn negotiator(&self) -> BannerNegotiator {
        BannerNegotiator::new(self.banner_timeout, self.generic_banner_timeout)
    }
}

/// Complete, ordered result of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    host: String,
    range: PortRange,
    started_at: DateTime<Utc>,
    duration_ms: u64,
    records: Vec<PortRecord>,
}

impl ScanReport {
    /// Build a report from records in any order. They are sorted by port.
    ///
    /// The caller vouches for one record per port of `range`.
    pub fn from_records(
        host: impl Into<String>,
        range: PortRange,
        mut records: Vec<PortRecord>,
    ) -> Self {
        records.sort_by_key(PortRecord::port);
        debug_assert_eq!(records.len(), range.len());
        Self {
            host: host.into(),
            range,
            started_at: Utc::now(),
            duration_ms: 0,
            records,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn range(&self) -> PortRange {
        self.range
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// One record per port, ascending.
    pub fn records(&self) -> &[PortRecord] {
        &self.records
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn open_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_open()).count()
    }

    pub fn closed_count(&self) -> usize {
        self.total() - self.open_count()
    }

    /// Open ports in ascending order.
    pub fn open_ports(&self) -> Vec<Port> {
        self.records
            .iter()
            .filter(|r| r.is_open())
            .map(PortRecord::port)
            .collect()
    }
}

/// Execute a complete scan of `request` with TCP connect probes.
///
/// Fails only on invalid configuration, before any connection is made.
pub async fn run_scan(request: &ScanRequest, config: &ScanConfig) -> ScanResult<ScanReport> {
    config.validate()?;

    let started_at = Utc::now();
    let clock = Instant::now();
    info!(%request, concurrency = config.concurrency, "starting scan");

    let prober = Arc::new(TcpProber::new(
        request.host(),
        config.connect_timeout,
        config.negotiator(),
    ));
    let records = scan_ports(prober, request.range(), config).await;

    let mut report = ScanReport::from_records(request.host(), request.range(), records);
    report.started_at = started_at;
    report.duration_ms = clock.elapsed().as_millis() as u64;
    info!(
        open = report.open_count(),
        total = report.total(),
        duration_ms = report.duration_ms,
        "scan complete"
    );
    Ok(report)
}

/// Probe every port of `range` with `prober` and collect the records.
///
/// The returned vector holds exactly `range.len()` records, ascending by
/// port. A probe task that dies without reporting is recorded as closed.
pub async fn scan_ports<P>(prober: Arc<P>, range: PortRange, config: &ScanConfig) -> Vec<PortRecord>
where
    P: Prober + 'static,
{
    // Callers skipping `validate` get the largest gate tokio allows.
    let limit = config.concurrency.min(Semaphore::MAX_PERMITS);
    let gate = (limit > 0).then(|| Arc::new(Semaphore::new(limit)));
    let progress = progress_bar(range.len(), config.show_progress);
    let (tx, mut rx) = mpsc::unbounded_channel::<PortRecord>();

    // Spawning runs beside the drain loop below so the progress bar moves
    // while the gate holds launches back.
    tokio::spawn(async move {
        for port in range.iter() {
            // Permit first: at most `concurrency` live probe tasks.
            let permit = match &gate {
                Some(gate) => Arc::clone(gate).acquire_owned().await.ok(),
                None => None,
            };
            let prober = Arc::clone(&prober);
            let tx = tx.clone();

            tokio::spawn(async move {
                let record = prober.probe(port).await;
                drop(permit);
                // The receiver outlives every sender.
                let _ = tx.send(record);
            });
        }
    });

    let mut collected: BTreeMap<Port, PortRecord> = BTreeMap::new();
    while let Some(record) = rx.recv().await {
        progress.inc(1);
        if record.is_open() {
            progress.set_message(format!("found open port {}", record.port()));
        }
        let port = record.port();
        if collected.insert(port, record).is_some() {
            warn!(%port, "duplicate record, keeping the latest");
        }
    }
    progress.finish_and_clear();

    for port in range.iter() {
        collected.entry(port).or_insert_with(|| {
            warn!(%port, "probe ended without reporting, marking closed");
            PortRecord::closed(port)
        });
    }
    debug!(records = collected.len(), "all probes drained");

    collected.into_values().collect()
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    )
    .map(|style| style.progress_chars("=>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    let pb = ProgressBar::new(len as u64);
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    /// Opens even ports, finishes in scrambled order and tracks load.
    #[derive(Default)]
    struct FakeProber {
        probed: Mutex<Vec<u16>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, port: Port) -> PortRecord {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = (port.as_u16() as u64 * 7919) % 23;
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.probed.lock().unwrap().push(port.as_u16());
            if port.as_u16() % 2 == 0 {
                PortRecord::open(port, "Fake", format!("banner {}", port))
            } else {
                PortRecord::closed(port)
            }
        }
    }

    /// Panics on one port without reporting.
    struct FlakyProber {
        bad: u16,
    }

    #[async_trait]
    impl Prober for FlakyProber {
        async fn probe(&self, port: Port) -> PortRecord {
            if port.as_u16() == self.bad {
                panic!("probe blew up");
            }
            PortRecord::open(port, "Fake", "")
        }
    }

    fn assert_complete(records: &[PortRecord], range: PortRange) {
        assert_eq!(records.len(), range.len());
        let ports: Vec<Port> = records.iter().map(PortRecord::port).collect();
        let expected: Vec<Port> = range.iter().collect();
        assert_eq!(ports, expected);
    }

    #[tokio::test]
    async fn test_every_port_once_sorted_unbounded() {
        let prober = Arc::new(FakeProber::default());
        let range = PortRange::from_bounds(100, 299).unwrap();
        let config = ScanConfig::default().with_concurrency(0);

        let records = scan_ports(Arc::clone(&prober), range, &config).await;

        assert_complete(&records, range);
        let mut probed = prober.probed.lock().unwrap().clone();
        probed.sort_unstable();
        assert_eq!(probed, (100..=299).collect::<Vec<u16>>());
        assert!(records.iter().all(|r| r.is_open() == (r.port().as_u16() % 2 == 0)));
    }

    #[tokio::test]
    async fn test_concurrency_gate_respected() {
        let prober = Arc::new(FakeProber::default());
        let range = PortRange::from_bounds(1, 64).unwrap();
        let config = ScanConfig::default().with_concurrency(4);

        let records = scan_ports(Arc::clone(&prober), range, &config).await;

        assert_complete(&records, range);
        assert!(prober.peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_single_port_range() {
        let prober = Arc::new(FakeProber::default());
        let range = PortRange::from_bounds(20, 20).unwrap();

        let records = scan_ports(prober, range, &ScanConfig::default()).await;
        assert_complete(&records, range);
    }

    #[tokio::test]
    async fn test_lost_probe_becomes_closed() {
        let prober = Arc::new(FlakyProber { bad: 12 });
        let range = PortRange::from_bounds(10, 14).unwrap();

        let records = scan_ports(prober, range, &ScanConfig::default()).await;

        assert_complete(&records, range);
        let lost = &records[2];
        assert_eq!(lost, &PortRecord::closed(Port::new(12).unwrap()));
        assert!(records.iter().filter(|r| r.is_open()).count() == 4);
    }

    #[tokio::test]
    async fn test_run_scan_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let request = ScanRequest::from_bounds("127.0.0.1", port, port).unwrap();
        let report = run_scan(&request, &ScanConfig::default()).await.unwrap();

        assert_eq!(report.host(), "127.0.0.1");
        assert_eq!(report.total(), 1);
        assert_eq!(report.open_count(), 1);
        assert_eq!(report.closed_count(), 0);
        assert_eq!(report.open_ports(), vec![Port::new(port).unwrap()]);
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected() {
        let request = ScanRequest::from_bounds("127.0.0.1", 1, 10).unwrap();
        let config = ScanConfig {
            connect_timeout: Duration::ZERO,
            ..ScanConfig::default()
        };

        let err = run_scan(&request, &config).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_oversized_concurrency_rejected() {
        let config = ScanConfig::default().with_concurrency(usize::MAX);
        assert!(matches!(config.validate(), Err(ScanError::InvalidConfig(_))));

        let request = ScanRequest::from_bounds("127.0.0.1", 1, 3).unwrap();
        let err = run_scan(&request, &config).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));

        let config = ScanConfig::default().with_concurrency(Semaphore::MAX_PERMITS);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_oversized_concurrency_clamped_without_validation() {
        let prober = Arc::new(FakeProber::default());
        let range = PortRange::from_bounds(1, 3).unwrap();
        let config = ScanConfig::default().with_concurrency(usize::MAX);

        let records = scan_ports(prober, range, &config).await;
        assert_complete(&records, range);
    }

    /// Bind a loopback port whose successor is free, so the pair spans one
    /// listening and one refusing port.
    async fn open_port_with_refused_neighbour() -> (TcpListener, u16) {
        loop {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let port = listener.local_addr().unwrap().port();
            if port == Port::MAX {
                continue;
            }
            if let Ok(neighbour) = TcpListener::bind(("127.0.0.1", port + 1)).await {
                drop(neighbour);
                return (listener, port);
            }
        }
    }

    #[tokio::test]
    async fn test_repeated_scan_gives_same_report() {
        let (listener, port) = open_port_with_refused_neighbour().await;
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                tokio::spawn(async move {
                    socket.write_all(b"stub-service 1.0\r\n").await.unwrap();
                    tokio::time::sleep(Duration::from_secs(5)).await;
                });
            }
        });

        let request = ScanRequest::from_bounds("127.0.0.1", port, port + 1).unwrap();
        let config = ScanConfig::default();
        let first = run_scan(&request, &config).await.unwrap();
        let second = run_scan(&request, &config).await.unwrap();

        assert_eq!(first.records(), second.records());
        assert_eq!(
            first.records()[0],
            PortRecord::open(Port::new(port).unwrap(), "Unknown", "stub-service 1.0")
        );
        assert_eq!(
            first.records()[1],
            PortRecord::closed(Port::new(port + 1).unwrap())
        );
    }
}
