//! Run metrics
//!
//! Counters for one batch run: how many URLs were written or skipped (and
//! why), plus per-URL processing durations for a latency summary.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Maximum number of duration samples kept
const MAX_DURATION_SAMPLES: usize = 1000;

/// Memory-bounded ring buffer of samples
#[derive(Debug)]
struct RingBuffer<T> {
    data: Vec<T>,
    capacity: usize,
    write_pos: usize,
}

impl<T: Clone + Ord> RingBuffer<T> {
    fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            write_pos: 0,
        }
    }

    fn push(&mut self, value: T) {
        if self.data.len() < self.capacity {
            self.data.push(value);
        } else {
            self.data[self.write_pos] = value;
        }
        self.write_pos = (self.write_pos + 1) % self.capacity;
    }

    fn percentile(&self, p: f64) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let mut sorted = self.data.clone();
        sorted.sort();
        let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
        sorted.get(idx.min(sorted.len() - 1)).cloned()
    }
}

/// Counters for a scraping run
#[derive(Debug)]
pub struct Metrics {
    /// URLs processed
    pub urls_total: AtomicU64,
    /// Records appended to the store
    pub written_total: AtomicU64,
    /// URLs skipped for any reason
    pub skipped_total: AtomicU64,
    skips_by_reason: RwLock<BTreeMap<String, u64>>,
    durations: RwLock<RingBuffer<Duration>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Fresh counters
    pub fn new() -> Self {
        Self {
            urls_total: AtomicU64::new(0),
            written_total: AtomicU64::new(0),
            skipped_total: AtomicU64::new(0),
            skips_by_reason: RwLock::new(BTreeMap::new()),
            durations: RwLock::new(RingBuffer::new(MAX_DURATION_SAMPLES)),
        }
    }

    /// Record a written URL
    pub fn record_written(&self, elapsed: Duration) {
        self.urls_total.fetch_add(1, Ordering::Relaxed);
        self.written_total.fetch_add(1, Ordering::Relaxed);
        self.record_duration(elapsed);
    }

    /// Record a skipped URL
    pub fn record_skip(&self, reason: &str, elapsed: Duration) {
        self.urls_total.fetch_add(1, Ordering::Relaxed);
        self.skipped_total.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut by_reason) = self.skips_by_reason.write() {
            *by_reason.entry(reason.to_string()).or_insert(0) += 1;
        }
        self.record_duration(elapsed);
    }

    fn record_duration(&self, elapsed: Duration) {
        if let Ok(mut durations) = self.durations.write() {
            durations.push(elapsed);
        }
    }

    /// Skip counts keyed by reason string
    pub fn skips_by_reason(&self) -> BTreeMap<String, u64> {
        self.skips_by_reason
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Duration percentile (0.0..=1.0) over the retained samples
    pub fn duration_percentile(&self, p: f64) -> Option<Duration> {
        self.durations.read().ok().and_then(|d| d.percentile(p))
    }

    /// Multi-line plain-text summary for logs
    pub fn summary(&self) -> String {
        let mut out = format!(
            "urls={} written={} skipped={}",
            self.urls_total.load(Ordering::Relaxed),
            self.written_total.load(Ordering::Relaxed),
            self.skipped_total.load(Ordering::Relaxed),
        );
        for (reason, count) in self.skips_by_reason() {
            out.push_str(&format!("\n  skip[{}]={}", reason, count));
        }
        if let (Some(p50), Some(p95)) = (
            self.duration_percentile(0.5),
            self.duration_percentile(0.95),
        ) {
            out.push_str(&format!(
                "\n  duration p50={}ms p95={}ms",
                p50.as_millis(),
                p95.as_millis()
            ));
        }
        out
    }
}
