use std::time::Instant;

use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::Serialize;

use super::latency::OpLatency;
use super::{OpKind, Sample};

// ─── Configuration ───────────────────────────────────────────────

/// HdrHistogram range: 1 ns → 60 s, 3 significant figures.
/// Window calls finish well under a microsecond, so record nanoseconds.
const HIST_LOW_NS: u64 = 1;
const HIST_HIGH_NS: u64 = 60_000_000_000;
const HIST_SIGFIG: u8 = 3;

// ─── Public types ────────────────────────────────────────────────

/// Thread-safe latency recorder for window operations.
/// Harness tasks call `record()`, the reporter calls `snapshot()`.
pub struct BenchCollector {
    inner: Mutex<Inner>,
}

/// Result of one harness run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchSnapshot {
    pub window_cap: usize,

    // Latency per operation
    pub add: OpLatency,
    pub latest: OpLatency,
    pub all: OpLatency,

    // Counters
    pub latest_hits: u64,
    pub latest_empty: u64,
    /// Largest snapshot `all` ever returned; never above `window_cap`
    pub max_all_len: usize,
    pub ops_per_sec: f64,
    pub elapsed_secs: f64,
}

impl BenchSnapshot {
    pub fn adds(&self) -> u64 {
        self.add.calls
    }
}

// ─── Internal state ──────────────────────────────────────────────

struct Inner {
    window_cap: usize,

    add_hist: Histogram<u64>,
    latest_hist: Histogram<u64>,
    all_hist: Histogram<u64>,

    latest_hits: u64,
    latest_empty: u64,
    max_all_len: usize,

    // Wall-clock anchor for elapsed time
    start_time: Option<Instant>,
}

// ─── BenchCollector impl ─────────────────────────────────────────

impl BenchCollector {
    pub fn new(window_cap: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::new(window_cap)),
        }
    }

    pub fn record(&self, sample: Sample) {
        self.inner.lock().record(sample);
    }

    /// Wipe all data before the next run.
    pub fn reset(&self, window_cap: usize) {
        *self.inner.lock() = Inner::new(window_cap);
    }

    pub fn snapshot(&self) -> BenchSnapshot {
        self.inner.lock().snapshot()
    }
}

// ─── Inner impl ──────────────────────────────────────────────────

fn histogram() -> Histogram<u64> {
    Histogram::<u64>::new_with_bounds(HIST_LOW_NS, HIST_HIGH_NS, HIST_SIGFIG)
        .expect("histogram creation")
}

impl Inner {
    fn new(window_cap: usize) -> Self {
        Self {
            window_cap,
            add_hist: histogram(),
            latest_hist: histogram(),
            all_hist: histogram(),
            latest_hits: 0,
            latest_empty: 0,
            max_all_len: 0,
            start_time: None,
        }
    }

    fn record(&mut self, sample: Sample) {
        // Lazily set the anchor on the very first sample
        self.start_time.get_or_insert_with(Instant::now);

        let nanos = sample.nanos.clamp(HIST_LOW_NS, HIST_HIGH_NS);

        match sample.op {
            OpKind::Add => {
                let _ = self.add_hist.record(nanos);
            }
            OpKind::Latest { hit } => {
                if hit {
                    self.latest_hits += 1;
                } else {
                    self.latest_empty += 1;
                }
                let _ = self.latest_hist.record(nanos);
            }
            OpKind::All { returned } => {
                self.max_all_len = self.max_all_len.max(returned);
                let _ = self.all_hist.record(nanos);
            }
        }
    }

    fn snapshot(&self) -> BenchSnapshot {
        let elapsed_secs = self
            .start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);

        let total = self.add_hist.len() + self.latest_hist.len() + self.all_hist.len();
        let ops_per_sec = if elapsed_secs > 0.0 {
            total as f64 / elapsed_secs
        } else {
            0.0
        };

        let cap = self.window_cap;
        BenchSnapshot {
            window_cap: cap,
            add: OpLatency::from_histogram("add", cap, &self.add_hist),
            latest: OpLatency::from_histogram("latest", cap, &self.latest_hist),
            all: OpLatency::from_histogram("all", cap, &self.all_hist),
            latest_hits: self.latest_hits,
            latest_empty: self.latest_empty,
            max_all_len: self.max_all_len,
            ops_per_sec,
            elapsed_secs,
        }
    }
}
