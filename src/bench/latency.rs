use hdrhistogram::Histogram;
use serde::Serialize;

/// Latency of one window operation over a harness run, in nanoseconds.
///
/// Carries the window capacity so rows from different runs can be told
/// apart once flattened into a report.
#[derive(Debug, Clone, Serialize)]
pub struct OpLatency {
    pub op: &'static str,
    pub window_cap: usize,
    pub calls: u64,
    pub min_ns: u64,
    pub p50_ns: u64,
    pub p95_ns: u64,
    pub p99_ns: u64,
    pub max_ns: u64,
    pub mean_ns: f64,
}

impl OpLatency {
    pub fn from_histogram(op: &'static str, window_cap: usize, hist: &Histogram<u64>) -> Self {
        let mut row = Self {
            op,
            window_cap,
            calls: hist.len(),
            min_ns: 0,
            p50_ns: 0,
            p95_ns: 0,
            p99_ns: 0,
            max_ns: 0,
            mean_ns: 0.0,
        };
        // An op that never ran stays all zeroes.
        if row.calls > 0 {
            row.min_ns = hist.min();
            row.p50_ns = hist.value_at_quantile(0.50);
            row.p95_ns = hist.value_at_quantile(0.95);
            row.p99_ns = hist.value_at_quantile(0.99);
            row.max_ns = hist.max();
            row.mean_ns = hist.mean();
        }
        row
    }

    pub fn has_data(&self) -> bool {
        self.calls > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_op_is_zeroed() {
        let hist = Histogram::<u64>::new_with_bounds(1, 1_000, 3).unwrap();
        let row = OpLatency::from_histogram("latest", 25, &hist);
        assert!(!row.has_data());
        assert_eq!(row.op, "latest");
        assert_eq!(row.window_cap, 25);
        assert_eq!(row.max_ns, 0);
    }

    #[test]
    fn extracts_quantiles() {
        let mut hist = Histogram::<u64>::new_with_bounds(1, 1_000, 3).unwrap();
        for v in [1u64, 2, 3, 4, 100] {
            hist.record(v).unwrap();
        }
        let row = OpLatency::from_histogram("all", 1000, &hist);
        assert_eq!(row.calls, 5);
        assert_eq!(row.min_ns, 1);
        assert_eq!(row.p50_ns, 3);
        assert_eq!(row.p95_ns, 100);
        assert_eq!(row.max_ns, 100);
    }
}
