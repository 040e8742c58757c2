use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use crate::bench::{BenchCollector, OpKind, Sample};
use crate::config::BenchConfig;
use crate::metric::{Metric, PeerId};
use crate::window::Window;

/// Share of produced metrics flagged `valid`.
const VALID_RATIO: f64 = 0.95;

/// Knobs for a single harness run against one window.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub duration: Duration,
    pub readers: u32,
    /// Base delay between adds; readers poll `latest` at 2× and `all` at 3×
    pub add_interval: Duration,
    pub ttl: Duration,
    pub metric_name: String,
    pub peer: PeerId,
}

impl LoadOptions {
    pub fn from_config(cfg: &BenchConfig) -> Self {
        Self {
            duration: Duration::from_millis(cfg.duration_ms),
            readers: cfg.readers,
            add_interval: Duration::from_micros(cfg.add_interval_us.max(1)),
            ttl: Duration::from_secs(cfg.ttl_secs),
            metric_name: "ping".into(),
            peer: PeerId::from("peer1"),
        }
    }
}

// ─── Public entry point ──────────────────────────────────────────

/// Runs one producer and `readers` reader tasks against `window` until the
/// deadline passes or `running` is cleared.
///
/// The producer stamps each metric with its 1-based sequence number, so
/// after the run `window.latest()` holds the total number of adds.
pub async fn run(
    running: Arc<AtomicBool>,
    window: Arc<Window>,
    collector: Arc<BenchCollector>,
    opts: LoadOptions,
) {
    let deadline = Instant::now() + opts.duration;

    let mut handles = Vec::with_capacity(opts.readers as usize + 1);

    {
        let running = running.clone();
        let window = window.clone();
        let collector = collector.clone();
        let opts = opts.clone();
        handles.push(tokio::spawn(async move {
            producer(running, window, collector, opts, deadline).await;
        }));
    }

    for reader_id in 0..opts.readers {
        let running = running.clone();
        let window = window.clone();
        let collector = collector.clone();
        let base = opts.add_interval;

        handles.push(tokio::spawn(async move {
            reader(reader_id, running, window, collector, base, deadline).await;
        }));
    }

    for h in handles {
        if let Err(e) = h.await {
            tracing::error!("harness task failed: {e}");
        }
    }

    running.store(false, Ordering::SeqCst);
}

// ─── Timed window calls ──────────────────────────────────────────

fn elapsed_nanos(t0: Instant) -> u64 {
    u64::try_from(t0.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// `window.add(metric)`, timed.
pub fn timed_add(window: &Window, metric: Arc<Metric>) -> Sample {
    let t0 = Instant::now();
    window.add(metric);
    Sample::new(OpKind::Add, elapsed_nanos(t0))
}

/// `window.latest()`, timed.
pub fn timed_latest(window: &Window) -> Sample {
    let t0 = Instant::now();
    let hit = window.latest().is_ok();
    Sample::new(OpKind::Latest { hit }, elapsed_nanos(t0))
}

/// `window.all()`, timed. The snapshot is dropped after the clock stops.
pub fn timed_all(window: &Window) -> Sample {
    let t0 = Instant::now();
    let all = window.all();
    let nanos = elapsed_nanos(t0);
    Sample::new(OpKind::All { returned: all.len() }, nanos)
}

// ─── Producer loop ───────────────────────────────────────────────

async fn producer(
    running: Arc<AtomicBool>,
    window: Arc<Window>,
    collector: Arc<BenchCollector>,
    opts: LoadOptions,
    deadline: Instant,
) {
    let mut rng = StdRng::seed_from_u64(1000);
    let mut seq: u64 = 0;

    // The timer wheel fires at 1 ms granularity; Burst replays the missed
    // ticks so sub-millisecond intervals still average out to the right rate.
    let mut ticker = tokio::time::interval(opts.add_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    while running.load(Ordering::Relaxed) && Instant::now() < deadline {
        ticker.tick().await;

        seq += 1;
        let mut metric = Metric::new(opts.metric_name.as_str(), opts.peer.clone(), seq.to_string())
            .with_ttl(opts.ttl);
        // Producers occasionally publish readings they flag as unusable.
        metric.valid = rng.gen_bool(VALID_RATIO);

        collector.record(timed_add(&window, Arc::new(metric)));
    }

    tracing::debug!(adds = seq, "producer finished");
}

// ─── Reader loop ─────────────────────────────────────────────────

async fn reader(
    id: u32,
    running: Arc<AtomicBool>,
    window: Arc<Window>,
    collector: Arc<BenchCollector>,
    base: Duration,
    deadline: Instant,
) {
    // Even readers poll `latest`, odd readers poll `all`.
    let query_all = id % 2 == 1;
    let period = if query_all { base * 3 } else { base * 2 };
    let mut ticks = IntervalStream::new(tokio::time::interval(period));

    while ticks.next().await.is_some() {
        if !running.load(Ordering::Relaxed) || Instant::now() >= deadline {
            break;
        }

        let sample = if query_all {
            timed_all(&window)
        } else {
            timed_latest(&window)
        };
        collector.record(sample);
    }
}
