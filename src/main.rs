//! window-bench — measures window operations under a producer/reader race.
//!
//! Run with:  `RUST_LOG=info window-bench [window.toml]`

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use peer_metric_window::bench::BenchCollector;
use peer_metric_window::load::{self, LoadOptions};
use peer_metric_window::{config, Window, WindowConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("window-bench v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 1. Load configuration ────────────────────────────────────
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "window.toml".to_string());
    let cfg = config::load(&path)?;
    let opts = LoadOptions::from_config(&cfg.bench);

    // ── 2. One harness run per window size ───────────────────────
    let collector = Arc::new(BenchCollector::new(0));
    let mut results = Vec::with_capacity(cfg.bench.window_sizes.len());

    for &size in &cfg.bench.window_sizes {
        let cap = WindowConfig::new(size).capacity();
        let window = Arc::new(Window::new(cap));
        collector.reset(cap);

        tracing::info!(
            window_cap = cap,
            readers = opts.readers,
            duration_ms = opts.duration.as_millis() as u64,
            "running harness"
        );

        let running = Arc::new(AtomicBool::new(true));
        load::run(running, window.clone(), collector.clone(), opts.clone()).await;

        let snapshot = collector.snapshot();
        tracing::info!(
            window_cap = cap,
            adds = snapshot.adds(),
            retained = window.len(),
            ops_per_sec = snapshot.ops_per_sec,
            "harness finished"
        );
        results.push(snapshot);
    }

    // ── 3. Report ────────────────────────────────────────────────
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
