//! Bounded recency windows for peer health metrics.
//!
//! A [`Window`] keeps the N most recent [`Metric`]s reported by one peer for
//! one metric name and answers "what is the latest value?" and "what is the
//! recent history?" from any number of threads. A [`Store`] owns one window
//! per (metric name, peer).

pub mod bench;
pub mod config;
pub mod error;
pub mod load;
pub mod metric;
pub mod store;
pub mod window;

pub use config::{BenchConfig, Config, WindowConfig};
pub use error::{ConfigError, Result, WindowError};
pub use metric::{Metric, PeerId};
pub use store::Store;
pub use window::{Window, DEFAULT_WINDOW_CAP};
