use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::window::DEFAULT_WINDOW_CAP;

// ─── Configuration ───────────────────────────────────────────────

/// Root structure parsed from `window.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub bench: BenchConfig,
}

/// Settings for windows created by a [`Store`](crate::store::Store).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Slots per window; zero or negative means the default
    pub window_cap: i64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_cap: DEFAULT_WINDOW_CAP as i64,
        }
    }
}

impl WindowConfig {
    pub fn new(window_cap: i64) -> Self {
        Self { window_cap }
    }

    /// The configured capacity with non-positive values coerced to
    /// [`DEFAULT_WINDOW_CAP`].
    pub fn capacity(&self) -> usize {
        usize::try_from(self.window_cap)
            .ok()
            .filter(|&cap| cap > 0)
            .unwrap_or(DEFAULT_WINDOW_CAP)
    }
}

/// Parameters for the `window-bench` load harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// One harness run per entry
    pub window_sizes: Vec<i64>,
    /// How long each run lasts (milliseconds)
    pub duration_ms: u64,
    /// Number of concurrent reader tasks
    pub readers: u32,
    /// Base delay between producer adds (microseconds)
    pub add_interval_us: u64,
    /// TTL stamped on every produced metric (seconds)
    pub ttl_secs: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            window_sizes: vec![10, 25, 1000],
            duration_ms: 500,
            readers: 4,
            add_interval_us: 100,
            ttl_secs: 5,
        }
    }
}

/// Load configuration from a TOML file. A missing file yields
/// `Config::default()`.
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(Config::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    from_toml_str(&raw)
}

pub fn from_toml_str(raw: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_capacity_falls_back() {
        assert_eq!(WindowConfig::new(0).capacity(), DEFAULT_WINDOW_CAP);
        assert_eq!(WindowConfig::new(-3).capacity(), DEFAULT_WINDOW_CAP);
        assert_eq!(WindowConfig::new(7).capacity(), 7);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = from_toml_str("[window]\nwindow_cap = 4\n").unwrap();
        assert_eq!(cfg.window.capacity(), 4);
        assert_eq!(cfg.bench.window_sizes, vec![10, 25, 1000]);
        assert_eq!(cfg.bench.readers, 4);
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = from_toml_str("").unwrap();
        assert_eq!(cfg.window.capacity(), DEFAULT_WINDOW_CAP);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = from_toml_str("[window]\nwindow_cap = \"ten\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load("/nonexistent/peer-metric-window/window.toml").unwrap();
        assert_eq!(cfg.bench.duration_ms, 500);
    }
}
