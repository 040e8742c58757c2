use std::path::PathBuf;

use thiserror::Error;

/// Failure returned by window reads.
///
/// `NoMetrics` is the normal "no data yet" answer for a window that has
/// never seen an `add`, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("no metrics have been added to the window")]
    NoMetrics,
}

pub type Result<T, E = WindowError> = std::result::Result<T, E>;

/// Errors raised while loading `window.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
