pub mod collector;
pub mod latency;

pub use collector::{BenchCollector, BenchSnapshot};
pub use latency::OpLatency;

use serde::Serialize;

/// Which window operation a sample timed, with what it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Add,
    /// `hit` is false when the window answered `NoMetrics`
    Latest { hit: bool },
    /// Length of the returned snapshot
    All { returned: usize },
}

/// A single timing observation recorded by a harness task.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub op: OpKind,
    /// Nanoseconds spent inside the window call, lock wait included
    pub nanos: u64,
}

impl Sample {
    pub fn new(op: OpKind, nanos: u64) -> Self {
        Self { op, nanos }
    }
}
