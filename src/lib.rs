//! Shared types, error handling and latency recording for vss-bench.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod profile;
pub mod report;
pub mod runner;

use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────────
// Error type
// ────────────────────────────────────────────────────────────────────────────────

pub type BenchResult<T> = std::result::Result<T, BenchError>;

/// Every failure aborts the run; a benchmark with any anomaly must not
/// produce aggregates.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("dataset error: {0}")]
    Dataset(#[from] hdf5::Error),

    #[error("profiling output error: {0}")]
    Profile(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("expected SEQ_SCAN or HNSW_INDEX_SCAN operator, got {0:?}")]
    UnexpectedOperator(String),

    #[error("profiling output contains no operator nodes")]
    MissingOperator,

    #[error("config error: {0}")]
    Config(String),
}

// ────────────────────────────────────────────────────────────────────────────────
// Per-query result record
// ────────────────────────────────────────────────────────────────────────────────

/// One timed query. The ordered sequence of these records is the run's
/// dataset; each is immutable once appended and written to the CSV verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub query_idx: usize,
    /// Wall-clock seconds around full result materialization.
    pub e2e_duration: f64,
    /// Timing reported by the leaf scan operator in the profiling tree.
    pub index_scan_duration: f64,
    /// Engine-reported query latency.
    pub latency: f64,
    /// Engine-reported CPU time.
    pub cpu_time: f64,
}

// ────────────────────────────────────────────────────────────────────────────────
// Latency recorder (HDR histogram)
// ────────────────────────────────────────────────────────────────────────────────

/// Nanosecond-precision histogram over the run's e2e durations.
pub struct LatencyRecorder {
    hist: Histogram<u64>,
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self {
            hist: Histogram::<u64>::new_with_bounds(1, 60_000_000_000, 3)
                .expect("histogram bounds are static"),
        }
    }

    pub fn record_secs(&mut self, secs: f64) {
        let nanos = (secs * 1e9) as u64;
        let _ = self.hist.record(nanos.max(1));
    }

    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    /// Percentile in milliseconds.
    pub fn percentile_ms(&self, p: f64) -> f64 {
        self.hist.value_at_percentile(p) as f64 / 1_000_000.0
    }

    pub fn max_ms(&self) -> f64 {
        self.hist.max() as f64 / 1_000_000.0
    }
}

impl Default for LatencyRecorder {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// System info
// ────────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpus: usize,
    pub timestamp: String,
}

impl SystemInfo {
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpus: std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
            timestamp: epoch_now(),
        }
    }
}

fn epoch_now() -> String {
    // simple timestamp without pulling in chrono
    let d = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}s-since-epoch", d.as_secs())
}
