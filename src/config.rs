//! Run configuration.
//!
//! All parameters are fixed at startup and passed into the runner as one
//! immutable value.

use crate::{BenchError, BenchResult};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Pre-built database file with the table (and index) already in place.
    pub database: PathBuf,
    /// HDF5 dataset holding the query vectors.
    pub dataset: PathBuf,
    /// Table to query.
    pub table: String,
    /// Vector column within the table.
    pub vector_column: String,
    /// Vector dimensionality.
    pub dim: usize,
    /// Engine worker threads. 0 = engine decides.
    pub threads: usize,
    /// Install and load the vss extension.
    pub enable_vss: bool,
    /// Top-k result count per query.
    pub k: usize,
    /// Number of progress lines across the query set.
    pub progress_updates: usize,
    /// Sidecar file the engine rewrites with profiling JSON after each query.
    pub profile_output: PathBuf,
    /// Optional JSON run-report path.
    pub export_json: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("test.db"),
            dataset: PathBuf::from("dataset.hdf5"),
            table: "mxbai".to_string(),
            vector_column: "vec".to_string(),
            dim: 1024,
            threads: 0,
            enable_vss: true,
            k: 10,
            progress_updates: 10,
            profile_output: PathBuf::from("temp_profile_output"),
            export_json: None,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> BenchResult<()> {
        if self.dim == 0 {
            return Err(BenchError::Config("dim must be non-zero".into()));
        }
        if self.k == 0 {
            return Err(BenchError::Config("k must be non-zero".into()));
        }
        if self.progress_updates == 0 {
            return Err(BenchError::Config(
                "progress_updates must be non-zero".into(),
            ));
        }
        if self.table.is_empty() || self.vector_column.is_empty() {
            return Err(BenchError::Config(
                "table and vector column names must be non-empty".into(),
            ));
        }
        Ok(())
    }

    /// Output file name encodes table, top-k, thread count and the vss flag.
    pub fn csv_path(&self) -> PathBuf {
        PathBuf::from(format!(
            "results_{}_k{}_t{}_vss{}.csv",
            self.table, self.k, self.threads, self.enable_vss
        ))
    }
}
