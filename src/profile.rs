//! DuckDB profiling sidecar model.
//!
//! The engine rewrites one JSON document per executed query. The document
//! carries top-level `latency` and `cpu_time` plus a tree of operator nodes;
//! the harness must consume it before the next query overwrites it.

use crate::{BenchError, BenchResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Accepted leaf operators. DuckDB pads operator names to a trailing space.
pub const SEQ_SCAN: &str = "SEQ_SCAN ";
pub const HNSW_INDEX_SCAN: &str = "HNSW_INDEX_SCAN ";

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileReport {
    pub latency: f64,
    pub cpu_time: f64,
    #[serde(default)]
    pub children: Vec<OperatorNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatorNode {
    pub operator_name: String,
    pub operator_timing: f64,
    #[serde(default)]
    pub children: Vec<OperatorNode>,
}

impl ProfileReport {
    /// Read and parse the sidecar file written by the just-executed query.
    pub fn read(path: &Path) -> BenchResult<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Walk the first-child chain down to the deepest operator.
    ///
    /// Only the leftmost leaf is ever consulted: it is the physical scan the
    /// plan bottoms out in.
    pub fn leaf_operator(&self) -> Option<&OperatorNode> {
        let mut node = self.children.first()?;
        while let Some(child) = node.children.first() {
            node = child;
        }
        Some(node)
    }

    /// Scan-strategy gate. The run only measures what it claims to measure
    /// if the plan bottoms out in a full scan or an HNSW index scan; anything
    /// else aborts the run, naming the offending operator.
    pub fn checked_scan_operator(&self) -> BenchResult<&OperatorNode> {
        let leaf = self.leaf_operator().ok_or(BenchError::MissingOperator)?;
        if leaf.operator_name != SEQ_SCAN && leaf.operator_name != HNSW_INDEX_SCAN {
            return Err(BenchError::UnexpectedOperator(leaf.operator_name.clone()));
        }
        Ok(leaf)
    }
}
