//! Aggregation, console report, CSV and JSON export.

use crate::config::BenchConfig;
use crate::{BenchResult, LatencyRecorder, ResultRecord, SystemInfo};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde::Serialize;
use std::path::Path;

// ────────────────────────────────────────────────────────────────────────────────
// Aggregates
// ────────────────────────────────────────────────────────────────────────────────

/// Arithmetic means over the run plus the two derived percentages.
/// A percentage whose mean denominator is exactly zero is reported as 0,
/// never NaN.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregates {
    pub avg_e2e_duration: f64,
    pub avg_index_scan_duration: f64,
    pub avg_latency: f64,
    pub avg_cpu_time: f64,
    pub scan_pct_of_e2e: f64,
    pub scan_pct_of_latency: f64,
}

impl Aggregates {
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let n = records.len() as f64;
        let mean = |field: fn(&ResultRecord) -> f64| -> f64 {
            if records.is_empty() {
                0.0
            } else {
                records.iter().map(field).sum::<f64>() / n
            }
        };

        let avg_e2e_duration = mean(|r| r.e2e_duration);
        let avg_index_scan_duration = mean(|r| r.index_scan_duration);
        let avg_latency = mean(|r| r.latency);
        let avg_cpu_time = mean(|r| r.cpu_time);

        let scan_pct_of_e2e = if avg_e2e_duration != 0.0 {
            avg_index_scan_duration / avg_e2e_duration * 100.0
        } else {
            0.0
        };
        let scan_pct_of_latency = if avg_latency != 0.0 {
            avg_index_scan_duration / avg_latency * 100.0
        } else {
            0.0
        };

        Self {
            avg_e2e_duration,
            avg_index_scan_duration,
            avg_latency,
            avg_cpu_time,
            scan_pct_of_e2e,
            scan_pct_of_latency,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Run report
// ────────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub system: SystemInfo,
    pub table: String,
    pub k: usize,
    pub threads: usize,
    pub vss: bool,
    pub records: Vec<ResultRecord>,
    pub aggregates: Aggregates,
}

impl RunReport {
    pub fn new(cfg: &BenchConfig, records: Vec<ResultRecord>) -> Self {
        let aggregates = Aggregates::from_records(&records);
        Self {
            system: SystemInfo::collect(),
            table: cfg.table.clone(),
            k: cfg.k,
            threads: cfg.threads,
            vss: cfg.enable_vss,
            records,
            aggregates,
        }
    }

    /// Print the aggregate metric block plus an e2e percentile table.
    pub fn print(&self) {
        let a = &self.aggregates;

        println!("\n{}", "━━━ Aggregate metrics ━━━".bold().cyan());
        println!(
            "Average index_scan_duration: {:.6} seconds",
            a.avg_index_scan_duration
        );
        println!("Average cpu_time: {:.6} seconds", a.avg_cpu_time);
        println!("Average latency: {:.6} seconds", a.avg_latency);
        println!("Average e2e_duration: {:.6} seconds", a.avg_e2e_duration);
        println!(
            "Index scan as percentage of total duration: {:.2}%",
            a.scan_pct_of_e2e
        );
        println!(
            "Index scan as percentage of total latency: {:.2}%",
            a.scan_pct_of_latency
        );

        let mut rec = LatencyRecorder::new();
        for r in &self.records {
            rec.record_secs(r.e2e_duration);
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
        table.set_header(vec!["Queries", "p50 (ms)", "p95 (ms)", "p99 (ms)", "max (ms)"]);
        table.add_row(vec![
            format!("{}", rec.count()),
            format!("{:.3}", rec.percentile_ms(50.0)),
            format!("{:.3}", rec.percentile_ms(95.0)),
            format!("{:.3}", rec.percentile_ms(99.0)),
            format!("{:.3}", rec.max_ms()),
        ]);
        println!("{table}");
    }

    /// Write one CSV row per record. Serde's float output is
    /// shortest-round-trip, so every value survives a read-back exactly.
    pub fn write_csv(&self, path: &Path) -> BenchResult<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        println!("  CSV exported to {}", path.display());
        Ok(())
    }

    pub fn export_json(&self, path: &Path) -> BenchResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        println!("  JSON exported to {}", path.display());
        Ok(())
    }
}
