//! DuckDB VSS query-latency benchmark.
//!
//! Usage:
//!   vss-bench --dataset agnews-mxbai-1024-euclidean.hdf5      # defaults
//!   vss-bench --dataset q.hdf5 --table glove --dim 100 -k 100
//!   vss-bench --dataset q.hdf5 --no-vss --threads 8           # forced seq scan

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vss_bench::config::BenchConfig;
use vss_bench::{runner, BenchResult};

#[derive(Parser, Debug)]
#[command(name = "vss-bench")]
#[command(about = "Query-latency benchmark for DuckDB's vector-similarity-search extension")]
#[command(version)]
struct Cli {
    /// Pre-built database file with the table and index already in place.
    #[arg(long, default_value = "test.db")]
    database: PathBuf,

    /// ann-benchmarks HDF5 dataset holding the query vectors.
    #[arg(long)]
    dataset: PathBuf,

    /// Table to query.
    #[arg(long, default_value = "mxbai")]
    table: String,

    /// Vector column within the table.
    #[arg(long, default_value = "vec")]
    vector_column: String,

    /// Vector dimensionality.
    #[arg(long, default_value = "1024")]
    dim: usize,

    /// Engine worker threads (0 = engine decides).
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Skip installing/loading the vss extension.
    #[arg(long)]
    no_vss: bool,

    /// Top-k result count per query.
    #[arg(short, long, default_value = "10")]
    k: usize,

    /// Number of progress lines across the query set.
    #[arg(long, default_value = "10")]
    progress_updates: usize,

    /// Profiling sidecar file the engine rewrites after each query.
    #[arg(long, default_value = "temp_profile_output")]
    profile_output: PathBuf,

    /// Also export the full run report as JSON.
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

fn main() -> BenchResult<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = BenchConfig {
        database: cli.database,
        dataset: cli.dataset,
        table: cli.table,
        vector_column: cli.vector_column,
        dim: cli.dim,
        threads: cli.threads,
        enable_vss: !cli.no_vss,
        k: cli.k,
        progress_updates: cli.progress_updates,
        profile_output: cli.profile_output,
        export_json: cli.export_json,
    };

    println!(
        "\n{}",
        "╔══════════════════════════════════════════════════════╗"
            .bold()
            .blue()
    );
    println!(
        "{}",
        "║        DuckDB VSS Latency Benchmark                 ║"
            .bold()
            .blue()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════╝"
            .bold()
            .blue()
    );
    println!(
        "  Table: {}  Dim: {}  TopK: {}  Threads: {}  VSS: {}",
        cfg.table, cfg.dim, cfg.k, cfg.threads, cfg.enable_vss
    );

    let report = runner::run(&cfg)?;

    report.print();
    report.write_csv(&cfg.csv_path())?;
    if let Some(ref path) = cfg.export_json {
        report.export_json(path)?;
    }

    Ok(())
}
