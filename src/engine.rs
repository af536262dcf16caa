//! DuckDB connection setup and k-NN query execution.

use crate::config::BenchConfig;
use crate::BenchResult;
use duckdb::Connection;
use std::fmt::Write as _;

pub struct Engine {
    conn: Connection,
}

impl Engine {
    /// Open the pre-built database and apply the run's session settings:
    /// optional vss extension, optional thread override, and detailed JSON
    /// profiling directed at the sidecar file.
    pub fn open(cfg: &BenchConfig) -> BenchResult<Self> {
        let conn = Connection::open(&cfg.database)?;

        if cfg.enable_vss {
            conn.execute_batch("INSTALL vss; LOAD vss;")?;
        }
        if cfg.threads != 0 {
            conn.execute_batch(&format!("PRAGMA threads={};", cfg.threads))?;
        }
        // The profiling sidecar is the only way to capture the top-level
        // profiler metrics through the query interface.
        conn.execute_batch(&format!(
            "PRAGMA explain_output=optimized_only;\n\
             SET enable_profiling=json;\n\
             SET profiling_mode=detailed;\n\
             SET profiling_output='{}';",
            cfg.profile_output.display()
        ))?;

        Ok(Self { conn })
    }

    /// Run one top-k nearest-neighbour query and materialize every result
    /// row. Returns the number of rows fetched.
    pub fn knn_query(&self, cfg: &BenchConfig, vector: &[f32]) -> BenchResult<usize> {
        let sql = knn_sql(&cfg.table, &cfg.vector_column, vector, cfg.k);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut fetched = 0;
        while rows.next()?.is_some() {
            fetched += 1;
        }
        Ok(fetched)
    }
}

/// Build the query: all columns, ordered by distance between the stored
/// vector column and the query vector embedded as a typed fixed-length
/// array literal, limited to top-k.
pub fn knn_sql(table: &str, column: &str, vector: &[f32], k: usize) -> String {
    let mut literal = String::with_capacity(vector.len() * 8 + 2);
    literal.push('[');
    for (i, v) in vector.iter().enumerate() {
        if i > 0 {
            literal.push_str(", ");
        }
        let _ = write!(literal, "{}", v);
    }
    literal.push(']');

    format!(
        "SELECT * FROM {} ORDER BY array_distance({}, {}::FLOAT[{}]) LIMIT {};",
        table,
        column,
        literal,
        vector.len(),
        k
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_knn_sql_embeds_typed_array_literal() {
        let sql = knn_sql("mxbai", "vec", &[0.5, -1.25, 3.0], 10);
        assert_eq!(
            sql,
            "SELECT * FROM mxbai ORDER BY array_distance(vec, [0.5, -1.25, 3]::FLOAT[3]) LIMIT 10;"
        );
    }

    #[test]
    fn test_knn_query_materializes_top_k_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("bench.db");

        // Seed a table with four 4-dim vectors.
        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE pts (id INTEGER, vec FLOAT[4]);
                 INSERT INTO pts VALUES
                     (0, [0.0, 0.0, 0.0, 0.0]),
                     (1, [1.0, 0.0, 0.0, 0.0]),
                     (2, [0.0, 2.0, 0.0, 0.0]),
                     (3, [3.0, 3.0, 3.0, 3.0]);",
            )
            .unwrap();
        }

        let cfg = BenchConfig {
            database: db_path,
            table: "pts".into(),
            vector_column: "vec".into(),
            dim: 4,
            threads: 0,
            enable_vss: false,
            k: 2,
            profile_output: dir.path().join("profile_output"),
            ..BenchConfig::default()
        };

        let engine = Engine::open(&cfg).unwrap();
        let fetched = engine
            .knn_query(&cfg, &[0.1, 0.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(fetched, 2);
    }

    #[test]
    fn test_open_fails_on_unreadable_database_path() {
        let cfg = BenchConfig {
            database: PathBuf::from("/nonexistent/dir/bench.db"),
            enable_vss: false,
            ..BenchConfig::default()
        };
        assert!(Engine::open(&cfg).is_err());
    }
}
