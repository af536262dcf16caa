//! HDF5 query-vector source.
//!
//! ann-benchmarks datasets store the query set as a 2-D float matrix under
//! the `test` key. Rows are consumed in file order, one per query.

use crate::{BenchError, BenchResult};
use std::path::Path;

/// Key of the query matrix inside the dataset file.
pub const QUERY_SET: &str = "test";

#[derive(Debug)]
pub struct QuerySet {
    data: Vec<f32>,
    dim: usize,
}

impl QuerySet {
    /// Open the dataset and load the full query matrix.
    ///
    /// The matrix width must match the configured dimensionality; a mismatch
    /// would otherwise surface as mistyped array literals deep inside the
    /// query loop.
    pub fn open(path: &Path, expected_dim: usize) -> BenchResult<Self> {
        let file = hdf5::File::open(path)?;
        let matrix = file.dataset(QUERY_SET)?.read_2d::<f32>()?;
        if matrix.ncols() != expected_dim {
            return Err(BenchError::Config(format!(
                "dataset {} has dimension {}, configured dimension is {}",
                path.display(),
                matrix.ncols(),
                expected_dim
            )));
        }
        Ok(Self {
            data: matrix.into_raw_vec(),
            dim: expected_dim,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Query vectors in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn write_fixture(path: &Path, rows: usize, dim: usize) {
        let file = hdf5::File::create(path).unwrap();
        let matrix = Array2::from_shape_fn((rows, dim), |(r, c)| (r * dim + c) as f32 * 0.5);
        let ds = file
            .new_dataset::<f32>()
            .shape((rows, dim))
            .create(QUERY_SET)
            .unwrap();
        ds.write(&matrix).unwrap();
    }

    #[test]
    fn test_reads_query_matrix_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.hdf5");
        write_fixture(&path, 3, 4);

        let queries = QuerySet::open(&path, 4).unwrap();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries.dim(), 4);

        let rows: Vec<&[f32]> = queries.iter().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], &[0.0, 0.5, 1.0, 1.5]);
        assert_eq!(rows[2], &[4.0, 4.5, 5.0, 5.5]);
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.hdf5");
        write_fixture(&path, 2, 4);

        let err = QuerySet::open(&path, 1024).unwrap_err();
        assert!(err.to_string().contains("dimension"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(QuerySet::open(Path::new("/nonexistent/queries.hdf5"), 4).is_err());
    }
}
