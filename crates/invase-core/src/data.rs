//! Loading and splitting of delimited numeric datasets.
//!
//! The expected source is a comma-delimited file where every column but the
//! last is a feature and the last column is an integer class label in
//! `0..num_classes`. Labels are one-hot encoded on load.
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Array2, Axis};

use crate::error::InvaseError;

/// An immutable dataset partitioned into disjoint train and test subsets.
///
/// The split is a fixed proportional 90/10 prefix split by position: the
/// first 9n/10 rows train, the remainder test. Their index sets are
/// disjoint and together cover the full source.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x_train: Array2<f32>,
    pub y_train: Array2<f32>,
    pub x_test: Array2<f32>,
    pub y_test: Array2<f32>,
    pub num_features: usize,
    pub num_classes: usize,
}

impl Dataset {
    /// Read a CSV source and split it 90/10 by position.
    pub fn from_csv<P: AsRef<Path>>(path: P, num_classes: usize) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open data file: {:?}", path))?;

        let mut rows: Vec<Vec<f32>> = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read row {}", i))?;
            let row: Vec<f32> = record
                .iter()
                .map(|field| {
                    field
                        .trim()
                        .parse::<f32>()
                        .with_context(|| format!("Non-numeric value {:?} in row {}", field, i))
                })
                .collect::<Result<_>>()?;
            if let Some(first) = rows.first() {
                if row.len() != first.len() {
                    return Err(InvaseError::RaggedRow {
                        row: i,
                        expected: first.len(),
                        found: row.len(),
                    }
                    .into());
                }
            }
            rows.push(row);
        }

        Self::from_rows(rows, num_classes)
    }

    /// Build a dataset from raw rows where the last column is the label.
    pub fn from_rows(rows: Vec<Vec<f32>>, num_classes: usize) -> Result<Self> {
        if rows.is_empty() {
            return Err(InvaseError::EmptyDataset.into());
        }
        let num_columns = rows[0].len();
        if num_columns < 2 {
            return Err(InvaseError::EmptyDataset.into());
        }
        let num_features = num_columns - 1;
        let n = rows.len();

        let mut x = Array2::<f32>::zeros((n, num_features));
        let mut y = Array2::<f32>::zeros((n, num_classes));
        for (i, row) in rows.iter().enumerate() {
            for j in 0..num_features {
                x[[i, j]] = row[j];
            }
            let label = row[num_features];
            let class = label as usize;
            if label.fract() != 0.0 || label < 0.0 || class >= num_classes {
                return Err(InvaseError::InvalidLabel {
                    row: i,
                    label,
                    num_classes,
                }
                .into());
            }
            y[[i, class]] = 1.0;
        }

        let boundary = n * 9 / 10;
        let (x_train, x_test) = split_rows(&x, boundary);
        let (y_train, y_test) = split_rows(&y, boundary);

        Ok(Dataset {
            x_train,
            y_train,
            x_test,
            y_test,
            num_features,
            num_classes,
        })
    }

    pub fn train_len(&self) -> usize {
        self.x_train.nrows()
    }

    pub fn test_len(&self) -> usize {
        self.x_test.nrows()
    }

    pub fn log_summary(&self) {
        log::info!(
            "Dataset: {} train / {} test rows, {} features, {} classes",
            self.train_len(),
            self.test_len(),
            self.num_features,
            self.num_classes
        );
    }
}

fn split_rows(m: &Array2<f32>, boundary: usize) -> (Array2<f32>, Array2<f32>) {
    let head = m.slice_axis(Axis(0), ndarray::Slice::from(..boundary)).to_owned();
    let tail = m.slice_axis(Axis(0), ndarray::Slice::from(boundary..)).to_owned();
    (head, tail)
}

/// Gather a batch of rows by index into a new dense matrix.
pub fn gather_rows(m: &Array2<f32>, indices: &[usize]) -> Array2<f32> {
    let mut out = Array2::<f32>::zeros((indices.len(), m.ncols()));
    for (dst, &src) in indices.iter().enumerate() {
        out.row_mut(dst).assign(&m.row(src));
    }
    out
}
