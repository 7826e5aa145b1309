use std::error::Error;
use std::fmt;

/// Custom error type for training and data-loading failures.
#[derive(Debug)]
pub enum InvaseError {
    /// The selector loss became non-finite. Training has no safeguard
    /// against divergence, so this aborts the run loudly instead of
    /// silently continuing.
    DivergentLoss { iteration: usize, loss: f32 },
    /// A data row had a different number of columns than the first row.
    RaggedRow { row: usize, expected: usize, found: usize },
    /// A class label was outside 0..num_classes.
    InvalidLabel { row: usize, label: f32, num_classes: usize },
    /// The data source contained no usable rows.
    EmptyDataset,
    /// Mismatch between an input matrix and the model's feature dimension.
    DimensionMismatch { expected: usize, found: usize },
}

impl fmt::Display for InvaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvaseError::DivergentLoss { iteration, loss } => write!(
                f,
                "selector loss diverged at iteration {} (loss = {})",
                iteration, loss
            ),
            InvaseError::RaggedRow { row, expected, found } => write!(
                f,
                "row {} has {} columns, expected {}",
                row, found, expected
            ),
            InvaseError::InvalidLabel { row, label, num_classes } => write!(
                f,
                "row {} has label {} outside 0..{}",
                row, label, num_classes
            ),
            InvaseError::EmptyDataset => write!(f, "data source contains no rows"),
            InvaseError::DimensionMismatch { expected, found } => write!(
                f,
                "input has {} features, model expects {}",
                found, expected
            ),
        }
    }
}

impl Error for InvaseError {}
