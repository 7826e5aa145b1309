//! Evaluation metrics: confusion matrix, weighted F1, accuracy and
//! feature selection rates.
use std::fmt;

use ndarray::Array2;

/// K×K table of prediction counts, indexed as `[predicted][actual]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
    num_classes: usize,
}

impl ConfusionMatrix {
    pub fn new(num_classes: usize) -> Self {
        ConfusionMatrix {
            counts: vec![vec![0; num_classes]; num_classes],
            num_classes,
        }
    }

    /// Build a matrix from parallel predicted/actual label arrays.
    pub fn from_labels(predicted: &[usize], actual: &[usize], num_classes: usize) -> Self {
        assert_eq!(
            predicted.len(),
            actual.len(),
            "predicted and actual arrays must have equal length"
        );
        let mut matrix = ConfusionMatrix::new(num_classes);
        for (&p, &a) in predicted.iter().zip(actual) {
            matrix.increment(p, a);
        }
        matrix
    }

    /// Record one (predicted, actual) pair.
    pub fn increment(&mut self, predicted: usize, actual: usize) {
        self.counts[predicted][actual] += 1;
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn count(&self, predicted: usize, actual: usize) -> usize {
        self.counts[predicted][actual]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Diagonal sum over total.
    pub fn accuracy(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.num_classes).map(|i| self.counts[i][i]).sum();
        correct as f32 / total as f32
    }

    /// Per-class F1 averaged with weights proportional to class support
    /// (the number of actual instances of each class).
    pub fn weighted_f1(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let mut weighted = 0.0f32;
        for class in 0..self.num_classes {
            let tp = self.counts[class][class];
            let predicted: usize = self.counts[class].iter().sum();
            let support: usize = (0..self.num_classes).map(|p| self.counts[p][class]).sum();
            if support == 0 {
                continue;
            }
            let precision = if predicted > 0 {
                tp as f32 / predicted as f32
            } else {
                0.0
            };
            let recall = tp as f32 / support as f32;
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            weighted += f1 * support as f32 / total as f32;
        }
        weighted
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.counts {
            for (j, count) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fraction of entries whose selection probability exceeds `threshold`.
pub fn selection_rate(probs: &Array2<f32>, threshold: f32) -> f32 {
    if probs.is_empty() {
        return 0.0;
    }
    let selected = probs.iter().filter(|&&p| p > threshold).count();
    selected as f32 / probs.len() as f32
}

/// Per-feature selection rate across instances.
pub fn selection_rate_per_feature(probs: &Array2<f32>, threshold: f32) -> Vec<f32> {
    let n = probs.nrows();
    if n == 0 {
        return vec![0.0; probs.ncols()];
    }
    (0..probs.ncols())
        .map(|j| {
            let selected = probs.column(j).iter().filter(|&&p| p > threshold).count();
            selected as f32 / n as f32
        })
        .collect()
}

/// Threshold selection probabilities into a hard binary mask.
pub fn threshold_mask(probs: &Array2<f32>, threshold: f32) -> Array2<f32> {
    probs.mapv(|p| if p > threshold { 1.0 } else { 0.0 })
}

/// Row-wise argmax of a probability matrix.
pub fn argmax_rows(probs: &Array2<f32>) -> Vec<usize> {
    probs
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0)
        })
        .collect()
}
