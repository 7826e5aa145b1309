//! Integration tests for confusion matrix and selection-rate metrics.

use ndarray::Array2;

use invase_core::metrics::{
    argmax_rows, selection_rate, selection_rate_per_feature, threshold_mask, ConfusionMatrix,
};

// ---------------------------------------------------------------------------
// Confusion matrix
// ---------------------------------------------------------------------------

#[test]
fn diagonal_over_total_equals_accuracy_exactly() {
    let predicted = vec![0, 1, 2, 3, 0, 1, 2, 2, 3, 0];
    let actual = vec![0, 1, 2, 3, 1, 1, 0, 2, 3, 0];
    let matrix = ConfusionMatrix::from_labels(&predicted, &actual, 4);

    let diagonal: usize = (0..4).map(|i| matrix.count(i, i)).sum();
    assert_eq!(matrix.total(), predicted.len());
    assert_eq!(matrix.accuracy(), diagonal as f32 / predicted.len() as f32);
}

#[test]
fn increment_indexes_predicted_then_actual() {
    let mut matrix = ConfusionMatrix::new(3);
    matrix.increment(2, 0);
    matrix.increment(2, 0);
    matrix.increment(0, 1);
    assert_eq!(matrix.count(2, 0), 2);
    assert_eq!(matrix.count(0, 1), 1);
    assert_eq!(matrix.count(0, 2), 0);
    assert_eq!(matrix.total(), 3);
}

#[test]
fn perfect_prediction_scores_one() {
    let labels = vec![0, 1, 2, 3, 2, 1];
    let matrix = ConfusionMatrix::from_labels(&labels, &labels, 4);
    assert_eq!(matrix.accuracy(), 1.0);
    assert!((matrix.weighted_f1() - 1.0).abs() < 1e-6);
}

#[test]
fn weighted_f1_matches_hand_computed_value() {
    // predicted: [0, 0, 1, 1], actual: [0, 1, 1, 1]
    // class 0: precision 1/2, recall 1/1, f1 = 2/3, support 1
    // class 1: precision 2/2, recall 2/3, f1 = 4/5, support 3
    // weighted = (1 * 2/3 + 3 * 4/5) / 4 = 0.76667
    let predicted = vec![0, 0, 1, 1];
    let actual = vec![0, 1, 1, 1];
    let matrix = ConfusionMatrix::from_labels(&predicted, &actual, 2);
    assert!((matrix.weighted_f1() - 0.766667).abs() < 1e-4);
}

#[test]
fn empty_matrix_is_well_defined() {
    let matrix = ConfusionMatrix::new(4);
    assert_eq!(matrix.total(), 0);
    assert_eq!(matrix.accuracy(), 0.0);
    assert_eq!(matrix.weighted_f1(), 0.0);
}

#[test]
fn display_prints_one_row_per_predicted_class() {
    let matrix = ConfusionMatrix::from_labels(&[0, 1], &[0, 0], 2);
    let rendered = format!("{}", matrix);
    assert_eq!(rendered, "1 0\n1 0\n");
}

#[test]
#[should_panic(expected = "equal length")]
fn mismatched_label_arrays_panic() {
    let _ = ConfusionMatrix::from_labels(&[0, 1, 2], &[0, 1], 3);
}

// ---------------------------------------------------------------------------
// Selection rate
// ---------------------------------------------------------------------------

#[test]
fn selection_rate_is_bounded() {
    let probs = Array2::from_shape_fn((10, 6), |(i, j)| ((i * 6 + j) as f32) / 60.0);
    let rate = selection_rate(&probs, 0.5);
    assert!((0.0..=1.0).contains(&rate));
}

#[test]
fn selection_rate_counts_strictly_above_threshold() {
    let probs = Array2::from_shape_vec((1, 4), vec![0.2, 0.5, 0.7, 0.9]).unwrap();
    // 0.5 is not strictly above the threshold.
    assert!((selection_rate(&probs, 0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn per_feature_rates_match_columns() {
    let probs = Array2::from_shape_vec((2, 3), vec![0.9, 0.1, 0.6, 0.8, 0.2, 0.4]).unwrap();
    let rates = selection_rate_per_feature(&probs, 0.5);
    assert_eq!(rates, vec![1.0, 0.0, 0.5]);
}

#[test]
fn threshold_mask_is_binary() {
    let probs = Array2::from_shape_vec((2, 2), vec![0.49, 0.51, 0.0, 1.0]).unwrap();
    let mask = threshold_mask(&probs, 0.5);
    assert_eq!(mask, Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 0.0, 1.0]).unwrap());
}

#[test]
fn argmax_rows_picks_highest_probability() {
    let probs =
        Array2::from_shape_vec((3, 3), vec![0.7, 0.2, 0.1, 0.1, 0.1, 0.8, 0.3, 0.4, 0.3]).unwrap();
    assert_eq!(argmax_rows(&probs), vec![0, 2, 1]);
}
