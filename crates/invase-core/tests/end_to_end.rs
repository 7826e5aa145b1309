//! End-to-end relevance-discovery check on a synthetic dataset.
//!
//! The label depends only on the first four features, so a trained
//! selector should keep them at a visibly higher rate than the noise
//! columns. Run with `cargo test -- --ignored` (takes a few minutes on
//! CPU).

use candle_core::Device;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use invase_core::config::InvaseConfig;
use invase_core::data::Dataset;
use invase_core::metrics::selection_rate_per_feature;
use invase_core::trainer::InvaseModel;

const NUM_FEATURES: usize = 10;
const NUM_RELEVANT: usize = 4;

/// Label = argmax over the first `NUM_RELEVANT` features; the remaining
/// columns are independent noise.
fn synthetic_rows(n: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mut row: Vec<f32> = (0..NUM_FEATURES).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let label = row[..NUM_RELEVANT]
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap();
            row.push(label as f32);
            row
        })
        .collect()
}

#[test]
#[ignore]
fn selector_separates_relevant_from_noise_features() {
    let dataset = Dataset::from_rows(synthetic_rows(1000, 42), NUM_RELEVANT).unwrap();
    let config = InvaseConfig {
        num_classes: NUM_RELEVANT,
        iterations: 2000,
        learning_rate: 1e-3,
        seed: Some(42),
        ..Default::default()
    };

    let mut model = InvaseModel::new(config, NUM_FEATURES, Device::Cpu).unwrap();
    model.train(&dataset.x_train, &dataset.y_train).unwrap();

    let probs = model.selection_probabilities(&dataset.x_test).unwrap();
    let rates = selection_rate_per_feature(&probs, 0.5);

    let relevant_mean: f32 =
        rates[..NUM_RELEVANT].iter().sum::<f32>() / NUM_RELEVANT as f32;
    let noise_mean: f32 = rates[NUM_RELEVANT..].iter().sum::<f32>()
        / (NUM_FEATURES - NUM_RELEVANT) as f32;

    assert!(
        relevant_mean > noise_mean,
        "relevant features selected at {:.3}, noise at {:.3}",
        relevant_mean,
        noise_mean
    );
}

#[test]
fn synthetic_generator_labels_match_argmax() {
    let rows = synthetic_rows(50, 7);
    for row in &rows {
        let label = row[NUM_FEATURES] as usize;
        let max = row[..NUM_RELEVANT]
            .iter()
            .cloned()
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(row[label], max);
    }
}

#[test]
fn label_noise_split_keeps_feature_count() {
    let dataset = Dataset::from_rows(synthetic_rows(100, 3), NUM_RELEVANT).unwrap();
    let probs = Array2::from_elem((dataset.test_len(), NUM_FEATURES), 0.9);
    assert_eq!(selection_rate_per_feature(&probs, 0.5).len(), NUM_FEATURES);
}
