use anyhow::{Context, Result};

use invase_core::data::Dataset;
use invase_core::metrics::{
    argmax_rows, selection_rate, selection_rate_per_feature, threshold_mask, ConfusionMatrix,
};
use invase_core::trainer::{InvaseModel, TrainingMetrics};
use invase_core::utils::get_device;

use super::input::TrainConfig;

const SELECTION_THRESHOLD: f32 = 0.5;

/// Full pipeline: load data, train (optionally warm-started), save the
/// model artifacts and print test-set evaluation to stdout.
pub fn run_training(config: &TrainConfig) -> Result<()> {
    let dataset = Dataset::from_csv(&config.data, config.model.num_classes)
        .with_context(|| format!("Failed to load data from {}", config.data))?;
    dataset.log_summary();

    let device = get_device(&config.device)?;
    let mut model = InvaseModel::new(config.model.clone(), dataset.num_features, device)?;

    if let Some(ref checkpoint_dir) = config.checkpoint_dir {
        log::info!("Warm-starting from checkpoint: {}", checkpoint_dir);
        model
            .load_checkpoint(checkpoint_dir)
            .with_context(|| format!("Failed to load checkpoint from {}", checkpoint_dir))?;
    }

    let start_time = std::time::Instant::now();
    let metrics = model
        .train(&dataset.x_train, &dataset.y_train)
        .context("Training failed")?;
    log::info!("Training completed in {:?}", start_time.elapsed());
    log::info!(
        "Final losses (mean of last 100 steps): selector {:.4}, predictor {:.4}, baseline {:.4}",
        TrainingMetrics::mean_of_last(&metrics.selector_losses, 100),
        TrainingMetrics::mean_of_last(&metrics.predictor_losses, 100),
        TrainingMetrics::mean_of_last(&metrics.baseline_losses, 100),
    );

    model.save_checkpoint(&config.output_dir)?;
    log::info!("Model saved to: {}", config.output_dir);

    evaluate(&mut model, &dataset)
}

/// Test-set evaluation: selection rate, confusion matrices, weighted F1
/// and accuracy for the baseline and predictor.
fn evaluate(model: &mut InvaseModel, dataset: &Dataset) -> Result<()> {
    let sel_prob = model.selection_probabilities(&dataset.x_test)?;
    let score = threshold_mask(&sel_prob, SELECTION_THRESHOLD);

    let rate = selection_rate(&sel_prob, SELECTION_THRESHOLD);
    println!("Selection rate: {:.4}", rate);
    println!(
        "Selected features per instance: {:.4}",
        rate * dataset.num_features as f32
    );
    for (j, feature_rate) in selection_rate_per_feature(&sel_prob, SELECTION_THRESHOLD)
        .iter()
        .enumerate()
    {
        log::debug!("Feature {} selection rate: {:.4}", j, feature_rate);
    }

    let (val_prob, dis_prob) = model.predict(&dataset.x_test, &score)?;
    let val_label = argmax_rows(&val_prob);
    let dis_label = argmax_rows(&dis_prob);
    let true_label = argmax_rows(&dataset.y_test);

    let val_matrix = ConfusionMatrix::from_labels(&val_label, &true_label, dataset.num_classes);
    let dis_matrix = ConfusionMatrix::from_labels(&dis_label, &true_label, dataset.num_classes);

    println!("\nBaseline Prediction");
    print!("{}", val_matrix);
    println!("Weighted F1 Score: {:.4}", val_matrix.weighted_f1());
    println!("Accuracy: {:.4}", val_matrix.accuracy());

    println!("\nPredictor Prediction");
    print!("{}", dis_matrix);
    println!("Weighted F1 Score: {:.4}", dis_matrix.weighted_f1());
    println!("Accuracy: {:.4}", dis_matrix.accuracy());

    Ok(())
}
