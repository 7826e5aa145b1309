//! Training orchestrator for the three-network INVASE loop.
//!
//! Each iteration is strictly sequential: the selector's probabilities are
//! sampled into a mask, the predictor and baseline produce their
//! *pre-update* predictions for the reward, then each network takes one
//! optimizer step. The ordering is load-bearing — the policy gradient is
//! defined against the critic/baseline state before this iteration's
//! update — so none of steps 4..9 may be reordered or run concurrently.
use std::path::Path;

use anyhow::Result;
use candle_core::{Device, Tensor, D};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::InvaseConfig;
use crate::data::gather_rows;
use crate::error::InvaseError;
use crate::loss;
use crate::models::{BaselineNetwork, PredictorNetwork, SelectorNetwork};
use crate::sampler;
use crate::utils::{to_array2, to_tensor};

pub const SELECTOR_WEIGHTS: &str = "selector.safetensors";
pub const PREDICTOR_WEIGHTS: &str = "predictor.safetensors";
pub const BASELINE_WEIGHTS: &str = "baseline.safetensors";

/// Stores step-wise training metrics in a struct-of-arrays layout.
#[derive(Debug, Clone, Default)]
pub struct TrainingMetrics {
    pub steps: Vec<usize>,
    pub selector_losses: Vec<f32>,
    pub predictor_losses: Vec<f32>,
    pub baseline_losses: Vec<f32>,
    pub predictor_accuracies: Vec<f32>,
    pub baseline_accuracies: Vec<f32>,
}

impl TrainingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        step: usize,
        selector_loss: f32,
        predictor_loss: f32,
        baseline_loss: f32,
        predictor_accuracy: f32,
        baseline_accuracy: f32,
    ) {
        self.steps.push(step);
        self.selector_losses.push(selector_loss);
        self.predictor_losses.push(predictor_loss);
        self.baseline_losses.push(baseline_loss);
        self.predictor_accuracies.push(predictor_accuracy);
        self.baseline_accuracies.push(baseline_accuracy);
    }

    /// Average of the final `window` values of a metric series, for
    /// end-of-run summaries.
    pub fn mean_of_last(values: &[f32], window: usize) -> f32 {
        if values.is_empty() {
            return f32::NAN;
        }
        let tail = &values[values.len().saturating_sub(window)..];
        tail.iter().copied().sum::<f32>() / tail.len() as f32
    }
}

/// The INVASE model: selector, predictor and baseline networks plus the
/// shared random stream used for batch and mask sampling.
///
/// The three parameter sets are independent (each network owns its own
/// `VarMap` and gets its own optimizer) but the training objective
/// couples them through the composite target.
pub struct InvaseModel {
    selector: SelectorNetwork,
    predictor: PredictorNetwork,
    baseline: BaselineNetwork,
    config: InvaseConfig,
    device: Device,
    rng: StdRng,
    num_features: usize,
}

impl InvaseModel {
    pub fn new(config: InvaseConfig, num_features: usize, device: Device) -> Result<Self> {
        let selector = SelectorNetwork::new(num_features, config.selector_hidden, &device)?;
        let predictor = PredictorNetwork::new(
            num_features,
            config.predictor_hidden,
            config.num_classes,
            &device,
        )?;
        let baseline = BaselineNetwork::new(
            num_features,
            config.predictor_hidden,
            config.num_classes,
            &device,
        )?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            selector,
            predictor,
            baseline,
            config,
            device,
            rng,
            num_features,
        })
    }

    pub fn config(&self) -> &InvaseConfig {
        &self.config
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Load all three networks from safetensors artifacts in `dir`.
    ///
    /// The custom selector loss is a free function, so warm-starting
    /// needs no loss re-registration; shapes must match the current
    /// feature dimension or the load fails.
    pub fn load_checkpoint<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        self.selector.load(dir.join(SELECTOR_WEIGHTS))?;
        self.predictor.load(dir.join(PREDICTOR_WEIGHTS))?;
        self.baseline.load(dir.join(BASELINE_WEIGHTS))?;
        Ok(())
    }

    /// Save all three networks as safetensors artifacts in `dir`.
    pub fn save_checkpoint<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        self.selector.save(dir.join(SELECTOR_WEIGHTS))?;
        self.predictor.save(dir.join(PREDICTOR_WEIGHTS))?;
        self.baseline.save(dir.join(BASELINE_WEIGHTS))?;
        Ok(())
    }

    /// Run the full training loop for `config.iterations` steps.
    ///
    /// There is no convergence-based early stop; interrupting between
    /// iterations only costs the remaining updates. A non-finite
    /// selector loss aborts with [`InvaseError::DivergentLoss`].
    pub fn train(
        &mut self,
        x_train: &Array2<f32>,
        y_train: &Array2<f32>,
    ) -> Result<TrainingMetrics> {
        let n = x_train.nrows();
        if n == 0 {
            return Err(InvaseError::EmptyDataset.into());
        }
        if x_train.ncols() != self.num_features {
            return Err(InvaseError::DimensionMismatch {
                expected: self.num_features,
                found: x_train.ncols(),
            }
            .into());
        }

        log::info!(
            "Training INVASE for {} iterations (batch size {}, lambda {})",
            self.config.iterations,
            self.config.batch_size,
            self.config.lambda
        );

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            weight_decay: self.config.weight_decay,
            ..Default::default()
        };
        let mut selector_opt = AdamW::new(self.selector.var_map().all_vars(), params.clone())?;
        let mut predictor_opt = AdamW::new(self.predictor.var_map().all_vars(), params.clone())?;
        let mut baseline_opt = AdamW::new(self.baseline.var_map().all_vars(), params)?;

        let mut metrics = TrainingMetrics::new();

        for iteration in 0..self.config.iterations {
            // 1. Uniform random batch with replacement.
            let idx = sampler::sample_batch_indices(&mut self.rng, n, self.config.batch_size);
            let x = to_tensor(&gather_rows(x_train, &idx), &self.device)?;
            let y = to_tensor(&gather_rows(y_train, &idx), &self.device)?;

            // 2-3. Selection probabilities and the sampled feature mask.
            let gen_prob_host = to_array2(&self.selector.forward(&x)?)?;
            let mask_host = sampler::sample_mask(&mut self.rng, &gen_prob_host);
            let mask = to_tensor(&mask_host, &self.device)?;

            // 4. Pre-update predictor output (running statistics); this is
            // the reward input, not the training forward pass.
            self.predictor.set_evaluation_mode();
            let dis_prob = self.predictor.forward(&x, &mask)?.detach();

            // 5. One supervised step on the predictor.
            self.predictor.set_training_mode();
            let d_loss =
                loss::categorical_cross_entropy(&self.predictor.forward(&x, &mask)?, &y)?;
            predictor_opt.backward_step(&d_loss)?;

            // 6. Pre-update baseline output.
            self.baseline.set_evaluation_mode();
            let val_prob = self.baseline.forward(&x)?.detach();

            // 7. One supervised step on the baseline.
            self.baseline.set_training_mode();
            let v_loss = loss::categorical_cross_entropy(&self.baseline.forward(&x)?, &y)?;
            baseline_opt.backward_step(&v_loss)?;

            // 8-9. Composite target, then the selector's policy step.
            let composite = loss::assemble_composite_target(&mask, &dis_prob, &val_prob, &y)?;
            let gen_prob = self.selector.forward(&x)?;
            let g_loss = loss::selector_policy_loss(
                &gen_prob,
                &composite,
                self.config.lambda,
                self.config.num_classes,
            )?;
            selector_opt.backward_step(&g_loss)?;

            let g_loss_value = g_loss.to_scalar::<f32>()?;
            if !g_loss_value.is_finite() {
                log::error!(
                    "Selector loss is not finite at iteration {}; aborting",
                    iteration
                );
                return Err(InvaseError::DivergentLoss {
                    iteration,
                    loss: g_loss_value,
                }
                .into());
            }

            let d_loss_value = d_loss.to_scalar::<f32>()?;
            let v_loss_value = v_loss.to_scalar::<f32>()?;
            let d_acc = batch_accuracy(&dis_prob, &y)?;
            let v_acc = batch_accuracy(&val_prob, &y)?;
            metrics.record(iteration, g_loss_value, d_loss_value, v_loss_value, d_acc, v_acc);

            if iteration % self.config.log_every == 0 {
                log::info!(
                    "Iteration {}: d_loss {:.4} (acc {:.4}), v_loss {:.4} (acc {:.4}), g_loss {:.4}",
                    iteration,
                    d_loss_value,
                    d_acc,
                    v_loss_value,
                    v_acc,
                    g_loss_value
                );
            }
        }

        Ok(metrics)
    }

    /// Selection probabilities for a batch of instances, `(B, d)`.
    pub fn selection_probabilities(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        let xt = to_tensor(x, &self.device)?;
        Ok(to_array2(&self.selector.forward(&xt)?)?)
    }

    /// Class distributions from the baseline (all features) and the
    /// predictor (masked features), both in evaluation mode.
    pub fn predict(
        &mut self,
        x: &Array2<f32>,
        mask: &Array2<f32>,
    ) -> Result<(Array2<f32>, Array2<f32>)> {
        self.predictor.set_evaluation_mode();
        self.baseline.set_evaluation_mode();
        let xt = to_tensor(x, &self.device)?;
        let mt = to_tensor(mask, &self.device)?;
        let val_prob = to_array2(&self.baseline.forward(&xt)?)?;
        let dis_prob = to_array2(&self.predictor.forward(&xt, &mt)?)?;
        Ok((val_prob, dis_prob))
    }
}

/// Fraction of rows where the predicted class matches the one-hot truth.
fn batch_accuracy(probs: &Tensor, y_true: &Tensor) -> candle_core::Result<f32> {
    let predicted = probs.argmax(D::Minus1)?;
    let actual = y_true.argmax(D::Minus1)?;
    let correct = predicted.eq(&actual)?.to_dtype(candle_core::DType::F32)?;
    correct.mean_all()?.to_scalar::<f32>()
}
