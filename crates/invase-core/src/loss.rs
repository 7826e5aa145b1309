//! Loss functions: the selector's policy-gradient objective and the
//! supervised cross entropy shared by the predictor and baseline.
//!
//! All scalars the losses need (lambda, class count) are explicit
//! parameters rather than captured state, and every log argument carries
//! an additive epsilon.
use candle_core::{Error, Result, Tensor};

/// Additive epsilon on log arguments. Replicates the published tuning.
pub const LOG_EPSILON: f64 = 1e-8;

/// Categorical cross entropy over probability outputs (not logits):
/// `-mean_B sum_K y_true * log(probs + eps)`.
pub fn categorical_cross_entropy(probs: &Tensor, y_true: &Tensor) -> Result<Tensor> {
    let log_probs = (probs + LOG_EPSILON)?.log()?;
    (y_true * &log_probs)?.sum(1)?.mean_all()?.neg()
}

/// Concatenate `[mask, dis_prob, val_prob, y_true]` along the feature
/// axis into the selector's `(B, d + 3K)` training target.
///
/// The parts are auxiliary reward-computation data, not a semantically
/// meaningful label; they ride along the same (input, target) path the
/// supervised updates use. Each part is detached so that no gradient can
/// flow back through the sampling step or the other two networks.
pub fn assemble_composite_target(
    mask: &Tensor,
    dis_prob: &Tensor,
    val_prob: &Tensor,
    y_true: &Tensor,
) -> Result<Tensor> {
    Tensor::cat(
        &[
            mask.detach(),
            dis_prob.detach(),
            val_prob.detach(),
            y_true.detach(),
        ],
        1,
    )
}

/// REINFORCE-style policy-gradient loss for the selector.
///
/// Per instance, with `eps = 1e-8`:
/// - reward = `sum_K y * log(dis + eps) - sum_K y * log(val + eps)`,
///   positive when the selected subset beat the all-features baseline;
/// - mask log-likelihood = `sum_d m*log(p + eps) + (1-m)*log(1-p + eps)`
///   under a Bernoulli model with parameter `gen_prob`;
/// - sparsity penalty = `lambda * mean_d(p)`.
///
/// The scalar loss is `-mean_B(reward * log_lik - penalty)`, negated
/// because the optimizer minimizes. Only `gen_prob` is differentiated;
/// the composite parts are constants (detached again here so the
/// no-gradient contract holds regardless of how the target was built).
pub fn selector_policy_loss(
    gen_prob: &Tensor,
    composite: &Tensor,
    lambda: f64,
    num_classes: usize,
) -> Result<Tensor> {
    let (_, d) = gen_prob.dims2()?;
    let k = num_classes;
    let (_, width) = composite.dims2()?;
    if width != d + 3 * k {
        return Err(Error::Msg(format!(
            "composite target has width {}, expected {} (d + 3K)",
            width,
            d + 3 * k
        )));
    }

    let mask = composite.narrow(1, 0, d)?.detach();
    let dis_prob = composite.narrow(1, d, k)?.detach();
    let val_prob = composite.narrow(1, d + k, k)?.detach();
    let y_true = composite.narrow(1, d + 2 * k, k)?.detach();

    let reward1 = (&y_true * &(&dis_prob + LOG_EPSILON)?.log()?)?.sum(1)?;
    let reward2 = (&y_true * &(&val_prob + LOG_EPSILON)?.log()?)?.sum(1)?;
    let reward = (reward1 - reward2)?;

    let log_on = (gen_prob + LOG_EPSILON)?.log()?;
    let log_off = gen_prob.affine(-1.0, 1.0 + LOG_EPSILON)?.log()?;
    let not_mask = mask.affine(-1.0, 1.0)?;
    let log_lik = ((&mask * &log_on)? + (&not_mask * &log_off)?)?.sum(1)?;

    let sparsity = (gen_prob.mean(1)? * lambda)?;
    let objective = ((reward * log_lik)? - sparsity)?;
    objective.mean_all()?.neg()
}
