use serde::{Deserialize, Serialize};

/// Central configuration for the INVASE model and its training loop.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct InvaseConfig {
    /// Sparsity hyper-parameter: how strongly small selected-feature
    /// counts are rewarded.
    pub lambda: f64,
    /// Number of label classes (K).
    pub num_classes: usize,
    /// Hidden width of the selector network.
    pub selector_hidden: usize,
    /// Hidden width of the predictor and baseline networks.
    pub predictor_hidden: usize,
    /// Batch size drawn (with replacement) each iteration.
    pub batch_size: usize,
    /// Total number of training iterations. A large count is needed
    /// because of the policy-gradient framework.
    pub iterations: usize,
    /// Learning rate shared by all three optimizers.
    pub learning_rate: f64,
    /// L2 weight decay applied by the optimizers.
    pub weight_decay: f64,
    /// Report progress every this many iterations.
    pub log_every: usize,
    /// Seed for the shared random stream (batch and mask sampling).
    /// `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for InvaseConfig {
    fn default() -> Self {
        InvaseConfig {
            lambda: 0.1,
            num_classes: 4,
            selector_hidden: 100,
            predictor_hidden: 200,
            batch_size: 100,
            iterations: 20000,
            learning_rate: 1e-4,
            weight_decay: 1e-3,
            log_every: 100,
            seed: None,
        }
    }
}

impl InvaseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
