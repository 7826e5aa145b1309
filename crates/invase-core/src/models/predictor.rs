use anyhow::Result;
use candle_core::{DType, Device, Module, ModuleT, Tensor, D};
use candle_nn::{BatchNorm, BatchNormConfig, Linear, VarBuilder, VarMap};
use std::path::Path;

use crate::models::nn::selu;

/// Predictor (critic) network: maps masked features to a class
/// distribution over the label set.
///
/// The element-wise product of features and mask forms the true input:
/// dense layer with SELU, batch normalization, then a softmax output
/// layer. Batch normalization is train/eval-mode sensitive — batch
/// statistics during training, running statistics at inference — which is
/// why the mode flag lives on the struct rather than on each call site.
pub struct PredictorNetwork {
    varmap: VarMap,
    dense1: Linear,
    norm: BatchNorm,
    dense2: Linear,
    num_classes: usize,
    is_training: bool,
}

impl PredictorNetwork {
    pub fn new(
        num_features: usize,
        hidden: usize,
        num_classes: usize,
        device: &Device,
    ) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let dense1 = candle_nn::linear(num_features, hidden, vb.pp("predictor.dense1"))?;
        let norm = candle_nn::batch_norm(hidden, BatchNormConfig::default(), vb.pp("predictor.norm"))?;
        let dense2 = candle_nn::linear(hidden, num_classes, vb.pp("predictor.dense2"))?;
        Ok(Self {
            varmap,
            dense1,
            norm,
            dense2,
            num_classes,
            is_training: true,
        })
    }

    /// Forward pass: `(B, d)` features and `(B, d)` binary mask to a
    /// `(B, K)` class distribution (rows sum to 1).
    pub fn forward(&self, features: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
        let x = (features * mask)?;
        let x = self.dense1.forward(&x)?;
        let x = selu(&x)?;
        let x = self.norm.forward_t(&x, self.is_training)?;
        let x = self.dense2.forward(&x)?;
        candle_nn::ops::softmax(&x, D::Minus1)
    }

    /// Set model to evaluation mode for inference
    /// This switches batch normalization to running statistics.
    pub fn set_evaluation_mode(&mut self) {
        self.is_training = false;
    }

    /// Set model to training mode for training
    /// This switches batch normalization to batch statistics.
    pub fn set_training_mode(&mut self) {
        self.is_training = true;
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn var_map(&mut self) -> &mut VarMap {
        &mut self.varmap
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        log::info!("Saving predictor weights to: {:?}", path.as_ref());
        self.varmap.save(path.as_ref())?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        log::info!("Loading predictor weights from: {:?}", path.as_ref());
        self.varmap.load(path.as_ref())?;
        Ok(())
    }
}
