use anyhow::Result;
use candle_core::{DType, Device, Module, ModuleT, Tensor, D};
use candle_nn::{BatchNorm, BatchNormConfig, Linear, VarBuilder, VarMap};
use std::path::Path;

use crate::models::nn::selu;

/// Baseline (value) network: maps full, unmasked features to a class
/// distribution.
///
/// Same architecture as the predictor minus the mask gate. Its
/// prediction serves as a mask-independent reward reference that reduces
/// the variance of the selector's policy gradient; it is also reported as
/// a baseline accuracy metric.
pub struct BaselineNetwork {
    varmap: VarMap,
    dense1: Linear,
    norm: BatchNorm,
    dense2: Linear,
    num_classes: usize,
    is_training: bool,
}

impl BaselineNetwork {
    pub fn new(
        num_features: usize,
        hidden: usize,
        num_classes: usize,
        device: &Device,
    ) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let dense1 = candle_nn::linear(num_features, hidden, vb.pp("baseline.dense1"))?;
        let norm = candle_nn::batch_norm(hidden, BatchNormConfig::default(), vb.pp("baseline.norm"))?;
        let dense2 = candle_nn::linear(hidden, num_classes, vb.pp("baseline.dense2"))?;
        Ok(Self {
            varmap,
            dense1,
            norm,
            dense2,
            num_classes,
            is_training: true,
        })
    }

    /// Forward pass: `(B, d)` features to a `(B, K)` class distribution.
    pub fn forward(&self, features: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.dense1.forward(features)?;
        let x = selu(&x)?;
        let x = self.norm.forward_t(&x, self.is_training)?;
        let x = self.dense2.forward(&x)?;
        candle_nn::ops::softmax(&x, D::Minus1)
    }

    pub fn set_evaluation_mode(&mut self) {
        self.is_training = false;
    }

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
        log::info!("Saving baseline weights to: {:?}", path.as_ref());
        self.varmap.save(path.as_ref())?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        log::info!("Loading baseline weights from: {:?}", path.as_ref());
        self.varmap.load(path.as_ref())?;
        Ok(())
    }
}
