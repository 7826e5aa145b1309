use anyhow::Result;
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{Linear, VarBuilder, VarMap};
use std::path::Path;

use crate::models::nn::selu;

/// Selector (actor) network: maps instance features to per-feature
/// selection probabilities in [0, 1].
///
/// One hidden dense layer with SELU activation feeding a sigmoid output
/// layer of width `num_features`. L2 regularization of the weights is
/// carried by the optimizer's weight decay.
pub struct SelectorNetwork {
    varmap: VarMap,
    dense1: Linear,
    dense2: Linear,
    num_features: usize,
}

impl SelectorNetwork {
    pub fn new(num_features: usize, hidden: usize, device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let dense1 = candle_nn::linear(num_features, hidden, vb.pp("selector.dense1"))?;
        let dense2 = candle_nn::linear(hidden, num_features, vb.pp("selector.dense2"))?;
        Ok(Self {
            varmap,
            dense1,
            dense2,
            num_features,
        })
    }

    /// Forward pass: `(B, d)` features to `(B, d)` selection probabilities.
    pub fn forward(&self, features: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.dense1.forward(features)?;
        let x = selu(&x)?;
        candle_nn::ops::sigmoid(&self.dense2.forward(&x)?)
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn var_map(&mut self) -> &mut VarMap {
        &mut self.varmap
    }

    /// Save the network weights in safetensors format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        log::info!("Saving selector weights to: {:?}", path.as_ref());
        self.varmap.save(path.as_ref())?;
        Ok(())
    }

    /// Load weights from a safetensors checkpoint into this network.
    /// Shapes must match the current feature dimension.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        log::info!("Loading selector weights from: {:?}", path.as_ref());
        self.varmap.load(path.as_ref())?;
        Ok(())
    }
}
