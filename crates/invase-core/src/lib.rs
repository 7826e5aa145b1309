//! invase-core: instance-wise variable selection with neural networks.
//!
//! This crate implements the INVASE actor/critic/baseline training scheme:
//! a selector network proposes per-feature selection probabilities, a
//! predictor network classifies from the sampled feature subset, and a
//! baseline network classifies from all features to serve as a reward
//! reference for the selector's policy-gradient update.
//!
//! The design favors small, testable modules: networks, sampler, loss,
//! orchestrator, data handling and evaluation metrics each live in their
//! own module with explicit inputs instead of hidden captured state.
pub mod config;
pub mod data;
pub mod error;
pub mod loss;
pub mod metrics;
pub mod models;
pub mod sampler;
pub mod trainer;
pub mod utils;
