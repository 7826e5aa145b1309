pub mod baseline;
pub mod nn;
pub mod predictor;
pub mod selector;

pub use baseline::BaselineNetwork;
pub use predictor::PredictorNetwork;
pub use selector::SelectorNetwork;
