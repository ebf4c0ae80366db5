//! Contract module containing trait definitions for model operations

mod predictor;
mod regressor;

pub use predictor::Predictor;
pub use regressor::Regressor;
