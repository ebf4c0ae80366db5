//! Result types returned by the model services.

mod forecast_result;
mod prediction;

pub use forecast_result::{ForecastResult, FORECAST_TIMESTAMP_FORMAT};
pub use prediction::Prediction;
