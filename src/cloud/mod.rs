mod client;
mod translate;
mod types;

pub use client::{CloudPredictor, Predictor};
pub use translate::translate;
pub use types::{CloudAction, Coordinates, Prediction, PredictionRequest};
