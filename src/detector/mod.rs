pub mod artifacts;
pub mod classifier;
pub mod normalizer;
pub mod pipeline;
pub mod vectorizer;

pub use artifacts::ModelArtifacts;
pub use pipeline::{PredictError, PredictionResult};
