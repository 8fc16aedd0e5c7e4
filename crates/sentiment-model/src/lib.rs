//! Fitting, persisting and querying the review sentiment classifier.

pub mod artifacts;
pub mod classifier;
mod model;
pub mod training;

pub use artifacts::{ArtifactError, ArtifactStore};
pub use classifier::{ClassifierError, Prediction, SentimentClassifier};
pub use model::{PredictError, SentimentModel};
pub use training::{TrainError, TrainingConfig, TrainingReport};
