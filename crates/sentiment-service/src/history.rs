use std::sync::{PoisonError, RwLock};

use review_data_clean::Sentiment;
use sentiment_model::Prediction;
use serde::{Deserialize, Serialize};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One served prediction. Never changed after it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub review: String,
    pub label: String,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub timestamp: String,
}

impl PredictionRecord {
    pub fn new(review: String, prediction: Prediction) -> Self {
        Self {
            review,
            positive: round2(prediction.probability(Sentiment::Positive)),
            negative: round2(prediction.probability(Sentiment::Negative)),
            neutral: round2(prediction.probability(Sentiment::Neutral)),
            label: prediction.label,
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Append-only log of every prediction served since startup.
#[derive(Debug, Default)]
pub struct History {
    records: RwLock<Vec<PredictionRecord>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: PredictionRecord) {
        self.extend(std::iter::once(record));
    }

    /// Appends all records under one write lock, so a batch is never
    /// interleaved with other writers.
    pub fn extend<I: IntoIterator<Item = PredictionRecord>>(&self, records: I) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<PredictionRecord> {
        self.records.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
