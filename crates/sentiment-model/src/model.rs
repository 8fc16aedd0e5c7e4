use review_data_clean::{CountVectorizer, DataError};

use crate::classifier::{ClassifierError, Prediction, SentimentClassifier};

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Vectorize(#[from] DataError),
    #[error(transparent)]
    Classify(#[from] ClassifierError),
    #[error("classifier returned {actual} predictions for {expected} reviews")]
    Incomplete { expected: usize, actual: usize },
}

/// The vectorizer/classifier pair the service answers requests with.
#[derive(Debug)]
pub struct SentimentModel {
    vectorizer: CountVectorizer,
    classifier: SentimentClassifier,
}

impl SentimentModel {
    pub fn new(vectorizer: CountVectorizer, classifier: SentimentClassifier) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    pub fn predict_one(&self, review: &str) -> Result<Prediction, PredictError> {
        let mut predictions = self.predict_batch(&[review])?;
        predictions.pop().ok_or(PredictError::Incomplete {
            expected: 1,
            actual: 0,
        })
    }

    /// Vectorizes all reviews in one call; predictions come back in input order.
    pub fn predict_batch<S: AsRef<str>>(&self, reviews: &[S]) -> Result<Vec<Prediction>, PredictError> {
        let x = self.vectorizer.transform(reviews)?;
        let predictions = self.classifier.predict(&x)?;
        if predictions.len() != reviews.len() {
            return Err(PredictError::Incomplete {
                expected: reviews.len(),
                actual: predictions.len(),
            });
        }
        Ok(predictions)
    }
}
