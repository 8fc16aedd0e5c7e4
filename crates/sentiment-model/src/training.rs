use std::path::Path;

use review_data_clean::{CountVectorizer, DataError, RawDataset};
use serde::Serialize;
use smartcore::error::Failed;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::accuracy::Accuracy;
use smartcore::metrics::Metrics;
use smartcore::model_selection::train_test_split;
use smartcore::naive_bayes::multinomial::MultinomialNB;

use crate::artifacts::{ArtifactError, ArtifactStore};
use crate::classifier::{ClassifierError, SentimentClassifier};
use crate::model::SentimentModel;

#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("failed to fit classifier: {0}")]
    Fit(#[from] Failed),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("test size must be between 0 and 1, got {0}")]
    InvalidTestSize(f32),
    #[error("{rows} rows leave no test partition at test size {test_size}")]
    TooFewRows { rows: usize, test_size: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation.
    pub test_size: f32,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub vocabulary_size: usize,
    pub labels: Vec<String>,
    pub accuracy: f64,
}

#[derive(Debug)]
pub struct TrainedModel {
    pub model: SentimentModel,
    pub report: TrainingReport,
}

/// Normalizes the reviews, splits them with a seeded shuffle, fits the
/// vectorizer on the training rows only, fits the classifier and scores it on
/// the held-out rows. Nothing is written to disk.
pub fn fit(dataset: RawDataset, config: &TrainingConfig) -> Result<TrainedModel, TrainError> {
    if !(config.test_size > 0.0 && config.test_size < 1.0) {
        return Err(TrainError::InvalidTestSize(config.test_size));
    }
    let labels = dataset.labels();
    let (reviews, row_labels) = dataset.normalized().unzip();
    let rows = reviews.len();
    if ((rows as f32) * config.test_size) as usize == 0 {
        return Err(TrainError::TooFewRows {
            rows,
            test_size: config.test_size,
        });
    }

    let codes = row_labels
        .iter()
        .map(|label| {
            labels
                .binary_search(label)
                .map_err(|_| DataError::UnsupportedLabel(label.clone()))
        })
        .collect::<Result<Vec<usize>, _>>()?;

    // Split row indices so the vectorizer only ever sees training text.
    let index = DenseMatrix::from_2d_vec(&(0..rows).map(|row| vec![row]).collect::<Vec<_>>());
    let (train_index, test_index, y_train, y_test) =
        train_test_split(&index, &codes, config.test_size, true, Some(config.seed));
    let train_docs = select_rows(&train_index, &reviews);
    let test_docs = select_rows(&test_index, &reviews);

    let vectorizer = CountVectorizer::fit(&train_docs)?;
    let x_train = vectorizer.transform(&train_docs)?;
    let x_test = vectorizer.transform(&test_docs)?;
    tracing::debug!(
        train_rows = train_docs.len(),
        test_rows = test_docs.len(),
        vocabulary = vectorizer.n_features(),
        "vectorized dataset"
    );

    let model = MultinomialNB::fit(&x_train, &y_train, Default::default())?;
    let classifier = SentimentClassifier::new(labels.clone(), model)?;

    let y_result = classifier.predict_codes(&x_test)?;
    let accuracy = Accuracy::new().get_score(&y_test, &y_result);

    let report = TrainingReport {
        train_rows: train_docs.len(),
        test_rows: test_docs.len(),
        vocabulary_size: vectorizer.n_features(),
        labels,
        accuracy,
    };
    tracing::info!(
        train_rows = report.train_rows,
        test_rows = report.test_rows,
        vocabulary = report.vocabulary_size,
        accuracy = report.accuracy,
        "model fitted"
    );
    Ok(TrainedModel {
        model: SentimentModel::new(vectorizer, classifier),
        report,
    })
}

/// Loads `dataset`, fits a model and writes it to `store`. Artifacts are only
/// written once fitting has succeeded.
pub fn train_from_file<P: AsRef<Path>>(
    dataset: P,
    store: &ArtifactStore,
    config: &TrainingConfig,
) -> Result<TrainingReport, TrainError> {
    let dataset = RawDataset::from_file(dataset)?;
    let trained = fit(dataset, config)?;
    store.save(&trained.model)?;
    Ok(trained.report)
}

fn select_rows(index: &DenseMatrix<usize>, reviews: &[String]) -> Vec<String> {
    let (rows, _) = index.shape();
    (0..rows)
        .map(|row| reviews[*index.get((row, 0))].clone())
        .collect()
}

#[cfg(test)]
mod test {
    use review_data_clean::RawDataset;

    use super::{fit, TrainError, TrainingConfig};

    fn tiny() -> RawDataset {
        RawDataset::from_reader(
            "review,sentiment\ngreat,Positive\nawful,Negative\nfine,Neutral\n".as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_out_of_range_test_size() {
        for test_size in [0.0, 1.0, -0.5, 1.5] {
            let config = TrainingConfig {
                test_size,
                ..Default::default()
            };
            assert!(matches!(fit(tiny(), &config), Err(TrainError::InvalidTestSize(_))));
        }
    }

    #[test]
    fn test_rejects_dataset_without_test_rows() {
        assert!(matches!(
            fit(tiny(), &TrainingConfig::default()),
            Err(TrainError::TooFewRows { rows: 3, .. })
        ));
    }

    #[test]
    fn test_fit_fixture() {
        let dataset = RawDataset::from_file("../../dataset/reviews.csv").expect("creation failed");
        let rows = dataset.len();
        let trained = fit(dataset, &TrainingConfig::default()).expect("failed to fit");
        let report = trained.report;
        assert_eq!(report.train_rows + report.test_rows, rows);
        assert_eq!(report.test_rows, (rows as f32 * 0.2) as usize);
        assert_eq!(report.labels, vec!["Negative", "Neutral", "Positive"]);
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert_eq!(report.vocabulary_size, trained.model.vectorizer().n_features());
    }
}
