use review_data_clean::Sentiment;
use smartcore::error::Failed;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::naive_bayes::multinomial::MultinomialNB;

pub type NaiveBayes = MultinomialNB<usize, usize, DenseMatrix<usize>, Vec<usize>>;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier has no labels")]
    NoLabels,
    #[error("label {0:?} is not a supported sentiment")]
    UnsupportedLabel(String),
    #[error("class code {code} has no label ({labels} labels known)")]
    UnknownClass { code: usize, labels: usize },
    #[error("expected {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Model(#[from] Failed),
}

/// Output for one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Label as spelled in the training data.
    pub label: String,
    pub probabilities: Vec<(Sentiment, f64)>,
}

impl Prediction {
    /// Probability assigned to `sentiment`, 0 when the classifier never saw it.
    pub fn probability(&self, sentiment: Sentiment) -> f64 {
        self.probabilities
            .iter()
            .filter(|(s, _)| *s == sentiment)
            .map(|(_, p)| *p)
            .sum()
    }
}

/// A fitted multinomial naive Bayes model together with the label vocabulary
/// its integer class codes index into.
#[derive(Debug)]
pub struct SentimentClassifier {
    labels: Vec<String>,
    sentiments: Vec<Sentiment>,
    model: NaiveBayes,
}

impl SentimentClassifier {
    /// Maps every label onto a [`Sentiment`] once, so prediction never has to
    /// care how the training data spelled them.
    pub fn new(labels: Vec<String>, model: NaiveBayes) -> Result<Self, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::NoLabels);
        }
        let sentiments = labels
            .iter()
            .map(|label| {
                label
                    .parse::<Sentiment>()
                    .map_err(|_| ClassifierError::UnsupportedLabel(label.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(&code) = model.classes().iter().find(|&&code| code >= labels.len()) {
            return Err(ClassifierError::UnknownClass {
                code,
                labels: labels.len(),
            });
        }
        Ok(Self {
            labels,
            sentiments,
            model,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    pub(crate) fn model(&self) -> &NaiveBayes {
        &self.model
    }

    pub fn predict_codes(&self, x: &DenseMatrix<usize>) -> Result<Vec<usize>, ClassifierError> {
        self.check_features(x)?;
        Ok(self.model.predict(x)?)
    }

    /// Predicted label and class probabilities for every row of `x`, in row order.
    pub fn predict(&self, x: &DenseMatrix<usize>) -> Result<Vec<Prediction>, ClassifierError> {
        let codes = self.predict_codes(x)?;
        let classes = self.model.classes();
        let class_count = self.model.class_count();
        let feature_log_prob = self.model.feature_log_prob();
        let total = class_count.iter().sum::<usize>() as f64;
        let log_priors = class_count
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect::<Vec<_>>();
        let (_, n_features) = x.shape();

        codes
            .into_iter()
            .enumerate()
            .map(|(row, code)| {
                let joint = log_priors
                    .iter()
                    .zip(feature_log_prob.iter())
                    .map(|(log_prior, log_probs)| {
                        log_prior
                            + (0..n_features)
                                .map(|col| *x.get((row, col)) as f64 * log_probs[col])
                                .sum::<f64>()
                    })
                    .collect::<Vec<_>>();
                let probabilities = softmax(&joint)
                    .into_iter()
                    .zip(classes.iter())
                    .map(|(p, &class)| (self.sentiments[class], p))
                    .collect();
                let label = self
                    .labels
                    .get(code)
                    .cloned()
                    .ok_or(ClassifierError::UnknownClass {
                        code,
                        labels: self.labels.len(),
                    })?;
                Ok(Prediction {
                    label,
                    probabilities,
                })
            })
            .collect()
    }

    fn check_features(&self, x: &DenseMatrix<usize>) -> Result<(), ClassifierError> {
        let (_, actual) = x.shape();
        let expected = self.model.n_features();
        if actual != expected {
            return Err(ClassifierError::FeatureMismatch { expected, actual });
        }
        Ok(())
    }
}

fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps = values.iter().map(|v| (v - max).exp()).collect::<Vec<_>>();
    let sum = exps.iter().sum::<f64>();
    exps.into_iter().map(|e| e / sum).collect()
}
