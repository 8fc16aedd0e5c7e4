//! On-disk layout of a trained model.
//!
//! Training writes two JSON files into one directory: `vectorizer.json` and
//! `classifier.json`. Both are wrapped in an envelope carrying
//! [`FORMAT_VERSION`]; the classifier envelope also records the label
//! vocabulary and the feature count it was fitted against, so a mismatched
//! pair is refused at load time instead of producing wrong probabilities.

use std::fs;
use std::path::{Path, PathBuf};

use review_data_clean::CountVectorizer;
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierError, NaiveBayes, SentimentClassifier};
use crate::model::SentimentModel;

pub const FORMAT_VERSION: u32 = 1;
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid artifact: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize artifact: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("{path} has format version {found}, expected {expected}")]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("classifier expects {classifier} features but the vectorizer produces {vectorizer}")]
    FeatureMismatch { classifier: usize, vectorizer: usize },
    #[error("{path} is inconsistent: {reason}")]
    Inconsistent { path: PathBuf, reason: String },
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

#[derive(Serialize)]
struct VectorizerEnvelopeRef<'a> {
    format_version: u32,
    vectorizer: &'a CountVectorizer,
}

#[derive(Deserialize)]
struct VectorizerEnvelope {
    format_version: u32,
    vectorizer: CountVectorizer,
}

#[derive(Serialize)]
struct ClassifierEnvelopeRef<'a> {
    format_version: u32,
    labels: &'a [String],
    n_features: usize,
    model: &'a NaiveBayes,
}

#[derive(Deserialize)]
struct ClassifierEnvelope {
    format_version: u32,
    labels: Vec<String>,
    n_features: usize,
    model: NaiveBayes,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.dir.join(VECTORIZER_FILE)
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(CLASSIFIER_FILE)
    }

    /// Serializes both artifacts before touching the disk, then replaces any
    /// previous pair.
    pub fn save(&self, model: &SentimentModel) -> Result<(), ArtifactError> {
        let vectorizer = serde_json::to_string(&VectorizerEnvelopeRef {
            format_version: FORMAT_VERSION,
            vectorizer: model.vectorizer(),
        })
        .map_err(ArtifactError::Serialize)?;
        let classifier = serde_json::to_string(&ClassifierEnvelopeRef {
            format_version: FORMAT_VERSION,
            labels: model.classifier().labels(),
            n_features: model.vectorizer().n_features(),
            model: model.classifier().model(),
        })
        .map_err(ArtifactError::Serialize)?;

        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let files = [
            (self.vectorizer_path(), vectorizer),
            (self.classifier_path(), classifier),
        ];
        // Both files are staged before either is replaced.
        for (path, contents) in &files {
            if let Err(err) = write_staged(path, contents) {
                discard_staged(&files);
                return Err(err);
            }
        }
        for (path, _) in &files {
            fs::rename(staged_path(path), path).map_err(|source| ArtifactError::Write {
                path: path.clone(),
                source,
            })?;
        }
        tracing::info!(dir = %self.dir.display(), "artifacts written");
        Ok(())
    }

    pub fn load(&self) -> Result<SentimentModel, ArtifactError> {
        let vectorizer_path = self.vectorizer_path();
        let classifier_path = self.classifier_path();
        let vectorizer: VectorizerEnvelope = read_json(&vectorizer_path)?;
        let classifier: ClassifierEnvelope = read_json(&classifier_path)?;

        check_version(&vectorizer_path, vectorizer.format_version)?;
        check_version(&classifier_path, classifier.format_version)?;

        let n_features = vectorizer.vectorizer.n_features();
        if classifier.n_features != n_features || classifier.model.n_features() != n_features {
            return Err(ArtifactError::FeatureMismatch {
                classifier: classifier.n_features,
                vectorizer: n_features,
            });
        }

        if !vectorizer.vectorizer.has_dense_indices() {
            return Err(ArtifactError::Inconsistent {
                path: vectorizer_path,
                reason: format!("vocabulary indices are not exactly 0..{n_features}"),
            });
        }
        check_model_shape(&classifier_path, &classifier.model, n_features)?;

        let classifier = SentimentClassifier::new(classifier.labels, classifier.model)?;
        tracing::info!(
            dir = %self.dir.display(),
            features = n_features,
            labels = ?classifier.labels(),
            "artifacts loaded"
        );
        Ok(SentimentModel::new(vectorizer.vectorizer, classifier))
    }
}

fn check_version(path: &Path, found: u32) -> Result<(), ArtifactError> {
    if found != FORMAT_VERSION {
        return Err(ArtifactError::Version {
            path: path.to_path_buf(),
            found,
            expected: FORMAT_VERSION,
        });
    }
    Ok(())
}

fn check_model_shape(path: &Path, model: &NaiveBayes, n_features: usize) -> Result<(), ArtifactError> {
    let classes = model.classes().len();
    let counts = model.class_count().len();
    let log_probs = model.feature_log_prob();
    let reason = if classes != counts || classes != log_probs.len() {
        format!(
            "{classes} classes, {counts} class counts and {} feature rows",
            log_probs.len()
        )
    } else if let Some(row) = log_probs.iter().find(|row| row.len() != n_features) {
        format!("feature row of length {} for {n_features} features", row.len())
    } else {
        return Ok(());
    };
    Err(ArtifactError::Inconsistent {
        path: path.to_path_buf(),
        reason,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn staged_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn write_staged(path: &Path, contents: &str) -> Result<(), ArtifactError> {
    fs::write(staged_path(path), contents).map_err(|source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn discard_staged(files: &[(PathBuf, String)]) {
    for (path, _) in files {
        let _ = fs::remove_file(staged_path(path));
    }
}
