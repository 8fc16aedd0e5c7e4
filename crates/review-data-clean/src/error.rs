use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset row: {0}")]
    Csv(#[from] csv::Error),
    #[error("unsupported sentiment label {0:?}")]
    UnsupportedLabel(String),
    #[error("dataset has no rows")]
    EmptyDataset,
    #[error("vocabulary is empty, every token was filtered out")]
    EmptyVocabulary,
    #[error("nothing to vectorize")]
    EmptyInput,
}
