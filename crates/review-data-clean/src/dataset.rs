use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::text::normalize;
use crate::{DataError, Sentiment};

#[derive(Debug, Clone, Deserialize)]
struct CsvRow {
    review: String,
    sentiment: String,
}

/// One labelled review. `label` keeps the dataset's own spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct RawData {
    pub label: String,
    pub review: String,
}

impl RawData {
    pub fn normalized(self) -> Self {
        Self {
            label: self.label,
            review: normalize(&self.review),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawDataset {
    pub data: Vec<RawData>,
}

impl RawDataset {
    pub fn from_file<P>(path: P) -> Result<Self, DataError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DataError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        tracing::debug!(path = %path.display(), rows = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    /// Reads a headed CSV with `review` and `sentiment` columns. Other
    /// columns are ignored; every label must name a [`Sentiment`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
        let data = csv
            .deserialize::<CsvRow>()
            .map(|row| {
                let row = row?;
                row.sentiment.parse::<Sentiment>()?;
                Ok(RawData {
                    label: row.sentiment.trim().to_string(),
                    review: row.review,
                })
            })
            .collect::<Result<Vec<_>, DataError>>()?;
        if data.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn normalized(self) -> Self {
        Self {
            data: self.data.into_iter().map(|row| row.normalized()).collect(),
        }
    }

    /// Distinct labels in sorted order. A label's position is its class code.
    pub fn labels(&self) -> Vec<String> {
        self.data
            .iter()
            .map(|row| row.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn unzip(self) -> (Vec<String>, Vec<String>) {
        self.data
            .into_iter()
            .map(|row| (row.review, row.label))
            .unzip()
    }
}
