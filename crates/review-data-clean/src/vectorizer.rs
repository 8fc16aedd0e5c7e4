use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::{Array1, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::numbers::basenum::Number;

use crate::text::tokenize;
use crate::DataError;

/// Term-count vectorizer. Columns follow the sorted order of the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizer {
    vocabulary: BTreeMap<String, usize>,
}

impl CountVectorizer {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self, DataError> {
        let words = documents
            .iter()
            .flat_map(|doc| tokenize(doc.as_ref()))
            .collect::<std::collections::BTreeSet<_>>();
        if words.is_empty() {
            return Err(DataError::EmptyVocabulary);
        }
        let vocabulary = words
            .into_iter()
            .enumerate()
            .map(|(index, word)| (word, index))
            .collect();
        Ok(Self { vocabulary })
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// True when the column indices are exactly `0..n_features`, each used once.
    pub fn has_dense_indices(&self) -> bool {
        let mut seen = vec![false; self.vocabulary.len()];
        self.vocabulary.values().all(|&index| match seen.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        })
    }

    pub fn transform_one(&self, document: &str) -> Vec<usize> {
        bag_of_words(tokenize(document), &self.vocabulary)
    }

    /// One row per document, in input order.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<DenseMatrix<usize>, DataError> {
        if documents.is_empty() {
            return Err(DataError::EmptyInput);
        }
        if self.vocabulary.is_empty() {
            return Err(DataError::EmptyVocabulary);
        }
        let rows = documents
            .iter()
            .map(|doc| self.transform_one(doc.as_ref()))
            .collect::<Vec<_>>();
        Ok(DenseMatrix::from_2d_vec(&rows))
    }
}

pub fn bag_of_words<T: Number>(tokens: Vec<String>, vocabulary: &BTreeMap<String, usize>) -> Vec<T> {
    let mut m = Vec::zeros(vocabulary.len());

    for token in tokens {
        if let Some(index) = vocabulary.get(&token) {
            m.add_element_mut(*index, T::one());
        }
    }

    m
}
