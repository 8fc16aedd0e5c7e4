//! Review dataset loading and text preparation: the label set, CSV loading,
//! normalization, tokenization with English stop words, and the term-count
//! vectorizer shared by training and serving.

mod dataset;
mod error;
mod sentiment;
pub mod text;
mod vectorizer;

pub use dataset::{RawData, RawDataset};
pub use error::DataError;
pub use sentiment::Sentiment;
pub use vectorizer::{bag_of_words, CountVectorizer};
