use std::collections::HashSet;
use std::sync::OnceLock;

use stopwords::{Language, Stopwords, NLTK};

/// Lowercases `text` and keeps only `a-z` and whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect()
}

fn stop_words() -> &'static HashSet<&'static str> {
    static STOPS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOPS.get_or_init(|| {
        NLTK::stopwords(Language::English)
            .unwrap_or(&[])
            .iter()
            .copied()
            .collect()
    })
}

pub fn is_stop_word(token: &str) -> bool {
    stop_words().contains(token)
}

/// Splits `text` into lowercase word tokens of at least two characters,
/// dropping English stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !is_stop_word(token))
        .map(ToString::to_string)
        .collect()
}
