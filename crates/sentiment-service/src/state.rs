use std::sync::Arc;

use sentiment_model::SentimentModel;

use crate::history::History;

/// Everything a request handler can reach: the read-only model and the
/// shared prediction history.
#[derive(Debug)]
pub struct State {
    pub model: SentimentModel,
    pub history: History,
}

impl State {
    pub fn new(model: SentimentModel) -> Self {
        Self {
            model,
            history: History::new(),
        }
    }
}

pub type AppState = Arc<State>;
