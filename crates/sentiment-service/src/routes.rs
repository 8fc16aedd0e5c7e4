use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::history::PredictionRecord;
use crate::state::AppState;

pub const LIVENESS_MESSAGE: &str = "AI Customer Sentiment Analyzer API is running";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/bulk-predict", post(bulk_predict))
        .route("/history", get(history))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub review: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkPredictRequest {
    #[serde(default)]
    pub reviews: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkPredictResponse {
    pub total_reviews: usize,
    pub results: Vec<PredictionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub history: Vec<PredictionRecord>,
}

pub async fn home() -> &'static str {
    LIVENESS_MESSAGE
}

#[tracing::instrument(name = "POST /predict", skip_all)]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionRecord>, ApiError> {
    let review = payload
        .ok()
        .and_then(|Json(body)| body.review)
        .filter(|review| !review.is_empty())
        .ok_or(ApiError::ReviewRequired)?;

    let model_state = state.clone();
    let record = tokio::task::spawn_blocking(move || {
        let prediction = model_state.model.predict_one(&review)?;
        Ok::<_, ApiError>(PredictionRecord::new(review, prediction))
    })
    .await??;
    state.history.append(record.clone());
    tracing::debug!(label = %record.label, "review classified");
    Ok(Json(record))
}

#[tracing::instrument(name = "POST /bulk-predict", skip_all)]
pub async fn bulk_predict(
    State(state): State<AppState>,
    payload: Result<Json<BulkPredictRequest>, JsonRejection>,
) -> Result<Json<BulkPredictResponse>, ApiError> {
    let reviews = payload
        .ok()
        .and_then(|Json(body)| body.reviews)
        .filter(|reviews| !reviews.is_empty())
        .ok_or(ApiError::ReviewsRequired)?;

    // Vectorizing builds a dense reviews x vocabulary matrix; keep it off the
    // async workers.
    let model_state = state.clone();
    let results = tokio::task::spawn_blocking(move || {
        let predictions = model_state.model.predict_batch(&reviews)?;
        Ok::<_, ApiError>(
            reviews
                .into_iter()
                .zip(predictions)
                .map(|(review, prediction)| PredictionRecord::new(review, prediction))
                .collect::<Vec<_>>(),
        )
    })
    .await??;
    state.history.extend(results.iter().cloned());
    tracing::debug!(total = results.len(), "reviews classified");
    Ok(Json(BulkPredictResponse {
        total_reviews: results.len(),
        results,
    }))
}

#[tracing::instrument(name = "GET /history", skip_all)]
pub async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let history = state.history.snapshot();
    Json(HistoryResponse {
        count: history.len(),
        history,
    })
}
