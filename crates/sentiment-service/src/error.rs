use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sentiment_model::PredictError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Review text is required")]
    ReviewRequired,
    #[error("List of reviews required")]
    ReviewsRequired,
    #[error("Prediction failed")]
    Prediction(#[from] PredictError),
    #[error("Prediction failed")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ReviewRequired | ApiError::ReviewsRequired => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
        }

        match &self {
            ApiError::Prediction(err) => tracing::error!(error = %err, "prediction failed"),
            ApiError::Task(err) => tracing::error!(error = %err, "prediction task failed"),
            _ => {}
        }

        (
            self.status(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
