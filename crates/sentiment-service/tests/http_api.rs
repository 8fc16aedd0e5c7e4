use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use review_data_clean::RawDataset;
use sentiment_model::{training, TrainingConfig};
use sentiment_service::history::PredictionRecord;
use sentiment_service::routes::{BulkPredictResponse, HistoryResponse, LIVENESS_MESSAGE};
use sentiment_service::{router, AppState, State};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> anyhow::Result<(Router, AppState)> {
    let dataset = RawDataset::from_file("../../dataset/reviews.csv")?;
    let trained = training::fit(dataset, &TrainingConfig::default())?;
    let state = Arc::new(State::new(trained.model));
    Ok((router(state.clone()), state))
}

async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Vec<u8>)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, body.to_vec()))
}

async fn post(app: &Router, uri: &str, body: &str) -> anyhow::Result<(StatusCode, Vec<u8>)> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?;
    send(app, request).await
}

async fn get_history(app: &Router) -> anyhow::Result<HistoryResponse> {
    let request = Request::builder().uri("/history").body(Body::empty())?;
    let (status, body) = send(app, request).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(serde_json::from_slice(&body)?)
}

fn bucket_sum(record: &PredictionRecord) -> f64 {
    record.positive + record.negative + record.neutral
}

#[tokio::test]
async fn liveness() -> anyhow::Result<()> {
    let (app, _) = app()?;
    let (status, body) = send(&app, Request::builder().uri("/").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body)?, LIVENESS_MESSAGE);
    assert_eq!(LIVENESS_MESSAGE, "AI Customer Sentiment Analyzer API is running");
    Ok(())
}

#[tokio::test]
async fn predict_returns_record_and_appends_history() -> anyhow::Result<()> {
    let (app, state) = app()?;
    for (i, review) in ["Great quality, love it!", "terrible", "zzz qqq", "ok"].iter().enumerate() {
        let (status, body) = post(&app, "/predict", &json!({ "review": review }).to_string()).await?;
        assert_eq!(status, StatusCode::OK);
        let record: PredictionRecord = serde_json::from_slice(&body)?;
        assert_eq!(record.review, *review);
        assert!(["Positive", "Negative", "Neutral"].contains(&record.label.as_str()));
        assert!((bucket_sum(&record) - 1.0).abs() <= 0.02);
        assert_eq!(state.history.len(), i + 1);
    }
    Ok(())
}

#[tokio::test]
async fn predict_rejects_missing_or_empty_review() -> anyhow::Result<()> {
    let (app, state) = app()?;
    for body in [r#"{"review": ""}"#, "{}", r#"{"review": 5}"#, "not json"] {
        let (status, response) = post(&app, "/predict", body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_slice(&response)?;
        assert_eq!(error, json!({ "error": "Review text is required" }));
    }
    assert_eq!(get_history(&app).await?.count, 0);
    assert!(state.history.is_empty());
    Ok(())
}

#[tokio::test]
async fn bulk_predict_keeps_input_order() -> anyhow::Result<()> {
    let (app, _) = app()?;
    let reviews = ["fast delivery", "broken and awful", "it is okay", "love it"];
    let (status, body) = post(&app, "/bulk-predict", &json!({ "reviews": reviews }).to_string()).await?;
    assert_eq!(status, StatusCode::OK);

    let response: BulkPredictResponse = serde_json::from_slice(&body)?;
    assert_eq!(response.total_reviews, reviews.len());
    let returned = response.results.iter().map(|r| r.review.as_str()).collect::<Vec<_>>();
    assert_eq!(returned, reviews);
    for record in &response.results {
        assert!((bucket_sum(record) - 1.0).abs() <= 0.02);
    }

    let history = get_history(&app).await?;
    assert_eq!(history.count, reviews.len());
    assert_eq!(history.history, response.results);
    Ok(())
}

#[tokio::test]
async fn large_bulk_predict_runs_off_the_request_task() -> anyhow::Result<()> {
    let (app, state) = app()?;
    let reviews = (0..500)
        .map(|i| format!("review number {i}, great quality but slow delivery"))
        .collect::<Vec<_>>();
    let (status, body) = post(&app, "/bulk-predict", &json!({ "reviews": reviews }).to_string()).await?;
    assert_eq!(status, StatusCode::OK);
    let response: BulkPredictResponse = serde_json::from_slice(&body)?;
    assert_eq!(response.total_reviews, 500);
    assert_eq!(response.results[499].review, reviews[499]);
    assert_eq!(state.history.len(), 500);
    Ok(())
}

#[tokio::test]
async fn bulk_predict_rejects_bad_lists() -> anyhow::Result<()> {
    let (app, _) = app()?;
    for body in [
        r#"{"reviews": []}"#,
        "{}",
        r#"{"reviews": "x"}"#,
        r#"{"reviews": [1, 2]}"#,
        "[]",
    ] {
        let (status, response) = post(&app, "/bulk-predict", body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_slice(&response)?;
        assert_eq!(error, json!({ "error": "List of reviews required" }));
    }
    assert_eq!(get_history(&app).await?.count, 0);
    Ok(())
}

#[tokio::test]
async fn bulk_matches_single_predictions() -> anyhow::Result<()> {
    let (app, _) = app()?;
    let reviews = ["good service", "terrible product"];
    let (_, body) = post(&app, "/bulk-predict", &json!({ "reviews": reviews }).to_string()).await?;
    let bulk: BulkPredictResponse = serde_json::from_slice(&body)?;

    for (review, from_bulk) in reviews.iter().zip(&bulk.results) {
        let (_, body) = post(&app, "/predict", &json!({ "review": review }).to_string()).await?;
        let single: PredictionRecord = serde_json::from_slice(&body)?;
        assert_eq!(single.review, from_bulk.review);
        assert_eq!(single.label, from_bulk.label);
        assert_eq!(single.positive, from_bulk.positive);
        assert_eq!(single.negative, from_bulk.negative);
        assert_eq!(single.neutral, from_bulk.neutral);
    }
    assert_eq!(get_history(&app).await?.count, 4);
    Ok(())
}

#[tokio::test]
async fn history_reads_are_stable() -> anyhow::Result<()> {
    let (app, _) = app()?;
    post(&app, "/predict", r#"{"review": "nice"}"#).await?;
    let first = get_history(&app).await?;
    let second = get_history(&app).await?;
    assert_eq!(first.count, 1);
    assert_eq!(first.count, second.count);
    assert_eq!(first.history, second.history);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_predictions_are_all_recorded() -> anyhow::Result<()> {
    let (app, _) = app()?;
    let handles = (0..16)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = json!({ "reviews": [format!("review {i}"), "great"] }).to_string();
                post(&app, "/bulk-predict", &body).await
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        let (status, _) = handle.await??;
        assert_eq!(status, StatusCode::OK);
    }

    let history = get_history(&app).await?;
    assert_eq!(history.count, 32);
    for pair in history.history.chunks(2) {
        assert!(pair[0].review.starts_with("review "));
        assert_eq!(pair[1].review, "great");
    }
    Ok(())
}
