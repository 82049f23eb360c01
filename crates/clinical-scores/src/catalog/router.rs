use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::batch::{run_batch, BatchReport};
use super::definition::ScoreInfo;
use super::dispatch::CalculatorDispatcher;
use super::error::{DispatchError, ErrorKind, FieldViolation, ValidationError};
use crate::error::AppError;

/// Router exposing catalog browsing and calculation endpoints.
pub fn catalog_router(dispatcher: Arc<CalculatorDispatcher>) -> Router {
    Router::new()
        .route("/api/scores", get(list_handler))
        .route("/api/scores/:score_id", get(metadata_handler))
        .route("/api/scores/:score_id/validate", get(validate_handler))
        .route("/api/scores/:score_id/calculate", post(calculate_handler))
        .route("/api/scores/:score_id/batch", post(batch_handler))
        .route("/api/categories", get(categories_handler))
        .with_state(dispatcher)
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::ScoreNotFound => StatusCode::NOT_FOUND,
            ErrorKind::CalculationError | ErrorKind::InternalServerError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(self.body())).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoreQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

pub(crate) async fn list_handler(
    State(dispatcher): State<Arc<CalculatorDispatcher>>,
    Query(query): Query<ScoreQuery>,
) -> Response {
    let registry = dispatcher.registry();
    let scores: Vec<ScoreInfo> = match (query.search.as_deref(), query.category.as_deref()) {
        (Some(term), _) => registry.search(term).map(|definition| definition.info()).collect(),
        (None, Some(category)) => registry
            .by_category(category)
            .map(|definition| definition.info())
            .collect(),
        (None, None) => registry.list().map(|definition| definition.info()).collect(),
    };

    let payload = json!({
        "total": scores.len(),
        "scores": scores,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn metadata_handler(
    State(dispatcher): State<Arc<CalculatorDispatcher>>,
    Path(score_id): Path<String>,
) -> Response {
    match dispatcher.registry().lookup(&score_id) {
        Ok(entry) => (StatusCode::OK, Json(entry.definition.as_ref().clone())).into_response(),
        Err(err) => DispatchError::from(err).into_response(),
    }
}

pub(crate) async fn validate_handler(
    State(dispatcher): State<Arc<CalculatorDispatcher>>,
    Path(score_id): Path<String>,
) -> Response {
    match dispatcher.registry().lookup(&score_id) {
        Ok(_) => {
            let payload = json!({
                "score_id": score_id,
                "score_exists": true,
                "calculator_available": true,
                "status": "ready",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => DispatchError::from(err).into_response(),
    }
}

pub(crate) async fn calculate_handler(
    State(dispatcher): State<Arc<CalculatorDispatcher>>,
    Path(score_id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                return rejection.into_response();
            }
            if !dispatcher.registry().contains(&score_id) {
                return DispatchError::UnknownScore { score_id }.into_response();
            }
            tracing::warn!(score_id = %score_id, error = %rejection, "unreadable request body");
            let error = ValidationError {
                score_id,
                violations: vec![FieldViolation::new("body", rejection.body_text())],
            };
            return DispatchError::from(error).into_response();
        }
    };

    match dispatcher.execute(&score_id, &raw) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn batch_handler(
    State(dispatcher): State<Arc<CalculatorDispatcher>>,
    Path(score_id): Path<String>,
    body: Bytes,
) -> Result<Json<BatchReport>, AppError> {
    let rows = run_batch(&dispatcher, &score_id, &body[..])?;
    Ok(Json(BatchReport::from_rows(&score_id, rows)))
}

pub(crate) async fn categories_handler(
    State(dispatcher): State<Arc<CalculatorDispatcher>>,
) -> Response {
    let categories = dispatcher.registry().categories();
    let payload = json!({
        "total": categories.len(),
        "categories": categories,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
