use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::query::{BatchRequest, BatchResponse, Health, ServiceError};
use crate::record::SynergyRecord;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct PartnerParams {
    pub drug1: Option<String>,
}

#[derive(Deserialize)]
pub struct CellLineParams {
    pub drug1: Option<String>,
    pub drug2: Option<String>,
}

#[derive(Deserialize)]
pub struct SynergyParams {
    pub drug1: Option<String>,
    pub drug2: Option<String>,
    pub cellline: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health failures use their own shape, matching the health success
/// payload rather than the generic error body
#[derive(Serialize)]
pub struct HealthError {
    pub status: &'static str,
    pub message: String,
}

/// Map the service taxonomy to transport status codes. This is the
/// only place HTTP learns about the three error kinds.
fn error_response(err: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: err.to_string() }))
}

pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Health>, (StatusCode, Json<HealthError>)> {
    state.service.health().map(Json).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthError { status: "error", message: e.to_string() }),
        )
    })
}

pub async fn all_drugs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    state.service.all_drugs().map(Json).map_err(error_response)
}

pub async fn search_drugs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .service
        .search_drugs(params.q.as_deref().unwrap_or(""), params.limit)
        .map(Json)
        .map_err(error_response)
}

pub async fn drug_partners(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PartnerParams>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .service
        .partners(params.drug1.as_deref())
        .map(Json)
        .map_err(error_response)
}

pub async fn cell_lines(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CellLineParams>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .service
        .cell_lines(params.drug1.as_deref(), params.drug2.as_deref())
        .map(Json)
        .map_err(error_response)
}

pub async fn synergy(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SynergyParams>,
) -> Result<Json<SynergyRecord>, (StatusCode, Json<ErrorResponse>)> {
    state
        .service
        .synergy(
            params.drug1.as_deref(),
            params.drug2.as_deref(),
            params.cellline.as_deref(),
        )
        .map(Json)
        .map_err(error_response)
}

pub async fn synergy_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, (StatusCode, Json<ErrorResponse>)> {
    // A body without a `queries` array fails here, before any
    // per-entry processing
    let Json(request) = payload.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "queries array required in request body".to_string(),
            }),
        )
    })?;

    state
        .service
        .synergy_batch(&request)
        .map(Json)
        .map_err(error_response)
}
