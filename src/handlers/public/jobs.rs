use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::database::{Collection, Document, InsertOneResult};
use crate::error::ApiError;
use crate::filter::{JobFilter, JobQuery};
use crate::handlers::object_body;
use crate::state::AppState;

/// GET /jobs - every job, unfiltered
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let jobs = state.store.find_all(Collection::Jobs).await?;
    Ok(Json(jobs))
}

/// GET /jobs/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request(format!("Invalid job id: {}", id)))?;

    state
        .store
        .find_by_id(Collection::Jobs, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", id)))
}

/// POST /jobs - store the posted job as-is
pub async fn create(
    State(state): State<AppState>,
    body: Json<Value>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let job = object_body(body)?;
    let result = state.store.insert_one(Collection::Jobs, job).await?;
    tracing::info!("Created job {}", result.inserted_id);
    Ok(Json(result))
}

/// GET /job?email=&search=&min=&max=&sort=true
///
/// - `email`: jobs posted by this HR address
/// - `search`: case-insensitive substring of the title
/// - `min` + `max`: salary range contained in [min, max]; both are required
///   for the range to apply, and each must be an integer
/// - `sort=true`: highest minimum salary first
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = JobFilter::from_query(&query)?;
    tracing::debug!("Job search: {:?}", filter);

    let jobs = state
        .store
        .find_many(Collection::Jobs, &filter.to_filter_data())
        .await?;
    Ok(Json(jobs))
}
