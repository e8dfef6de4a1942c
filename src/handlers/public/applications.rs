use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::database::{Collection, Document, InsertOneResult};
use crate::error::ApiError;
use crate::handlers::object_body;
use crate::services::applications;
use crate::state::AppState;

/// GET /job-applications/jobs/:id - applications whose `job_id` is `:id`
pub async fn list_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let result = applications::list_for_job(state.store.as_ref(), &job_id).await?;
    Ok(Json(result))
}

/// POST /job-applications
pub async fn create(
    State(state): State<AppState>,
    body: Json<Value>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let application = object_body(body)?;
    let result = state
        .store
        .insert_one(Collection::JobApplications, application)
        .await?;
    tracing::info!("Created job application {}", result.inserted_id);
    Ok(Json(result))
}
