use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::Document;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::applications;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplicantQuery {
    pub email: Option<String>,
}

/// GET /job-application?email= - the caller's own applications, each carrying
/// the title, company and logo of the job applied to
pub async fn list_for_applicant(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ApplicantQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    auth.authorize_email(query.email.as_deref())?;
    let email = query.email.unwrap_or_default();

    let result = applications::list_for_applicant(state.store.as_ref(), &email).await?;
    Ok(Json(result))
}
