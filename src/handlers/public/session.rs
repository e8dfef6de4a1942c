use axum::{extract::State, Json};
use axum_extra::extract::CookieJar;
use serde_json::{json, Value};

use crate::auth::cookie::{removal_cookie, session_cookie};
use crate::auth::issue_token;
use crate::error::ApiError;
use crate::handlers::object_body;
use crate::state::AppState;

/// POST /jwt - sign the posted claims and set them as the `token` cookie
///
/// The body is an arbitrary JSON object; `email` is the claim later checked
/// by protected routes. Responds `{ "success": true }`.
pub async fn issue(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Json<Value>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let claims = object_body(body)?;
    let email = claims.get("email").and_then(Value::as_str).map(str::to_string);

    let token = issue_token(claims, &state.config.security)?;
    tracing::info!("Issued session token for {:?}", email);

    let cookie = session_cookie(token, state.config.is_production());
    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}

/// POST /logout - clear the `token` cookie
///
/// Sessions are not tracked server-side; a copied token stays valid until it
/// expires.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.add(removal_cookie(state.config.is_production()));
    (jar, Json(json!({ "success": true })))
}
