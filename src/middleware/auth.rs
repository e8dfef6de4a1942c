use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use serde_json::{Map, Value};

use crate::auth::cookie::TOKEN_COOKIE;
use crate::auth::{verify_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

pub const UNAUTHORIZED_MESSAGE: &str = "unAuthorized access";
pub const FORBIDDEN_MESSAGE: &str = "forbidden access";

/// Authenticated session decoded from the `token` cookie. Taking it as a
/// handler argument makes the route require a valid session.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: Option<String>,
    pub claims: Map<String, Value>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            claims: claims.extra,
        }
    }
}

impl AuthUser {
    /// Only the owner of `email` may read data keyed by it
    pub fn authorize_email(&self, email: Option<&str>) -> Result<(), ApiError> {
        match (self.email.as_deref(), email) {
            (Some(own), Some(requested)) if own == requested => Ok(()),
            _ => {
                tracing::warn!(
                    "Forbidden: session email {:?} does not match requested {:?}",
                    self.email, email
                );
                Err(ApiError::forbidden(FORBIDDEN_MESSAGE))
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                tracing::warn!("Missing session cookie on {}", parts.uri.path());
                ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
            })?;

        let claims = verify_token(&token, &state.config.security).map_err(|e| {
            tracing::warn!("Rejected session token on {}: {}", parts.uri.path(), e);
            ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;

        Ok(AuthUser::from(claims))
    }
}
