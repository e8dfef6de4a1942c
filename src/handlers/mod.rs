// handlers/mod.rs - two access tiers
//
// Public (no session) → Protected (session cookie required, checked by the
// `AuthUser` extractor on each handler)
pub mod public;
pub mod protected;

use axum::Json;
use serde_json::Value;

use crate::database::Document;
use crate::error::ApiError;

/// Insert bodies must be JSON objects; their content is otherwise free-form
pub(crate) fn object_body(Json(body): Json<Value>) -> Result<Document, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::bad_request(format!(
            "Request body must be a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
