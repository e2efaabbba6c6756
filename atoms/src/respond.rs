use crate::error::AtomError;
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

/// Serializes `value` as the JSON body of a response with `status`.
pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

pub fn error_message(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    json(status, &serde_json::json!({ "error": message }))
}

pub fn status_for(err: &AtomError) -> StatusCode {
    match err {
        AtomError::NotFound { .. } => StatusCode::NOT_FOUND,
        AtomError::Validation(_) => StatusCode::BAD_REQUEST,
        AtomError::Conflict { .. } => StatusCode::CONFLICT,
        AtomError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an atom failure onto a JSON error response.
pub fn error(err: &AtomError) -> Result<Response<Body>, Error> {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::warn!(error = %err, "request rejected");
    }
    let message = match err {
        AtomError::NotFound { entity, .. } => format!("{} not found", entity),
        other => other.to_string(),
    };
    error_message(status, &message)
}

/// Turns a service result into a response, using `status` on success.
pub fn result<T: Serialize>(status: StatusCode, outcome: Result<T, AtomError>) -> Result<Response<Body>, Error> {
    match outcome {
        Ok(value) => json(status, &value),
        Err(e) => error(&e),
    }
}
