// ABOUTME: Failures of the submission and lookup paths, with their HTTP status and wire tag
// ABOUTME: Rendered as `{id: <tag>, message: <text>}` bodies through IntoResponse

use crate::gateway::auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    #[error("invalid phone number {0:?}")]
    InvalidPhoneNumber(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(AuthError),

    #[error("carrier not connected: {0}")]
    CarrierNotConnected(String),

    #[error("carrier rejected submission: {0}")]
    CarrierSubmissionFailed(String),

    #[error("message sent but not cached: {0}")]
    CachePersistFailed(String),
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::InvalidRequestBody(_) | SubmissionError::InvalidPhoneNumber(_) => {
                StatusCode::BAD_REQUEST
            }
            SubmissionError::AuthenticationFailed(AuthError::RegistryUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SubmissionError::AuthenticationFailed(_) => StatusCode::BAD_REQUEST,
            SubmissionError::CarrierNotConnected(_)
            | SubmissionError::CarrierSubmissionFailed(_)
            | SubmissionError::CachePersistFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Stable identifier callers can match on
    pub fn tag(&self) -> &'static str {
        match self {
            SubmissionError::InvalidRequestBody(_) => "wrong_request_body",
            SubmissionError::InvalidPhoneNumber(_) => "invalid_phone_number",
            SubmissionError::AuthenticationFailed(AuthError::RegistryUnavailable(_)) => {
                "client_registry_error"
            }
            SubmissionError::AuthenticationFailed(_) => "api_key_error",
            SubmissionError::CarrierNotConnected(_) => "smpp_connection_error",
            SubmissionError::CarrierSubmissionFailed(_) => "smpp_submit_error",
            SubmissionError::CachePersistFailed(_) => "redis_set_error",
        }
    }

    pub fn log(&self) {
        log_failure(self.status_code(), self.tag(), self);
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        self.log();
        error_body(self.status_code(), self.tag(), &self)
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("message not found")]
    NotFound,

    #[error("cache lookup failed: {0}")]
    Cache(String),
}

impl LookupError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LookupError::NotFound => StatusCode::NOT_FOUND,
            LookupError::Cache(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LookupError::NotFound => "message_not_found",
            LookupError::Cache(_) => "redis_get_error",
        }
    }

    pub fn log(&self) {
        log_failure(self.status_code(), self.tag(), self);
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        self.log();
        error_body(self.status_code(), self.tag(), &self)
    }
}

fn log_failure(status: StatusCode, tag: &str, error: &dyn std::error::Error) {
    if status.is_server_error() {
        tracing::error!(error = %error, tag, status = status.as_u16(), "request failed");
    } else {
        tracing::warn!(error = %error, tag, status = status.as_u16(), "request rejected");
    }
}

fn error_body(status: StatusCode, tag: &str, error: &dyn std::error::Error) -> Response {
    let body = json!({
        "id": tag,
        "message": error.to_string(),
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_split_on_registry_availability() {
        let denied = SubmissionError::AuthenticationFailed(AuthError::MalformedCredential);
        assert_eq!(denied.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(denied.tag(), "api_key_error");

        let unavailable = SubmissionError::AuthenticationFailed(AuthError::RegistryUnavailable(
            "missing".into(),
        ));
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(unavailable.tag(), "client_registry_error");
    }

    #[test]
    fn carrier_and_cache_failures_are_unavailable() {
        for err in [
            SubmissionError::CarrierNotConnected("down".into()),
            SubmissionError::CarrierSubmissionFailed("0x00000045".into()),
            SubmissionError::CachePersistFailed("timeout".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE, "{err}");
        }
    }

    #[test]
    fn lookup_statuses() {
        assert_eq!(LookupError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(LookupError::NotFound.tag(), "message_not_found");
        assert_eq!(LookupError::Cache("x".into()).tag(), "redis_get_error");
    }
}
