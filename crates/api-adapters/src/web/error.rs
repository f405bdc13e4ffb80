//! API error handling.
//!
//! Every client-side failure, including "not found", is a 400 with an
//! `{"error": "..."}` body; board clients key off that shape, not the status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domains::DomainError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                ApiError::internal("internal server error")
            }
            client => ApiError::bad_request(client.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_a_bad_request() {
        let err =
            ApiError::from(DomainError::NotFound("No such thread exists on this board".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "No such thread exists on this board");
    }

    #[test]
    fn invalid_id_keeps_field_name() {
        let err = ApiError::from(DomainError::InvalidIdentifier("reply_id"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "invalid reply_id");
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::from(DomainError::Internal("password=hunter2".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "internal server error");
    }
}
