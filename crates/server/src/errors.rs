use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::ModelError;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::metrics::REQUEST_ERRORS_TOTAL;

/// Error returned by HTTP handlers, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::Model(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        REQUEST_ERRORS_TOTAL.with_label_values(&[status.as_str()]).inc();
        if status.is_server_error() {
            error!(error = %msg, status = status.as_u16(), "request failed");
        } else {
            match &self {
                ApiError::Model(ModelError::MalformedIdentifier(input)) => {
                    warn!(error = %msg, %input, status = status.as_u16(), "request rejected")
                }
                _ => warn!(error = %msg, status = status.as_u16(), "request rejected"),
            }
        }
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}
