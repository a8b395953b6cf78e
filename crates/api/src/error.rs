//! API errors and their HTTP mapping.

use axum::Json;
use formbridge_validator::foundation::ConfigError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors a request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The record store failed or was asked for something it lacks.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A catalog constraint cannot be built.
    #[error("entity catalog: {0}")]
    Catalog(#[from] ConfigError),

    /// The request body is missing a required field or has the wrong shape.
    #[error("malformed request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
