use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;

/// Request-level failures, rendered as a JSON `{message}` body with the
/// matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API key is missing")]
    MissingApiKey,
    #[error("Access forbidden")]
    Forbidden,
    #[error("Item not found")]
    NotFound,
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("internal server error")]
    Internal(#[source] ServiceError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::DuplicateUsername => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::DuplicateUsername => ApiError::DuplicateUsername,
            ServiceError::NotFound(_) => ApiError::NotFound,
            // persistence failures have no recovery path; surface as 500
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            error!(error = %source, "request failed on persistence");
        }
        let status = self.status();
        let msg = self.to_string();
        (status, Json(serde_json::json!({"message": msg}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(ApiError::from(ServiceError::DuplicateUsername).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ServiceError::not_found("item")).status(), StatusCode::NOT_FOUND);
        let io = ServiceError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(ApiError::from(io).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
