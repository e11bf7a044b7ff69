use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use flymex_catalog::CatalogError;
use flymex_core::repository::RepositoryError;
use flymex_core::CoreError;

/// Error type for the staff and catalog endpoints; renders `{"error": msg}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    AuthenticationError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            RepositoryError::Conflict(_) => AppError::ConflictError(err.to_string()),
            RepositoryError::Storage(source) => AppError::InternalServerError(source.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_map_to_statuses() {
        let not_found: AppError = RepositoryError::NotFound("airport XYZ".into()).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let conflict: AppError = RepositoryError::Conflict("airport MEX".into()).into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let storage: AppError = RepositoryError::storage("connection reset").into();
        assert_eq!(storage.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_status_is_a_bad_request() {
        let err: AppError = CoreError::UnknownStatus("archived".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
