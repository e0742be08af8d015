use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{catalog::CatalogError, dao::storage::StorageError, state::session::SessionError};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Record storage is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Quiz data could not be resolved.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Quiz data was readable but unusable.
    #[error("invalid quiz data: {0}")]
    InvalidData(String),
    /// The request was well formed but names nothing usable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<SessionError> for ServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoTargets { .. } => ServiceError::InvalidData(err.to_string()),
            SessionError::InvalidTransition(invalid) => {
                ServiceError::InvalidState(invalid.to_string())
            }
            SessionError::Closed => {
                ServiceError::InvalidState("session was superseded before it started".into())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Well-formed request whose target data cannot be used.
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Catalog(CatalogError::UnknownQuiz { quiz_id }) => {
                AppError::NotFound(format!("unknown quiz `{quiz_id}`"))
            }
            ServiceError::Catalog(err @ CatalogError::DataFormat { .. }) => {
                AppError::Unprocessable(err.to_string())
            }
            ServiceError::Catalog(err @ CatalogError::Unavailable { .. }) => {
                AppError::ServiceUnavailable(err.to_string())
            }
            ServiceError::InvalidData(message) => AppError::Unprocessable(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn catalog_errors_map_to_distinct_statuses() {
        assert_eq!(
            status_of(CatalogError::UnknownQuiz { quiz_id: "x".into() }.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                CatalogError::DataFormat {
                    quiz_id: "x".into(),
                    reason: "empty".into()
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(
                CatalogError::unavailable("down".into(), std::io::Error::other("boom")).into()
            ),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn session_errors_map_to_service_errors() {
        let err: ServiceError = SessionError::NoTargets {
            quiz_id: "x".into(),
        }
        .into();
        assert!(matches!(err, ServiceError::InvalidData(_)));
        assert_eq!(status_of(ServiceError::NotFound("s".into())), StatusCode::NOT_FOUND);
    }

    #[test]
    fn blank_guess_is_a_bad_request() {
        assert_eq!(
            status_of(ServiceError::InvalidInput("guess names no feature".into())),
            StatusCode::BAD_REQUEST
        );
    }
}
