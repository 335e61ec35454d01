//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::ErrorKind;
use domain::DomainError;
use projections::ProjectionError;
use saga::SagaError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request from the client.
    BadRequest(String),
    Domain(DomainError),
    Projection(ProjectionError),
    Saga(SagaError),
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) => ErrorKind::ValidationFailed,
            ApiError::Domain(err) => err.kind(),
            ApiError::Projection(err) => err.kind(),
            ApiError::Saga(err) => err.kind(),
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::Domain(err) => err.to_string(),
            ApiError::Projection(err) => err.to_string(),
            ApiError::Saga(err) => err.to_string(),
        }
    }
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::VersionConflict => StatusCode::CONFLICT,
        ErrorKind::StoreUnavailable | ErrorKind::BusUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::CompensationFailed | ErrorKind::UnknownEventType | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => status_for(kind),
        };
        let message = self.message();
        metrics::counter!("api_errors_total", "kind" => kind.as_str()).increment(1);

        if status.is_server_error() {
            tracing::error!(error = %message, kind = %kind, "request failed");
        } else {
            tracing::debug!(error = %message, kind = %kind, "request rejected");
        }

        let body = serde_json::json!({ "error": message, "kind": kind });
        (status, axum::Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Projection(err)
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorKind::ValidationFailed),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(ErrorKind::VersionConflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::StoreUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(ErrorKind::CompensationFailed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_saga_errors_keep_their_kind() {
        let err = ApiError::from(SagaError::NoItems);
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
