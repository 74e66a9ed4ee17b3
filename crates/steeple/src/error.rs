use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use steeple_core::storage::RepositoryError;

/// Application error type that wraps `anyhow::Error`.
///
/// This allows using `?` on functions that return `Result<_, anyhow::Error>`
/// to automatically convert them into `Result<_, AppError>`. Repository
/// errors keep their HTTP meaning: a missing record answers 404 instead of
/// surfacing as a server error.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Some(RepositoryError::AlreadyExists { .. }) => StatusCode::CONFLICT,
            Some(RepositoryError::InvalidData(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "Application error");
        } else {
            tracing::debug!(error = %self.0, status = %status, "Request failed");
        }

        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
