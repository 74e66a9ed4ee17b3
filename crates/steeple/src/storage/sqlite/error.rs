//! Error mapping from tokio-rusqlite/rusqlite to repository errors.

use steeple_core::storage::RepositoryError;

/// Maps a tokio-rusqlite error to a repository error, recognizing unique
/// constraint violations as `AlreadyExists`.
pub fn map_sqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: String,
) -> RepositoryError {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, _)) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            return RepositoryError::AlreadyExists { entity_type, id };
        }
    }
    RepositoryError::QueryFailed(err.to_string())
}
