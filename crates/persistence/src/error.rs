//! Translation of driver errors into repository errors.

use domain::ports::RepositoryError;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Maps a sqlx error, reporting unique violations as conflicts.
pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unique constraint").to_string();
            return RepositoryError::Conflict(constraint);
        }
    }

    tracing::error!(operation, error = %err, "Database operation failed");
    RepositoryError::Backend(format!("{}: {}", operation, err))
}
