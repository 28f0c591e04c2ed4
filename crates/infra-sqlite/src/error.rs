// sqlx::Error -> AppError
// (orphan rules: cannot implement From<sqlx::Error> for AppError here)

use hireflow_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            match db_err.code().as_deref() {
                // SQLite error codes: https://www.sqlite.org/rescode.html
                Some("2067") | Some("1555") => {
                    // UNIQUE / PRIMARY KEY constraint failed
                    AppError::DuplicateEntity(message.to_string())
                }
                Some("787") | Some("3850") => {
                    AppError::Validation(format!("Foreign key constraint violation: {}", message))
                }
                Some("5") => AppError::Database(format!("Database locked (SQLITE_BUSY): {}", message)),
                Some("13") => AppError::Database(format!("Database full: {}", message)),
                Some(code) => AppError::Database(format!("Database error [{}]: {}", code, message)),
                None => AppError::Database(format!("Database error: {}", message)),
            }
        }
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

/// A stored row that no longer parses into a domain value
pub(crate) fn corrupt_row(table: &str, id: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Database(format!("Corrupt {} row {}: {}", table, id, err))
}
