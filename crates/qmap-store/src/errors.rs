//! Error helpers for qmap-store
//!
//! Store failures surface as `QmapError` so callers see one error type
//! whichever `EntityStore` they use. Most become `Persistence`.

use qmap_core::errors::QmapError;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> QmapError {
    QmapError::Persistence {
        op: "migration".to_string(),
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> QmapError {
    QmapError::Persistence {
        op: "migration_checksum".to_string(),
        message: format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> QmapError {
    QmapError::Persistence {
        op: "sqlite".to_string(),
        message: err.to_string(),
    }
}

/// True when SQLite rejected a write on a UNIQUE constraint
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
