//! Synchronous precondition checks run before a backend call.

use std::path::Path;

use crate::error::{QueryResult, ValidationError};

pub fn require_db_path(db_path: &str) -> QueryResult<&str> {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDbPath.into());
    }
    Ok(trimmed)
}

pub fn require_query_text(query: &str) -> QueryResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyQuery.into());
    }
    Ok(trimmed)
}

pub fn require_table_name(table: &str) -> QueryResult<&str> {
    let trimmed = table.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTable.into());
    }
    Ok(trimmed)
}

/// Check that `path` ends in `.{extension}` (case-insensitive).
pub fn require_extension(path: &Path, extension: &str) -> QueryResult<()> {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
    if !matches {
        return Err(ValidationError::WrongExtension {
            path: path.display().to_string(),
            expected: extension.to_string(),
        }
        .into());
    }
    Ok(())
}

pub fn require_selection<T>(value: Option<T>, what: &'static str) -> QueryResult<T> {
    value.ok_or_else(|| ValidationError::MissingSelection { what }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use std::path::PathBuf;

    #[test]
    fn blank_inputs_are_rejected_with_distinct_messages() {
        let db = require_db_path("  ").unwrap_err();
        let query = require_query_text("").unwrap_err();
        assert_eq!(db.to_string(), "Database path must not be empty");
        assert_eq!(query.to_string(), "Query text must not be empty");
        assert!(db.is_validation());
    }

    #[test]
    fn extension_check() {
        assert!(require_extension(&PathBuf::from("/data/model.duckdb"), "duckdb").is_ok());
        assert!(require_extension(&PathBuf::from("/data/MODEL.DUCKDB"), "duckdb").is_ok());
        let err = require_extension(&PathBuf::from("/data/model.csv"), "duckdb").unwrap_err();
        assert_eq!(
            err,
            QueryError::Validation(ValidationError::WrongExtension {
                path: "/data/model.csv".into(),
                expected: "duckdb".into(),
            })
        );
        assert!(require_extension(&PathBuf::from("/data/model"), "duckdb").is_err());
    }

    #[test]
    fn missing_selection_message() {
        let err = require_selection::<i32>(None, "year").unwrap_err();
        assert_eq!(err.to_string(), "No year selected");
        assert_eq!(require_selection(Some(2030), "year").unwrap(), 2030);
    }
}
