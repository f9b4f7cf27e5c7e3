//! Free-form queries and table previews for the raw table viewer.

use serde_json::json;

use super::call;
use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::table::Row;
use crate::validation::{require_db_path, require_query_text, require_table_name};

/// Run a user-supplied query and return its rows unchanged.
pub fn run_serialize_query_on_db(
    gateway: &dyn TableGateway,
    db_path: &str,
    query: &str,
) -> QueryResult<Vec<Row>> {
    let db_path = require_db_path(db_path)?;
    let query = require_query_text(query)?;
    call(
        gateway,
        "run_serialize_query_on_db",
        json!({ "dbPath": db_path, "q": query }),
    )
}

/// First `limit` rows of `table`.
///
/// The backend owns the preview query; only the table name and the row cap
/// are sent.
pub fn get_table_rows(
    gateway: &dyn TableGateway,
    db_path: &str,
    table: &str,
    limit: usize,
) -> QueryResult<Vec<Row>> {
    let db_path = require_db_path(db_path)?;
    let table = require_table_name(table)?;
    call(
        gateway,
        "get_table_rows",
        json!({ "dbPath": db_path, "table": table, "limit": limit }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{QueryError, ValidationError};
    use crate::memory::MemoryGateway;

    #[test]
    fn empty_query_rejected_before_backend() {
        let gw = MemoryGateway::new();
        let err = run_serialize_query_on_db(&gw, "/a.duckdb", "   ").unwrap_err();
        assert_eq!(err, QueryError::Validation(ValidationError::EmptyQuery));
        let err = run_serialize_query_on_db(&gw, "", "SELECT 1").unwrap_err();
        assert_eq!(err, QueryError::Validation(ValidationError::EmptyDbPath));
        assert_eq!(gw.call_count(), 0);
    }

    #[test]
    fn table_preview_sends_name_and_limit() {
        let gw = MemoryGateway::new().with_rows("get_table_rows", vec![]);
        get_table_rows(&gw, "/a.duckdb", "asset \"x\"", 50).unwrap();
        let calls = gw.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation, "get_table_rows");
        assert_eq!(calls[0].args["table"], "asset \"x\"");
        assert_eq!(calls[0].args["limit"], 50);
        assert!(calls[0].args.get("q").is_none());
    }

    #[test]
    fn empty_table_name_rejected_before_backend() {
        let gw = MemoryGateway::new();
        let err = get_table_rows(&gw, "/a.duckdb", " ", 10).unwrap_err();
        assert_eq!(err, QueryError::Validation(ValidationError::EmptyTable));
        assert_eq!(gw.call_count(), 0);
    }

    #[test]
    fn backend_failure_carries_message() {
        let gw = MemoryGateway::new()
            .with_failure("run_serialize_query_on_db", "Catalog Error: Table missing");
        let err = run_serialize_query_on_db(&gw, "/a.duckdb", "SELECT * FROM missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "run_serialize_query_on_db failed: Catalog Error: Table missing"
        );
    }
}
