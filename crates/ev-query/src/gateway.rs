//! Boundary to the native backend.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::QueryResult;
use crate::table::Row;

/// Opaque RPC: a named backend operation plus an argument bag, answered with
/// rows.
pub trait TableGateway: Send + Sync {
    fn execute(&self, operation: &str, args: &serde_json::Value) -> QueryResult<Vec<Row>>;
}

impl<G: TableGateway + ?Sized> TableGateway for Arc<G> {
    fn execute(&self, operation: &str, args: &serde_json::Value) -> QueryResult<Vec<Row>> {
        (**self).execute(operation, args)
    }
}

impl<G: TableGateway + ?Sized> TableGateway for &G {
    fn execute(&self, operation: &str, args: &serde_json::Value) -> QueryResult<Vec<Row>> {
        (**self).execute(operation, args)
    }
}

/// Native file dialog.
///
/// `Ok(None)` means the user cancelled; I/O or permission problems are
/// reported as [`crate::QueryError::Picker`].
pub trait FilePicker {
    fn pick_database(&self, extension: &str) -> QueryResult<Option<PathBuf>>;
}
