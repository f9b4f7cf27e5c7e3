//! In-memory gateway and picker for tests and offline demos.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::gateway::{FilePicker, TableGateway};
use crate::table::Row;

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: String,
    pub args: serde_json::Value,
}

/// Serves canned rows per operation name and records every call.
///
/// Operations without a canned answer fail with a backend error, the same
/// way an unknown command would.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    responses: Mutex<HashMap<String, Result<Vec<Row>, String>>>,
    calls: Mutex<Vec<Call>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, operation: &str, rows: Vec<Row>) -> Self {
        self.set_rows(operation, rows);
        self
    }

    pub fn with_failure(self, operation: &str, message: &str) -> Self {
        self.set_failure(operation, message);
        self
    }

    pub fn set_rows(&self, operation: &str, rows: Vec<Row>) {
        lock(&self.responses).insert(operation.to_string(), Ok(rows));
    }

    pub fn set_failure(&self, operation: &str, message: &str) {
        lock(&self.responses).insert(operation.to_string(), Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<Call> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }
}

impl TableGateway for MemoryGateway {
    fn execute(&self, operation: &str, args: &serde_json::Value) -> QueryResult<Vec<Row>> {
        lock(&self.calls).push(Call {
            operation: operation.to_string(),
            args: args.clone(),
        });
        debug!(operation, "memory gateway call");
        match lock(&self.responses).get(operation) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(message)) => Err(QueryError::backend(operation, message.clone())),
            None => Err(QueryError::backend(operation, "unknown command")),
        }
    }
}

/// A file picker that always returns the same answer.
#[derive(Debug, Clone)]
pub struct StaticPicker {
    answer: Result<Option<PathBuf>, String>,
}

impl StaticPicker {
    pub fn picking(path: impl Into<PathBuf>) -> Self {
        Self {
            answer: Ok(Some(path.into())),
        }
    }

    pub fn cancelled() -> Self {
        Self { answer: Ok(None) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            answer: Err(message.into()),
        }
    }
}

impl FilePicker for StaticPicker {
    fn pick_database(&self, _extension: &str) -> QueryResult<Option<PathBuf>> {
        self.answer.clone().map_err(|message| QueryError::Picker { message })
    }
}
