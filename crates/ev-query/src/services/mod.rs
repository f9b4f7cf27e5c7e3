//! Per-domain query services.
//!
//! Each function validates its inputs, calls one backend operation through a
//! [`TableGateway`] and decodes the rows into a typed shape. No state is kept
//! between calls.

pub mod capacity;
pub mod energy_flow;
pub mod metadata;
pub mod production_price;
pub mod raw;
pub mod storage_price;
pub mod supply;
pub mod system_cost;
pub mod transport_price;

use std::collections::BTreeMap;
use std::time::Instant;

use ev_core::MetadataFilters;
use serde::{Deserialize, Serialize};
use serde_json::{Value as Json, json};
use tracing::{debug, warn};

use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::table::Row;
use crate::validation::require_db_path;

pub(crate) fn call(gateway: &dyn TableGateway, operation: &str, args: Json) -> QueryResult<Vec<Row>> {
    let started = Instant::now();
    match gateway.execute(operation, &args) {
        Ok(rows) => {
            debug!(
                operation,
                rows = rows.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "query finished"
            );
            Ok(rows)
        }
        Err(err) => {
            warn!(operation, error = %err, "query failed");
            Err(err)
        }
    }
}

/// Call an operation whose only argument is the database path.
pub(crate) fn call_db(gateway: &dyn TableGateway, operation: &str, db_path: &str) -> QueryResult<Vec<Row>> {
    let db_path = require_db_path(db_path)?;
    call(gateway, operation, json!({ "dbPath": db_path }))
}

/// Distinct years from `column`, ascending.
pub(crate) fn years(rows: &[Row], column: &str) -> QueryResult<Vec<i32>> {
    let mut years = rows
        .iter()
        .map(|r| r.get_i32(column))
        .collect::<QueryResult<Vec<_>>>()?;
    years.sort_unstable();
    years.dedup();
    Ok(years)
}

pub(crate) fn strings(rows: &[Row], column: &str) -> QueryResult<Vec<String>> {
    rows.iter()
        .map(|r| r.get_str(column).map(str::to_string))
        .collect()
}

/// Metadata filter and breakdown arguments shared by filtered services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataScope {
    pub filters: BTreeMap<i32, Vec<i32>>,
    pub grouper: Vec<i32>,
}

impl MetadataScope {
    pub fn new(filters: &MetadataFilters, breakdown: &[i32]) -> Self {
        Self {
            filters: filters.to_lists(),
            grouper: breakdown.to_vec(),
        }
    }

    /// Metadata joins are only worth their cost when something is selected.
    pub fn enable_metadata(&self) -> bool {
        !self.filters.is_empty() || !self.grouper.is_empty()
    }

    pub fn has_breakdown(&self) -> bool {
        !self.grouper.is_empty()
    }

    pub(crate) fn extend(&self, args: &mut Json) {
        if let Json::Object(map) = args {
            let filters = self
                .filters
                .iter()
                .map(|(k, v)| (k.to_string(), json!(v)))
                .collect::<serde_json::Map<_, _>>();
            map.insert("filters".into(), Json::Object(filters));
            map.insert("grouper".into(), json!(self.grouper));
            map.insert("enableMetadata".into(), json!(self.enable_metadata()));
        }
    }
}

/// One bucket of a time-series aggregated at some resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub milestone_year: Option<i32>,
    pub global_start: f64,
    pub global_end: f64,
    pub y_axis: Option<f64>,
    /// Breakdown or carrier label when the backend splits the series.
    pub series: Option<String>,
}

impl SeriesPoint {
    pub(crate) fn from_row(row: &Row) -> QueryResult<Self> {
        Ok(Self {
            milestone_year: row.get_opt_i32("milestone_year")?,
            global_start: row.get_f64("global_start")?,
            global_end: row.get_f64("global_end")?,
            y_axis: row.get_opt_f64("y_axis")?,
            series: row
                .first_str(&["breakdown", "carrier", "asset"])
                .map(str::to_string),
        })
    }

    pub(crate) fn from_rows(rows: &[Row]) -> QueryResult<Vec<Self>> {
        rows.iter().map(Self::from_row).collect()
    }
}
