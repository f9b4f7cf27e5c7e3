//! Imports and exports between metadata categories.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::call;
use crate::error::{QueryResult, ValidationError};
use crate::gateway::TableGateway;
use crate::table::Row;
use crate::validation::require_db_path;

/// Total yearly flow from one root category to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFlow {
    pub from_id: i32,
    pub from_name: String,
    pub to_id: i32,
    pub to_name: String,
    pub year: i32,
    pub total_flow: f64,
}

impl CategoryFlow {
    fn from_row(row: &Row) -> QueryResult<Self> {
        Ok(Self {
            from_id: row.get_i32("root_cat_out_id")?,
            from_name: row.get_str("cat_out_name")?.to_string(),
            to_id: row.get_i32("root_cat_in_id")?,
            to_name: row.get_str("cat_in_name")?.to_string(),
            year: row.get_i32("year")?,
            total_flow: row.get_opt_f64("tot_flow")?.unwrap_or(0.0),
        })
    }
}

fn flows(
    gateway: &dyn TableGateway,
    operation: &str,
    db_path: &str,
    category: &str,
) -> QueryResult<Vec<CategoryFlow>> {
    let db_path = require_db_path(db_path)?;
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::MissingSelection { what: "category" }.into());
    }
    let rows = call(
        gateway,
        operation,
        json!({ "dbPath": db_path, "catName": category }),
    )?;
    rows.iter().map(CategoryFlow::from_row).collect()
}

/// Flows into `category` from every other root category.
pub fn get_import(
    gateway: &dyn TableGateway,
    db_path: &str,
    category: &str,
) -> QueryResult<Vec<CategoryFlow>> {
    flows(gateway, "get_import", db_path, category)
}

/// Flows out of `category` into every other root category.
pub fn get_export(
    gateway: &dyn TableGateway,
    db_path: &str,
    category: &str,
) -> QueryResult<Vec<CategoryFlow>> {
    flows(gateway, "get_export", db_path, category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGateway;

    #[test]
    fn decodes_flow_rows() {
        let gw = MemoryGateway::new().with_rows(
            "get_import",
            vec![
                Row::new()
                    .with("root_cat_out_id", 2)
                    .with("cat_out_name", "Belgium")
                    .with("root_cat_in_id", 1)
                    .with("cat_in_name", "Netherlands")
                    .with("year", 2030)
                    .with("tot_flow", 12.5),
            ],
        );
        let flows = get_import(&gw, "/a.duckdb", "Netherlands").unwrap();
        assert_eq!(flows[0].from_name, "Belgium");
        assert_eq!(flows[0].total_flow, 12.5);
        assert_eq!(gw.calls()[0].args["catName"], "Netherlands");
    }

    #[test]
    fn blank_category_rejected() {
        let gw = MemoryGateway::new();
        assert_eq!(
            get_export(&gw, "/a.duckdb", " ").unwrap_err().to_string(),
            "No category selected"
        );
    }
}
