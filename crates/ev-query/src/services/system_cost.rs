//! Discounted system costs per milestone year.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{MetadataScope, call, call_db};
use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::table::Row;
use crate::validation::require_db_path;

/// The four cost components the backend computes separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostComponent {
    FixedAsset,
    FixedFlow,
    VariableFlow,
    UnitOn,
}

impl CostComponent {
    pub const ALL: [CostComponent; 4] = [
        CostComponent::FixedAsset,
        CostComponent::FixedFlow,
        CostComponent::VariableFlow,
        CostComponent::UnitOn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostComponent::FixedAsset => "Fixed asset cost",
            CostComponent::FixedFlow => "Fixed flow cost",
            CostComponent::VariableFlow => "Variable flow cost",
            CostComponent::UnitOn => "Unit on cost",
        }
    }

    fn value_column(self) -> &'static str {
        match self {
            CostComponent::FixedAsset => "assets_fixed_cost",
            CostComponent::FixedFlow => "flow_fixed_cost",
            CostComponent::VariableFlow => "flow_variable_cost",
            CostComponent::UnitOn => "unit_on_cost",
        }
    }

    /// Flow components are keyed by carrier and take no metadata scope.
    pub fn accepts_metadata(self) -> bool {
        matches!(self, CostComponent::FixedAsset | CostComponent::UnitOn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub component: CostComponent,
    pub year: i32,
    /// Asset, carrier or breakdown group the cost belongs to.
    pub label: Option<String>,
    pub cost: f64,
}

fn decode(component: CostComponent, rows: &[Row]) -> QueryResult<Vec<CostRow>> {
    rows.iter()
        .map(|row| {
            Ok(CostRow {
                component,
                year: row.get_i32("milestone_year")?,
                label: row
                    .first_str(&["breakdown", "asset", "carrier"])
                    .map(str::to_string),
                cost: row.get_opt_f64(component.value_column())?.unwrap_or(0.0),
            })
        })
        .collect()
}

pub fn get_fixed_asset_cost(
    gateway: &dyn TableGateway,
    db_path: &str,
    scope: &MetadataScope,
) -> QueryResult<Vec<CostRow>> {
    scoped(gateway, "get_fixed_asset_cost", CostComponent::FixedAsset, db_path, scope)
}

pub fn get_unit_on_cost(
    gateway: &dyn TableGateway,
    db_path: &str,
    scope: &MetadataScope,
) -> QueryResult<Vec<CostRow>> {
    scoped(gateway, "get_unit_on_cost", CostComponent::UnitOn, db_path, scope)
}

pub fn get_fixed_flow_cost(gateway: &dyn TableGateway, db_path: &str) -> QueryResult<Vec<CostRow>> {
    let rows = call_db(gateway, "get_fixed_flow_cost", db_path)?;
    decode(CostComponent::FixedFlow, &rows)
}

pub fn get_variable_flow_cost(
    gateway: &dyn TableGateway,
    db_path: &str,
) -> QueryResult<Vec<CostRow>> {
    let rows = call_db(gateway, "get_variable_flow_cost", db_path)?;
    decode(CostComponent::VariableFlow, &rows)
}

fn scoped(
    gateway: &dyn TableGateway,
    operation: &str,
    component: CostComponent,
    db_path: &str,
    scope: &MetadataScope,
) -> QueryResult<Vec<CostRow>> {
    let db_path = require_db_path(db_path)?;
    let mut args = json!({ "dbPath": db_path });
    scope.extend(&mut args);
    let rows = call(gateway, operation, args)?;
    decode(component, &rows)
}

/// All four components, in [`CostComponent::ALL`] order.
pub fn get_all_costs(
    gateway: &dyn TableGateway,
    db_path: &str,
    scope: &MetadataScope,
) -> QueryResult<Vec<CostRow>> {
    let mut out = get_fixed_asset_cost(gateway, db_path, scope)?;
    out.extend(get_fixed_flow_cost(gateway, db_path)?);
    out.extend(get_variable_flow_cost(gateway, db_path)?);
    out.extend(get_unit_on_cost(gateway, db_path, scope)?);
    Ok(out)
}
