//! System costs: stacked bars of the discounted cost components per year.

use ev_query::services::system_cost::{self, CostRow};
use ev_query::{MetadataScope, QueryResult, TableGateway};
use ev_store::GraphConfig;
use serde_json::{Value as Json, json};

use super::{Dataset, db_of, title};

pub fn fetch(gateway: &dyn TableGateway, graph: &GraphConfig) -> QueryResult<Dataset> {
    let scope = MetadataScope::new(&graph.filters, &graph.breakdown);
    let rows = system_cost::get_all_costs(gateway, db_of(graph), &scope)?;
    Ok(Dataset::SystemCosts(rows))
}

/// One stacked bar per year. Without a breakdown each cost component is a
/// series; with a breakdown each group label is.
pub fn render(graph: &GraphConfig, rows: &[CostRow]) -> Json {
    let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();

    let by_group = !graph.breakdown.is_empty();
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        let name = series_name(row, by_group);
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let series: Vec<Json> = names
        .iter()
        .map(|name| {
            let data: Vec<f64> = years
                .iter()
                .map(|year| {
                    rows.iter()
                        .filter(|r| r.year == *year && series_name(r, by_group) == *name)
                        .map(|r| r.cost)
                        .sum()
                })
                .collect();
            json!({ "name": name, "type": "bar", "stack": "total", "data": data })
        })
        .collect();

    json!({
        "title": title(graph, None),
        "tooltip": { "trigger": "axis" },
        "legend": { "data": names },
        "xAxis": { "type": "category", "name": "Year", "data": years },
        "yAxis": { "type": "value", "name": "Cost" },
        "series": series,
    })
}

fn series_name(row: &CostRow, by_group: bool) -> String {
    if by_group {
        if let Some(label) = &row.label {
            return label.clone();
        }
    }
    row.component.label().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ev_core::ContainerId;
    use ev_query::services::system_cost::CostComponent;
    use ev_store::ChartKind;

    fn row(component: CostComponent, year: i32, label: &str, cost: f64) -> CostRow {
        CostRow {
            component,
            year,
            label: Some(label.into()),
            cost,
        }
    }

    #[test]
    fn components_stack_per_year() {
        let g = GraphConfig::new(ChartKind::SystemCosts, ContainerId(0));
        let rows = vec![
            row(CostComponent::FixedAsset, 2030, "ccgt", 1.0),
            row(CostComponent::FixedAsset, 2030, "wind", 2.0),
            row(CostComponent::UnitOn, 2040, "ccgt", 4.0),
        ];
        let out = render(&g, &rows);
        assert_eq!(out["xAxis"]["data"], json!([2030, 2040]));
        assert_eq!(out["series"][0]["name"], "Fixed asset cost");
        assert_eq!(out["series"][0]["data"], json!([3.0, 0.0]));
        assert_eq!(out["series"][1]["data"], json!([0.0, 4.0]));
    }

    #[test]
    fn breakdown_groups_by_label() {
        let mut g = GraphConfig::new(ChartKind::SystemCosts, ContainerId(0));
        g.breakdown = vec![1];
        let rows = vec![
            row(CostComponent::FixedAsset, 2030, "North", 1.0),
            row(CostComponent::UnitOn, 2030, "North", 2.0),
            row(CostComponent::UnitOn, 2030, "South", 5.0),
        ];
        let out = render(&g, &rows);
        assert_eq!(out["legend"]["data"], json!(["North", "South"]));
        assert_eq!(out["series"][0]["data"], json!([3.0]));
    }
}
