//! Geographic imports/exports between the categories of one detail level.

use ev_query::services::energy_flow::{self, CategoryFlow};
use ev_query::services::metadata::{self, Category};
use ev_query::validation::require_selection;
use ev_query::{QueryResult, TableGateway};
use ev_store::{ChartOptions, GraphConfig};
use serde_json::{Value as Json, json};
use tracing::debug;

use super::{Dataset, db_of, options_of, title};

fn selection(graph: &GraphConfig) -> (Option<u32>, Option<i32>) {
    match options_of(graph) {
        Some(ChartOptions::GeoImportsExports(g)) => (g.level, g.year),
        _ => (None, None),
    }
}

/// Exports of every category at the selected level, restricted to the
/// selected year.
pub fn fetch(gateway: &dyn TableGateway, graph: &GraphConfig) -> QueryResult<Dataset> {
    let (level, year) = selection(graph);
    let level = require_selection(level, "detail level")?;
    let year = require_selection(year, "year")?;
    let db = db_of(graph);

    let categories = metadata::categories_at_level(&metadata::get_categories(gateway, db)?, level);
    let mut flows = Vec::new();
    for category in &categories {
        let exports = energy_flow::get_export(gateway, db, &category.name)?;
        flows.extend(exports.into_iter().filter(|f| f.year == year));
    }
    debug!(level, year, categories = categories.len(), flows = flows.len(), "energy flows fetched");
    Ok(Dataset::Flows { categories, flows })
}

pub fn render(graph: &GraphConfig, categories: &[Category], flows: &[CategoryFlow]) -> Json {
    let mut names: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
    for flow in flows {
        for name in [&flow.from_name, &flow.to_name] {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    let nodes: Vec<Json> = names.iter().map(|n| json!({ "name": n })).collect();
    let links: Vec<Json> = flows
        .iter()
        .filter(|f| f.total_flow != 0.0 && f.from_name != f.to_name)
        .map(|f| json!({ "source": f.from_name, "target": f.to_name, "value": f.total_flow }))
        .collect();
    let (level, year) = selection(graph);
    let subtitle = match (level, year) {
        (Some(level), Some(year)) => Some(format!("Level {level}, {year}")),
        _ => None,
    };

    json!({
        "title": title(graph, subtitle),
        "tooltip": {},
        "series": [{
            "type": "graph",
            "layout": "circular",
            "roam": true,
            "edgeSymbol": ["none", "arrow"],
            "data": nodes,
            "links": links,
        }],
    })
}
