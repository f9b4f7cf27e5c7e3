//! Capacity chart: investments, decommissions and resulting capacity of one
//! asset across a year range.

use ev_query::services::capacity::{self, CapacityPoint};
use ev_query::validation::require_selection;
use ev_query::{QueryResult, TableGateway};
use ev_store::{ChartOptions, GraphConfig};
use serde_json::{Value as Json, json};

use super::{Dataset, db_of, options_of, title};

pub fn fetch(gateway: &dyn TableGateway, graph: &GraphConfig) -> QueryResult<Dataset> {
    let options = options_of(graph);
    let capacity_options = options.as_ref().and_then(ChartOptions::as_capacity);
    let asset = capacity_options.and_then(|c| c.asset.as_deref());
    let years = capacity_options.map(|c| c.years).unwrap_or_default();
    let start = require_selection(years.start, "start year")?;
    let end = require_selection(years.end, "end year")?;

    let points = capacity::get_capacity(gateway, db_of(graph), asset)?
        .into_iter()
        .filter(|p| p.year >= start && p.year <= end)
        .collect();
    Ok(Dataset::Capacity(points))
}

pub fn render(graph: &GraphConfig, points: &[CapacityPoint]) -> Json {
    let asset = options_of(graph)
        .as_ref()
        .and_then(ChartOptions::as_capacity)
        .and_then(|c| c.asset.clone());
    let years: Vec<String> = points.iter().map(|p| p.year.to_string()).collect();
    let investment: Vec<Json> = points.iter().map(|p| json!(p.investment)).collect();
    let decommission: Vec<Json> = points
        .iter()
        .map(|p| json!(p.decommission.map(|d| -d)))
        .collect();
    let final_capacity: Vec<f64> = points.iter().map(|p| p.final_capacity).collect();

    json!({
        "title": title(graph, asset),
        "tooltip": { "trigger": "axis" },
        "legend": { "data": ["Investment", "Decommission", "Final capacity"] },
        "xAxis": { "type": "category", "name": "Year", "data": years },
        "yAxis": { "type": "value", "name": "Capacity (MW)" },
        "series": [
            { "name": "Investment", "type": "bar", "stack": "change", "data": investment },
            { "name": "Decommission", "type": "bar", "stack": "change", "data": decommission },
            { "name": "Final capacity", "type": "line", "data": final_capacity },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ev_core::ContainerId;
    use ev_store::ChartKind;

    fn point(year: i32, inv: Option<f64>, dec: Option<f64>, fin: f64) -> CapacityPoint {
        CapacityPoint {
            year,
            investment: inv,
            decommission: dec,
            initial_capacity: 0.0,
            final_capacity: fin,
        }
    }

    #[test]
    fn decommission_drawn_below_axis() {
        let mut graph = GraphConfig::new(ChartKind::Capacity, ContainerId(0));
        graph.title = "Wind".into();
        let options = render(
            &graph,
            &[point(2030, Some(5.0), Some(2.0), 3.0), point(2040, None, None, 3.0)],
        );
        assert_eq!(options["xAxis"]["data"], json!(["2030", "2040"]));
        assert_eq!(options["series"][1]["data"], json!([-2.0, null]));
        assert_eq!(options["series"][0]["data"][1], Json::Null);
        assert_eq!(options["title"]["text"], "Wind");
    }
}
