//! Supply stack: renewable and non-renewable supply over one year.

use ev_core::Resolution;
use ev_query::services::supply::{self, SupplySource};
use ev_query::{QueryResult, SeriesPoint, TableGateway};
use ev_store::{ChartOptions, GraphConfig};
use serde_json::{Value as Json, json};

use super::{Dataset, db_of, options_of, title};

fn selection(graph: &GraphConfig) -> (Option<i32>, Resolution) {
    match options_of(graph) {
        Some(ChartOptions::SupplyStack(s)) => (s.year, s.resolution),
        _ => (None, Resolution::Days),
    }
}

pub fn fetch(gateway: &dyn TableGateway, graph: &GraphConfig) -> QueryResult<Dataset> {
    let (year, resolution) = selection(graph);
    let db = db_of(graph);
    let renewables = supply::get_supply(gateway, SupplySource::Renewables, db, year, resolution)?;
    let nonrenewables =
        supply::get_supply(gateway, SupplySource::Nonrenewables, db, year, resolution)?;
    Ok(Dataset::Supply {
        renewables,
        nonrenewables,
    })
}

fn area(source: SupplySource, points: &[SeriesPoint], bucket: f64) -> Json {
    let data: Vec<Json> = points
        .iter()
        .map(|p| json!([(p.global_start / bucket).floor(), p.y_axis.unwrap_or(0.0)]))
        .collect();
    json!({
        "name": source.label(),
        "type": "line",
        "stack": "supply",
        "areaStyle": {},
        "showSymbol": false,
        "data": data,
    })
}

pub fn render(graph: &GraphConfig, renewables: &[SeriesPoint], nonrenewables: &[SeriesPoint]) -> Json {
    let (year, resolution) = selection(graph);
    let bucket = f64::from(resolution.hours());
    json!({
        "title": title(graph, year.map(|y| y.to_string())),
        "tooltip": { "trigger": "axis" },
        "legend": { "data": [SupplySource::Renewables.label(), SupplySource::Nonrenewables.label()] },
        "xAxis": { "type": "value", "name": resolution.axis_label() },
        "yAxis": { "type": "value", "name": "Supply (MWh)" },
        "series": [
            area(SupplySource::Renewables, renewables, bucket),
            area(SupplySource::Nonrenewables, nonrenewables, bucket),
        ],
    })
}
