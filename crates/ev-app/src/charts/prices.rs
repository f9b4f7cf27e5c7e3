//! Price-duration series for production, storage and transportation prices.

use ev_core::Resolution;
use ev_query::services::{production_price, storage_price, transport_price};
use ev_query::{MetadataScope, QueryResult, SeriesPoint, TableGateway, ValidationError};
use ev_store::{ChartKind, ChartOptions, GraphConfig};
use serde_json::{Value as Json, json};

use super::{Dataset, db_of, group_series, options_of, title};

pub fn fetch(gateway: &dyn TableGateway, graph: &GraphConfig) -> QueryResult<Dataset> {
    let db = db_of(graph);
    let scope = MetadataScope::new(&graph.filters, &graph.breakdown);
    let points = match options_of(graph) {
        Some(ChartOptions::ProductionPrices(p)) => production_price::get_production_price_resolution(
            gateway,
            db,
            p.year,
            p.resolution,
            &p.carrier,
            &scope,
        )?,
        Some(ChartOptions::StoragePrices(s)) => storage_price::get_storage_price_resolution(
            gateway,
            db,
            s.price.year,
            s.price.resolution,
            s.storage_type,
            &s.price.carrier,
            &scope,
        )?,
        Some(ChartOptions::TransportationPrices(t)) => {
            transport_price::get_transportation_price_resolution(
                gateway,
                db,
                t.price.year,
                &t.price.carrier,
                t.price.resolution,
                t.direction,
            )?
        }
        _ => {
            return Err(ValidationError::OptionsMismatch {
                kind: graph.kind.to_string(),
            }
            .into());
        }
    };
    Ok(Dataset::Prices(points))
}

fn subtitle(graph: &GraphConfig) -> Option<String> {
    let options = options_of(graph)?;
    let year = options.year()?;
    let carrier = options.carrier().unwrap_or("all");
    let detail = match &options {
        ChartOptions::StoragePrices(s) => format!(", {} storage", s.storage_type),
        ChartOptions::TransportationPrices(t) => format!(", {} flow", t.direction),
        _ => String::new(),
    };
    Some(format!("{year}, carrier: {carrier}{detail}"))
}

fn y_axis_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::StoragePrices => "Storage price",
        ChartKind::TransportationPrices => "Transport price",
        _ => "Production price",
    }
}

/// One line per series label, x in resolution buckets from the year start.
pub fn render(graph: &GraphConfig, points: &[SeriesPoint]) -> Json {
    let resolution = options_of(graph)
        .and_then(|o| o.resolution())
        .unwrap_or(Resolution::Days);
    let bucket = f64::from(resolution.hours());
    let groups = group_series(points, y_axis_name(graph.kind));

    let series: Vec<Json> = groups
        .iter()
        .map(|(name, members)| {
            let data: Vec<Json> = members
                .iter()
                .map(|p| json!([(p.global_start / bucket).floor(), p.y_axis]))
                .collect();
            json!({ "name": name, "type": "line", "showSymbol": false, "data": data })
        })
        .collect();
    let names: Vec<&String> = groups.iter().map(|(name, _)| name).collect();

    json!({
        "title": title(graph, subtitle(graph)),
        "tooltip": { "trigger": "axis" },
        "legend": { "data": names },
        "xAxis": { "type": "value", "name": resolution.axis_label() },
        "yAxis": { "type": "value", "name": y_axis_name(graph.kind) },
        "series": series,
    })
}
