//! Per-kind chart controllers.
//!
//! Each controller knows how to load its selection lists, fetch its primary
//! dataset and turn that dataset into an ECharts-style options object. The
//! functions here dispatch on [`ChartKind`].

pub mod capacity;
pub mod geo_flow;
pub mod prices;
pub mod raw_table;
pub mod supply_stack;
pub mod system_costs;

use ev_query::services::capacity::CapacityPoint;
use ev_query::services::energy_flow::CategoryFlow;
use ev_query::services::metadata::{self, Category};
use ev_query::services::system_cost::CostRow;
use ev_query::services::{production_price, storage_price, supply, transport_price};
use ev_query::{QueryResult, Row, SeriesPoint, TableGateway, ValidationError};
use ev_store::{ChartKind, ChartOptions, GraphConfig, Placeholder, SelectionList};
use serde::Serialize;
use serde_json::{Value as Json, json};

use crate::config::AppConfig;

/// Values offered by one selection list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "list", content = "values", rename_all = "kebab-case")]
pub enum SelectionValues {
    Assets(Vec<String>),
    Years(Vec<i32>),
    Carriers(Vec<String>),
    Tables(Vec<String>),
    Categories(Vec<Category>),
}

/// Primary dataset of a chart, as fetched from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Capacity(Vec<CapacityPoint>),
    Raw(Vec<Row>),
    SystemCosts(Vec<CostRow>),
    Prices(Vec<SeriesPoint>),
    Flows {
        categories: Vec<Category>,
        flows: Vec<CategoryFlow>,
    },
    Supply {
        renewables: Vec<SeriesPoint>,
        nonrenewables: Vec<SeriesPoint>,
    },
}

/// What a panel shows: a placeholder message or chart options.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedChart {
    Placeholder(Placeholder),
    Options(Json),
}

impl RenderedChart {
    pub fn options(&self) -> Option<&Json> {
        match self {
            RenderedChart::Options(options) => Some(options),
            RenderedChart::Placeholder(_) => None,
        }
    }

    pub fn placeholder_text(&self) -> Option<String> {
        match self {
            RenderedChart::Placeholder(p) => Some(p.to_string()),
            RenderedChart::Options(_) => None,
        }
    }
}

/// Options of `graph`, or the kind's empty options when none are stored.
pub(crate) fn options_of(graph: &GraphConfig) -> Option<ChartOptions> {
    graph.effective_options()
}

/// Bound database of `graph`; empty when unbound so validation rejects it.
pub(crate) fn db_of(graph: &GraphConfig) -> &str {
    graph.graph_db_file_path.as_deref().unwrap_or("")
}

/// Load one selection list for `graph`.
pub fn load_selection(
    gateway: &dyn TableGateway,
    graph: &GraphConfig,
    list: SelectionList,
) -> QueryResult<SelectionValues> {
    let db = db_of(graph);
    match list {
        SelectionList::AvailableAssets => metadata::get_assets(gateway, db).map(SelectionValues::Assets),
        SelectionList::Tables => metadata::get_tables(gateway, db).map(SelectionValues::Tables),
        SelectionList::Categories => {
            metadata::get_categories(gateway, db).map(SelectionValues::Categories)
        }
        SelectionList::Carriers => {
            transport_price::get_transportation_carriers(gateway, db).map(SelectionValues::Carriers)
        }
        SelectionList::AvailableYears => available_years(gateway, graph).map(SelectionValues::Years),
    }
}

fn available_years(gateway: &dyn TableGateway, graph: &GraphConfig) -> QueryResult<Vec<i32>> {
    let db = db_of(graph);
    match graph.kind {
        ChartKind::Capacity => {
            let options = options_of(graph);
            let asset = options
                .as_ref()
                .and_then(ChartOptions::as_capacity)
                .and_then(|c| c.asset.as_deref());
            ev_query::services::capacity::get_available_years(gateway, db, asset)
        }
        ChartKind::ProductionPrices => production_price::get_production_years(gateway, db),
        ChartKind::StoragePrices => storage_price::get_storage_years(gateway, db),
        ChartKind::TransportationPrices => transport_price::get_transportation_years(gateway, db),
        ChartKind::SupplyStack | ChartKind::GeoImportsExports => {
            supply::get_supply_years(gateway, db)
        }
        ChartKind::RawTable | ChartKind::SystemCosts | ChartKind::Unrecognized => Ok(Vec::new()),
    }
}

/// Fetch the primary dataset of `graph`.
///
/// Callers check [`ev_store::ChartStatus::configured`] first; missing
/// selections that slip through are reported as validation errors.
pub fn fetch_dataset(
    gateway: &dyn TableGateway,
    graph: &GraphConfig,
    config: &AppConfig,
) -> QueryResult<Dataset> {
    match graph.kind {
        ChartKind::Capacity => capacity::fetch(gateway, graph),
        ChartKind::RawTable => raw_table::fetch(gateway, graph, config),
        ChartKind::SystemCosts => system_costs::fetch(gateway, graph),
        ChartKind::ProductionPrices
        | ChartKind::StoragePrices
        | ChartKind::TransportationPrices => prices::fetch(gateway, graph),
        ChartKind::GeoImportsExports => geo_flow::fetch(gateway, graph),
        ChartKind::SupplyStack => supply_stack::fetch(gateway, graph),
        ChartKind::Unrecognized => Err(ValidationError::UnsupportedChart {
            kind: graph.kind.to_string(),
        }
        .into()),
    }
}

/// Turn a fetched dataset into chart options for `graph`.
pub fn render(graph: &GraphConfig, dataset: &Dataset) -> Json {
    match dataset {
        Dataset::Capacity(points) => capacity::render(graph, points),
        Dataset::Raw(rows) => raw_table::render(graph, rows),
        Dataset::SystemCosts(rows) => system_costs::render(graph, rows),
        Dataset::Prices(points) => prices::render(graph, points),
        Dataset::Flows { categories, flows } => geo_flow::render(graph, categories, flows),
        Dataset::Supply {
            renewables,
            nonrenewables,
        } => supply_stack::render(graph, renewables, nonrenewables),
    }
}

/// Common title block.
pub(crate) fn title(graph: &GraphConfig, subtitle: Option<String>) -> Json {
    match subtitle {
        Some(sub) => json!({ "text": graph.title, "subtext": sub }),
        None => json!({ "text": graph.title }),
    }
}

/// Group series points by their label, keeping first-seen order.
pub(crate) fn group_series(points: &[SeriesPoint], fallback: &str) -> Vec<(String, Vec<SeriesPoint>)> {
    let mut groups: Vec<(String, Vec<SeriesPoint>)> = Vec::new();
    for point in points {
        let label = point.series.clone().unwrap_or_else(|| fallback.to_string());
        match groups.iter_mut().find(|(name, _)| *name == label) {
            Some((_, members)) => members.push(point.clone()),
            None => groups.push((label, vec![point.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use ev_core::ContainerId;
    use ev_query::MemoryGateway;

    #[test]
    fn unrecognized_kind_never_renders_an_empty_chart() {
        let gw = MemoryGateway::new();
        let mut graph = GraphConfig::new(ChartKind::Unrecognized, ContainerId(0));
        graph.graph_db_file_path = Some("/a.duckdb".into());

        let err = fetch_dataset(&gw, &graph, &AppConfig::default()).unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Unsupported chart type"));
        assert_eq!(gw.call_count(), 0);
    }
}
