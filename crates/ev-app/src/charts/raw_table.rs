//! Raw table viewer: a table preview or the result of a free-form query.

use ev_query::services::raw;
use ev_query::table::column_names;
use ev_query::validation::require_selection;
use ev_query::{QueryResult, Row, TableGateway};
use ev_store::{ChartOptions, GraphConfig, RawSource};
use serde_json::{Value as Json, json};

use super::{Dataset, db_of, options_of};
use crate::config::AppConfig;

pub fn fetch(gateway: &dyn TableGateway, graph: &GraphConfig, config: &AppConfig) -> QueryResult<Dataset> {
    let options = options_of(graph);
    let source = require_selection(options.as_ref().and_then(ChartOptions::source), "table or query")?;
    let rows = match source {
        RawSource::Table(table) => {
            raw::get_table_rows(gateway, db_of(graph), table, config.raw_table_row_limit)?
        }
        RawSource::Query(query) => raw::run_serialize_query_on_db(gateway, db_of(graph), query)?,
    };
    Ok(Dataset::Raw(rows))
}

/// Columns in first-seen order and one array of cells per row.
///
/// Cells missing from a row are rendered as `null`.
pub fn render(graph: &GraphConfig, rows: &[Row]) -> Json {
    let columns = column_names(rows);
    let data: Vec<Json> = rows
        .iter()
        .map(|row| {
            Json::Array(
                columns
                    .iter()
                    .map(|c| row.get(c).map(|v| v.to_json()).unwrap_or(Json::Null))
                    .collect(),
            )
        })
        .collect();
    json!({
        "title": { "text": graph.title },
        "columns": columns,
        "rows": data,
        "rowCount": rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ev_core::ContainerId;
    use ev_query::{MemoryGateway, Value};
    use ev_store::ChartKind;

    fn graph(source: RawSource) -> GraphConfig {
        let mut g = GraphConfig::new(ChartKind::RawTable, ContainerId(0));
        g.graph_db_file_path = Some("/a.duckdb".into());
        g.options = Some(ChartOptions::RawTable(ev_store::RawTableOptions {
            source: Some(source),
        }));
        g
    }

    #[test]
    fn table_preview_respects_row_limit() {
        let gw = MemoryGateway::new().with_rows("get_table_rows", vec![]);
        let cfg = AppConfig {
            raw_table_row_limit: 25,
            ..AppConfig::default()
        };
        fetch(&gw, &graph(RawSource::Table("asset".into())), &cfg).unwrap();
        let args = &gw.calls_to("get_table_rows")[0].args;
        assert_eq!(args["table"], "asset");
        assert_eq!(args["limit"], 25);
    }

    #[test]
    fn ragged_rows_are_padded() {
        let rows = vec![
            Row::new().with("a", 1).with("b", "x"),
            Row::new().with("b", "y").with("c", Value::Null),
        ];
        let g = graph(RawSource::Query("SELECT 1".into()));
        let out = render(&g, &rows);
        assert_eq!(out["columns"], json!(["a", "b", "c"]));
        assert_eq!(out["rows"][1], json!([null, "y", null]));
        assert_eq!(out["rowCount"], 2);
    }
}
