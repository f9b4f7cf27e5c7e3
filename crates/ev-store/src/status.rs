//! Derived chart status and the placeholder shown for non-ready charts.

use core::fmt;

use crate::graph::GraphConfig;
use crate::kind::ChartKind;
use crate::options::{ChartOptions, MissingOption};

/// Lifecycle of a single chart, derived from its configuration.
///
/// ```text
/// NoDatabase -> NoKind -> ConfiguringOptions -> Loading -> Ready | Error
/// ```
///
/// Never stored; always recomputed so it cannot drift from the fields it
/// summarizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartStatus {
    NoDatabase,
    NoKind,
    ConfiguringOptions(MissingOption),
    Loading,
    Ready,
    Error(String),
}

impl ChartStatus {
    pub fn of(config: &GraphConfig) -> Self {
        let configured = Self::configured(config);
        if !matches!(configured, ChartStatus::Ready | ChartStatus::ConfiguringOptions(_)) {
            return configured;
        }
        if config.is_loading {
            return ChartStatus::Loading;
        }
        if let Some(error) = &config.error {
            return ChartStatus::Error(error.clone());
        }
        configured
    }

    /// Status from the settings alone, ignoring loading and error state.
    ///
    /// `Ready` here means every input of the primary dataset is selected.
    pub fn configured(config: &GraphConfig) -> Self {
        if config.graph_db_file_path.is_none() {
            return ChartStatus::NoDatabase;
        }
        if config.kind == ChartKind::Unrecognized {
            return ChartStatus::NoKind;
        }
        let missing = config
            .options
            .as_ref()
            .map(ChartOptions::missing_requirement)
            .unwrap_or_else(|| {
                ChartOptions::default_for(config.kind).and_then(|o| o.missing_requirement())
            });
        match missing {
            Some(option) => ChartStatus::ConfiguringOptions(option),
            None => ChartStatus::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChartStatus::Ready)
    }

    /// What to render instead of chart content, if anything.
    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            ChartStatus::NoDatabase => Some(Placeholder::SelectDatabase),
            ChartStatus::NoKind => Some(Placeholder::UnsupportedKind),
            ChartStatus::ConfiguringOptions(option) => Some(Placeholder::Missing(*option)),
            ChartStatus::Loading => Some(Placeholder::Loading),
            ChartStatus::Error(message) => Some(Placeholder::Error(message.clone())),
            ChartStatus::Ready => None,
        }
    }
}

/// A visible message shown in place of chart content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    SelectDatabase,
    UnsupportedKind,
    Missing(MissingOption),
    Loading,
    /// Backend or validation failure, shown verbatim.
    Error(String),
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::SelectDatabase => f.write_str("Select a database"),
            Placeholder::UnsupportedKind => f.write_str("Unsupported chart type"),
            Placeholder::Missing(option) => write!(f, "No {option} selected"),
            Placeholder::Loading => f.write_str("Loading..."),
            Placeholder::Error(message) => f.write_str(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{CapacityOptions, OptionEdit};
    use ev_core::ContainerId;

    fn bound(kind: ChartKind) -> GraphConfig {
        let mut g = GraphConfig::new(kind, ContainerId(1));
        g.graph_db_file_path = Some("/a.duckdb".into());
        g
    }

    #[test]
    fn unbound_chart_asks_for_database() {
        let g = GraphConfig::new(ChartKind::Capacity, ContainerId(1));
        assert_eq!(g.status(), ChartStatus::NoDatabase);
        assert_eq!(
            g.status().placeholder().unwrap().to_string(),
            "Select a database"
        );
    }

    #[test]
    fn unrecognized_kind() {
        assert_eq!(bound(ChartKind::Unrecognized).status(), ChartStatus::NoKind);
    }

    #[test]
    fn capacity_with_asset_but_no_years() {
        let mut g = bound(ChartKind::Capacity);
        let mut opts = ChartOptions::Capacity(CapacityOptions::default());
        opts.apply(OptionEdit::Asset(Some("wind_1".into()))).unwrap();
        g.options = Some(opts);
        let status = g.status();
        assert_eq!(
            status,
            ChartStatus::ConfiguringOptions(MissingOption::StartYear)
        );
        assert_eq!(
            status.placeholder().unwrap().to_string(),
            "No start year selected"
        );
    }

    #[test]
    fn missing_options_fall_back_to_kind_defaults() {
        let g = bound(ChartKind::GeoImportsExports);
        assert_eq!(
            g.status(),
            ChartStatus::ConfiguringOptions(MissingOption::DetailLevel)
        );
        assert_eq!(bound(ChartKind::SystemCosts).status(), ChartStatus::Ready);
    }

    #[test]
    fn configured_ignores_transient_state() {
        let mut g = bound(ChartKind::SystemCosts);
        g.is_loading = true;
        g.error = Some("boom".into());
        assert_eq!(ChartStatus::configured(&g), ChartStatus::Ready);
    }

    #[test]
    fn loading_then_error() {
        let mut g = bound(ChartKind::SystemCosts);
        g.is_loading = true;
        assert_eq!(g.status(), ChartStatus::Loading);
        g.is_loading = false;
        g.error = Some("Query failed: no such table".into());
        let status = g.status();
        assert_eq!(
            status.placeholder().unwrap().to_string(),
            "Query failed: no such table"
        );
        assert!(!status.is_ready());
    }
}
