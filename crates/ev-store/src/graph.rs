//! Chart configurations and their partial updates.

use ev_core::{ContainerId, GraphId, MetadataFilters};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::kind::ChartKind;
use crate::options::ChartOptions;
use crate::status::ChartStatus;

/// One visualization panel's settings plus its transient status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphConfig {
    pub id: GraphId,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub container_id: ContainerId,
    #[serde(rename = "graphDBFilePath")]
    pub graph_db_file_path: Option<String>,
    pub options: Option<ChartOptions>,
    pub is_loading: bool,
    pub error: Option<String>,
    #[serde(default)]
    pub filters: MetadataFilters,
    /// Metadata category ids the series is broken down by.
    #[serde(default)]
    pub breakdown: Vec<i32>,
}

impl GraphConfig {
    pub fn new(kind: ChartKind, container_id: ContainerId) -> Self {
        Self {
            id: GraphId::generate(),
            kind,
            title: kind.default_title(),
            container_id,
            graph_db_file_path: None,
            options: None,
            is_loading: false,
            error: None,
            filters: MetadataFilters::new(),
            breakdown: Vec::new(),
        }
    }

    pub fn status(&self) -> ChartStatus {
        ChartStatus::of(self)
    }

    /// Options to read from, falling back to the kind's empty options.
    pub fn effective_options(&self) -> Option<ChartOptions> {
        self.options
            .clone()
            .or_else(|| ChartOptions::default_for(self.kind))
    }

    /// Whether filter or breakdown selections should scope backend queries.
    pub fn uses_metadata(&self) -> bool {
        !self.filters.is_empty() || !self.breakdown.is_empty()
    }
}

/// Shallow-merge update: every present field replaces the stored one.
///
/// Nullable fields use `Option<Option<_>>` so that "set to none" and
/// "leave untouched" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphPatch {
    pub kind: Option<ChartKind>,
    pub title: Option<String>,
    pub container_id: Option<ContainerId>,
    pub graph_db_file_path: Option<Option<String>>,
    pub options: Option<Option<ChartOptions>>,
    pub is_loading: Option<bool>,
    pub error: Option<Option<String>>,
    pub filters: Option<MetadataFilters>,
    pub breakdown: Option<Vec<i32>>,
}

impl GraphPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn loading(is_loading: bool) -> Self {
        Self {
            is_loading: Some(is_loading),
            ..Self::default()
        }
    }

    pub fn error(error: Option<String>) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `config`, keeping the options/kind invariant.
    ///
    /// A kind change without new options resets them to the new kind's
    /// empty options.
    /// Options that do not match the resulting kind are rejected and leave
    /// `config` untouched.
    pub(crate) fn apply_to(self, config: &GraphConfig) -> StoreResult<GraphConfig> {
        let mut next = config.clone();
        let kind = self.kind.unwrap_or(config.kind);

        if let Some(Some(options)) = &self.options {
            if options.kind() != kind {
                return Err(StoreError::OptionsKindMismatch {
                    kind,
                    options: options.kind(),
                });
            }
        }

        if kind != config.kind {
            next.kind = kind;
            next.options = ChartOptions::default_for(kind);
        }
        if let Some(options) = self.options {
            next.options = options;
        }
        if let Some(title) = self.title {
            next.title = title;
        }
        if let Some(container_id) = self.container_id {
            next.container_id = container_id;
        }
        if let Some(path) = self.graph_db_file_path {
            next.graph_db_file_path = path;
        }
        if let Some(is_loading) = self.is_loading {
            next.is_loading = is_loading;
        }
        if let Some(error) = self.error {
            next.error = error;
        }
        if let Some(filters) = self.filters {
            next.filters = filters;
        }
        if let Some(breakdown) = self.breakdown {
            next.breakdown = breakdown;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{EnergyFlowOptions, SupplyOptions};

    fn capacity() -> GraphConfig {
        GraphConfig::new(ChartKind::Capacity, ContainerId(0))
    }

    #[test]
    fn new_config_defaults() {
        let g = capacity();
        assert_eq!(g.title, "Capacity Chart");
        assert!(g.options.is_none());
        assert!(g.graph_db_file_path.is_none());
        assert!(!g.is_loading);
        assert!(g.error.is_none());
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let mut g = capacity();
        g.graph_db_file_path = Some("/a.duckdb".into());
        let next = GraphPatch::title("X").apply_to(&g).unwrap();
        assert_eq!(next.title, "X");
        assert_eq!(next.graph_db_file_path, g.graph_db_file_path);
        assert_eq!(next.id, g.id);
    }

    #[test]
    fn patch_can_null_a_field() {
        let mut g = capacity();
        g.error = Some("boom".into());
        let next = GraphPatch::error(None).apply_to(&g).unwrap();
        assert!(next.error.is_none());
    }

    #[test]
    fn kind_change_resets_options() {
        let mut g = capacity();
        g.options = ChartOptions::default_for(ChartKind::Capacity);
        let patch = GraphPatch {
            kind: Some(ChartKind::SupplyStack),
            ..GraphPatch::default()
        };
        let next = patch.apply_to(&g).unwrap();
        assert_eq!(next.kind, ChartKind::SupplyStack);
        assert_eq!(next.options, ChartOptions::default_for(ChartKind::SupplyStack));
    }

    #[test]
    fn mismatched_options_rejected() {
        let g = capacity();
        let patch = GraphPatch {
            options: Some(Some(ChartOptions::SupplyStack(SupplyOptions::default()))),
            ..GraphPatch::default()
        };
        assert!(matches!(
            patch.apply_to(&g),
            Err(StoreError::OptionsKindMismatch { .. })
        ));
    }

    #[test]
    fn kind_and_options_together() {
        let g = capacity();
        let opts = ChartOptions::GeoImportsExports(EnergyFlowOptions {
            level: Some(0),
            year: None,
        });
        let patch = GraphPatch {
            kind: Some(ChartKind::GeoImportsExports),
            options: Some(Some(opts.clone())),
            ..GraphPatch::default()
        };
        let next = patch.apply_to(&g).unwrap();
        assert_eq!(next.options, Some(opts));
    }

    #[test]
    fn serialized_field_names() {
        let g = capacity();
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["type"], "capacity");
        assert!(json.get("graphDBFilePath").is_some());
        assert_eq!(json["isLoading"], false);
    }
}
