//! Immutable store snapshot.

use ev_core::{ContainerId, GraphId};
use serde::{Deserialize, Serialize};

use crate::graph::GraphConfig;

/// Whole store contents at one point in time.
///
/// The store never mutates a published snapshot; every operation builds the
/// next one and swaps it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// Loaded database paths in insertion order, without duplicates.
    pub databases: Vec<String>,
    pub graphs: Vec<GraphConfig>,
    pub containers: Vec<ContainerId>,
    /// Application-wide busy flag (toolbar spinner), not per chart.
    pub is_loading: bool,
    /// Application-wide error (e.g. a failed upload), not per chart.
    pub error: Option<String>,
}

impl StoreState {
    pub fn graph(&self, id: &GraphId) -> Option<&GraphConfig> {
        self.graphs.iter().find(|g| &g.id == id)
    }

    pub(crate) fn graph_index(&self, id: &GraphId) -> Option<usize> {
        self.graphs.iter().position(|g| &g.id == id)
    }

    pub fn graphs_in(&self, container: ContainerId) -> impl Iterator<Item = &GraphConfig> {
        self.graphs
            .iter()
            .filter(move |g| g.container_id == container)
    }

    pub fn has_database(&self, path: &str) -> bool {
        self.databases.iter().any(|db| db == path)
    }

    pub fn has_any_database(&self) -> bool {
        !self.databases.is_empty()
    }
}
