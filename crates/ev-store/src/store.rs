//! The visualization store.
//!
//! Owns the current [`StoreState`] behind an `Arc`. Every operation builds the
//! next state from a copy and swaps it in, then notifies the subscribers whose
//! slice changed. Readers holding an older snapshot keep seeing it unchanged.

use std::sync::Arc;

use ev_core::{ContainerId, FlowDirection, GraphId, Resolution, StorageType};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::graph::{GraphConfig, GraphPatch};
use crate::kind::ChartKind;
use crate::options::{ChartOptions, OptionEdit, RawSource};
use crate::requests::{RequestSlot, RequestTicket, RequestTracker};
use crate::state::StoreState;
use crate::subscription::{Listener, Slice, Subscribers, SubscriptionId};

#[derive(Debug, Default)]
pub struct VisualizationStore {
    state: Arc<StoreState>,
    subscribers: Subscribers,
    requests: RequestTracker,
}

impl VisualizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state. Cheap to clone and never mutated afterwards.
    pub fn snapshot(&self) -> Arc<StoreState> {
        Arc::clone(&self.state)
    }

    pub fn databases(&self) -> &[String] {
        &self.state.databases
    }

    pub fn graphs(&self) -> &[GraphConfig] {
        &self.state.graphs
    }

    pub fn graph(&self, id: &GraphId) -> Option<&GraphConfig> {
        self.state.graph(id)
    }

    pub fn graphs_in(&self, container: ContainerId) -> Vec<&GraphConfig> {
        self.state.graphs_in(container).collect()
    }

    pub fn containers(&self) -> &[ContainerId] {
        &self.state.containers
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    fn commit(&mut self, next: StoreState) -> bool {
        if next == *self.state {
            return false;
        }
        let old = std::mem::replace(&mut self.state, Arc::new(next));
        let fired = self.subscribers.notify(&old, &self.state);
        debug!(fired, "store state committed");
        true
    }

    fn edit_graph(
        &mut self,
        id: &GraphId,
        edit: impl FnOnce(&mut GraphConfig) -> StoreResult<bool>,
    ) -> StoreResult<bool> {
        let index = self
            .state
            .graph_index(id)
            .ok_or_else(|| StoreError::GraphNotFound { id: id.clone() })?;
        let mut next = (*self.state).clone();
        if !edit(&mut next.graphs[index])? {
            return Ok(false);
        }
        Ok(self.commit(next))
    }

    // ---- database registry ----

    /// Register a database path. Adding a known path is a no-op.
    pub fn add_database(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.state.has_database(&path) {
            debug!(path = %path, "database already registered");
            return false;
        }
        let mut next = (*self.state).clone();
        info!(path = %path, "database registered");
        next.databases.push(path);
        self.commit(next)
    }

    /// Remove a database path and unbind every chart that reads from it.
    ///
    /// Unbound charts lose their database, their options fall back to the
    /// kind's empty options and their loading/error state is cleared.
    /// Outstanding requests for those charts become stale.
    pub fn remove_database(&mut self, path: &str) -> bool {
        let mut next = (*self.state).clone();
        next.databases.retain(|db| db != path);
        let mut unbound = Vec::new();
        for graph in &mut next.graphs {
            if graph.graph_db_file_path.as_deref() == Some(path) {
                graph.graph_db_file_path = None;
                graph.options = ChartOptions::default_for(graph.kind);
                graph.is_loading = false;
                graph.error = None;
                unbound.push(graph.id.clone());
            }
        }
        for id in &unbound {
            self.requests.invalidate(id);
        }
        info!(path, unbound = unbound.len(), "database removed");
        self.commit(next)
    }

    pub fn has_any_database(&self) -> bool {
        self.state.has_any_database()
    }

    // ---- containers ----

    /// Create a new, empty container.
    pub fn add_container(&mut self) -> ContainerId {
        let id = ContainerId(
            self.state
                .containers
                .iter()
                .map(|c| c.0 + 1)
                .max()
                .unwrap_or(0),
        );
        let mut next = (*self.state).clone();
        next.containers.push(id);
        self.commit(next);
        id
    }

    /// Remove a container together with every chart in it.
    ///
    /// Returns the number of charts deleted.
    pub fn remove_container(&mut self, container: ContainerId) -> usize {
        let mut next = (*self.state).clone();
        next.containers.retain(|c| *c != container);
        let (removed, kept): (Vec<_>, Vec<_>) = next
            .graphs
            .into_iter()
            .partition(|g| g.container_id == container);
        next.graphs = kept;
        for graph in &removed {
            self.requests.invalidate(&graph.id);
        }
        info!(%container, charts = removed.len(), "container removed");
        self.commit(next);
        removed.len()
    }

    // ---- chart configurations ----

    /// Append a fresh chart of `kind` to `container` and return its id.
    pub fn add_graph(&mut self, kind: ChartKind, container: ContainerId) -> GraphId {
        let graph = GraphConfig::new(kind, container);
        let id = graph.id.clone();
        let mut next = (*self.state).clone();
        if !next.containers.contains(&container) {
            next.containers.push(container);
        }
        next.graphs.push(graph);
        info!(graph = %id, %kind, %container, "graph added");
        self.commit(next);
        id
    }

    /// Delete a chart. Unknown ids are ignored.
    pub fn remove_graph(&mut self, id: &GraphId) -> bool {
        let Some(index) = self.state.graph_index(id) else {
            debug!(graph = %id, "remove of unknown graph ignored");
            return false;
        };
        let mut next = (*self.state).clone();
        next.graphs.remove(index);
        self.requests.invalidate(id);
        info!(graph = %id, "graph removed");
        self.commit(next)
    }

    /// Shallow-merge `patch` into the chart `id`.
    ///
    /// Unknown ids leave the store untouched and return `Ok(false)`. A patch
    /// whose options do not match the resulting kind, or that binds a path
    /// missing from the registry, is rejected.
    pub fn update_graph(&mut self, id: &GraphId, patch: GraphPatch) -> StoreResult<bool> {
        let Some(index) = self.state.graph_index(id) else {
            debug!(graph = %id, "update of unknown graph ignored");
            return Ok(false);
        };
        if let Some(Some(path)) = &patch.graph_db_file_path {
            if !self.state.has_database(path) {
                return Err(StoreError::UnknownDatabase { path: path.clone() });
            }
        }
        let updated = patch.apply_to(&self.state.graphs[index])?;
        let mut next = (*self.state).clone();
        next.graphs[index] = updated;
        Ok(self.commit(next))
    }

    /// The chart `id`, which the caller expects to exist.
    pub fn must_get_graph(&self, id: &GraphId) -> StoreResult<&GraphConfig> {
        self.state
            .graph(id)
            .ok_or_else(|| StoreError::GraphNotFound { id: id.clone() })
    }

    /// Bind a chart to a database path, or unbind it with `None`.
    ///
    /// Unknown ids and paths missing from the registry are ignored.
    pub fn set_graph_database(&mut self, id: &GraphId, path: Option<String>) -> bool {
        if let Some(p) = &path {
            if !self.state.has_database(p) {
                debug!(graph = %id, path = %p, "bind to unregistered database ignored");
                return false;
            }
        }
        match self.edit_graph(id, |g| {
            if g.graph_db_file_path == path {
                return Ok(false);
            }
            g.graph_db_file_path = path;
            Ok(true)
        }) {
            Ok(changed) => changed,
            Err(err) => {
                debug!(error = %err, "set_graph_database ignored");
                false
            }
        }
    }

    pub fn get_graph_database(&self, id: &GraphId) -> Option<&str> {
        self.state
            .graph(id)
            .and_then(|g| g.graph_db_file_path.as_deref())
    }

    /// Change a chart's kind. A different kind resets its options.
    pub fn set_graph_kind(&mut self, id: &GraphId, kind: ChartKind) -> StoreResult<bool> {
        self.edit_graph(id, |g| {
            if g.kind == kind {
                return Ok(false);
            }
            g.kind = kind;
            g.options = ChartOptions::default_for(kind);
            g.error = None;
            Ok(true)
        })
    }

    pub fn set_graph_title(&mut self, id: &GraphId, title: impl Into<String>) -> StoreResult<bool> {
        let title = title.into();
        self.edit_graph(id, |g| {
            if g.title == title {
                return Ok(false);
            }
            g.title = title;
            Ok(true)
        })
    }

    /// Apply one option selection. Re-selecting the current value is a no-op.
    pub fn edit_options(&mut self, id: &GraphId, edit: OptionEdit) -> StoreResult<bool> {
        self.edit_graph(id, |g| {
            let kind = g.kind;
            let name = edit.name();
            let options = match g.options.take() {
                Some(options) => Some(options),
                None => ChartOptions::default_for(kind),
            };
            let Some(mut options) = options else {
                return Err(StoreError::EditNotApplicable { kind, edit: name });
            };
            let changed = options.apply(edit);
            g.options = Some(options);
            changed
        })
    }

    pub fn set_capacity_asset(&mut self, id: &GraphId, asset: Option<String>) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::Asset(asset))
    }

    pub fn set_capacity_start_year(&mut self, id: &GraphId, year: Option<i32>) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::StartYear(year))
    }

    pub fn set_capacity_end_year(&mut self, id: &GraphId, year: Option<i32>) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::EndYear(year))
    }

    pub fn set_year(&mut self, id: &GraphId, year: Option<i32>) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::Year(year))
    }

    pub fn set_resolution(&mut self, id: &GraphId, resolution: Resolution) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::Resolution(resolution))
    }

    pub fn set_carrier(&mut self, id: &GraphId, carrier: impl Into<String>) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::Carrier(carrier.into()))
    }

    pub fn set_storage_type(&mut self, id: &GraphId, storage: StorageType) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::StorageType(storage))
    }

    pub fn set_direction(&mut self, id: &GraphId, direction: FlowDirection) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::Direction(direction))
    }

    pub fn set_detail_level(&mut self, id: &GraphId, level: Option<u32>) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::Level(level))
    }

    pub fn set_raw_source(&mut self, id: &GraphId, source: Option<RawSource>) -> StoreResult<bool> {
        self.edit_options(id, OptionEdit::Source(source))
    }

    /// Flip one metadata-filter value for a chart.
    pub fn toggle_filter(&mut self, id: &GraphId, category: i32, value: i32) -> StoreResult<bool> {
        self.edit_graph(id, |g| {
            g.filters.toggle(category, value);
            Ok(true)
        })
    }

    pub fn clear_filters(&mut self, id: &GraphId) -> StoreResult<bool> {
        self.edit_graph(id, |g| Ok(g.filters.clear()))
    }

    pub fn set_breakdown(&mut self, id: &GraphId, categories: Vec<i32>) -> StoreResult<bool> {
        self.edit_graph(id, |g| {
            if g.breakdown == categories {
                return Ok(false);
            }
            g.breakdown = categories;
            Ok(true)
        })
    }

    // ---- global flags ----

    pub fn set_is_loading(&mut self, is_loading: bool) -> bool {
        let mut next = (*self.state).clone();
        next.is_loading = is_loading;
        self.commit(next)
    }

    pub fn set_error(&mut self, error: Option<String>) -> bool {
        if let Some(message) = &error {
            warn!(error = %message, "application error");
        }
        let mut next = (*self.state).clone();
        next.error = error;
        self.commit(next)
    }

    // ---- subscriptions ----

    pub fn subscribe(&mut self, slice: Slice, listener: Listener) -> SubscriptionId {
        self.subscribers.add(slice, listener)
    }

    pub fn subscribe_databases(
        &mut self,
        listener: impl FnMut(&StoreState) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribe(Slice::Databases, Box::new(listener))
    }

    pub fn subscribe_graph_list(
        &mut self,
        listener: impl FnMut(&StoreState) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribe(Slice::GraphList, Box::new(listener))
    }

    pub fn subscribe_graph(
        &mut self,
        id: &GraphId,
        listener: impl FnMut(&StoreState) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribe(Slice::Graph(id.clone()), Box::new(listener))
    }

    pub fn subscribe_status(
        &mut self,
        listener: impl FnMut(&StoreState) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribe(Slice::Status, Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    // ---- request tickets ----

    pub fn begin_request(&mut self, graph: &GraphId, slot: RequestSlot) -> RequestTicket {
        self.requests.begin(graph, slot)
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.requests.is_current(ticket)
    }

    /// Take a dataset ticket and mark the chart as loading.
    pub fn begin_dataset(&mut self, graph: &GraphId) -> StoreResult<RequestTicket> {
        self.edit_graph(graph, |g| {
            let changed = !g.is_loading || g.error.is_some();
            g.is_loading = true;
            g.error = None;
            Ok(changed)
        })?;
        Ok(self.requests.begin(graph, RequestSlot::Dataset))
    }

    /// Make the outstanding dataset fetch of `graph` stale and clear its
    /// loading and error state. Returns whether the chart changed.
    pub fn cancel_dataset(&mut self, graph: &GraphId) -> StoreResult<bool> {
        self.requests.invalidate_slot(graph, RequestSlot::Dataset);
        self.edit_graph(graph, |g| {
            let changed = g.is_loading || g.error.is_some();
            g.is_loading = false;
            g.error = None;
            Ok(changed)
        })
    }

    /// Record the outcome of a dataset fetch.
    ///
    /// Applied only when `ticket` is still the newest for its chart; stale
    /// results are dropped and `false` is returned.
    pub fn finish_dataset(&mut self, ticket: &RequestTicket, outcome: Result<(), String>) -> bool {
        if !self.requests.complete(ticket) {
            debug!(graph = %ticket.graph, seq = ticket.seq(), "stale dataset response dropped");
            return false;
        }
        let error = outcome.err();
        let applied = self.edit_graph(&ticket.graph, |g| {
            let changed = g.is_loading || g.error != error;
            g.is_loading = false;
            g.error = error;
            Ok(changed)
        });
        if let Err(err) = applied {
            warn!(error = %err, "dataset finished for a removed graph");
        }
        true
    }

    /// Retire a selection-list ticket. Returns whether its result may be used.
    pub fn finish_selection(&mut self, ticket: &RequestTicket) -> bool {
        let current = self.requests.complete(ticket);
        if !current {
            debug!(graph = %ticket.graph, seq = ticket.seq(), "stale selection response dropped");
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn store_with_chart(kind: ChartKind) -> (VisualizationStore, GraphId) {
        let mut store = VisualizationStore::new();
        let id = store.add_graph(kind, ContainerId(0));
        (store, id)
    }

    #[test]
    fn add_database_is_idempotent() {
        let mut store = VisualizationStore::new();
        assert!(!store.has_any_database());
        assert!(store.add_database("/a.duckdb"));
        assert!(!store.add_database("/a.duckdb"));
        assert_eq!(store.databases(), ["/a.duckdb".to_string()]);
        assert!(store.has_any_database());
    }

    #[test]
    fn added_graph_starts_empty() {
        let (store, id) = store_with_chart(ChartKind::Capacity);
        let g = store.must_get_graph(&id).unwrap();
        assert!(g.options.is_none());
        assert!(g.graph_db_file_path.is_none());
        assert!(!g.is_loading);
        assert!(g.error.is_none());
        assert!(g.title.contains("Capacity"));
    }

    #[test]
    fn unknown_graph_update_is_a_noop() {
        let (mut store, _) = store_with_chart(ChartKind::Capacity);
        let before = store.snapshot();
        let ghost = GraphId::parse("graph_0_missing").unwrap();
        assert_eq!(store.update_graph(&ghost, GraphPatch::title("X")), Ok(false));
        assert_eq!(*before, *store.snapshot());
        assert_eq!(
            store.must_get_graph(&ghost),
            Err(StoreError::GraphNotFound { id: ghost.clone() })
        );
    }

    #[test]
    fn snapshots_are_not_mutated() {
        let (mut store, id) = store_with_chart(ChartKind::SupplyStack);
        let before = store.snapshot();
        store.set_graph_title(&id, "Supply").unwrap();
        assert_eq!(before.graph(&id).unwrap().title, "Supply-stack Chart");
        assert_eq!(store.graph(&id).unwrap().title, "Supply");
    }

    #[test]
    fn remove_database_unbinds_charts() {
        let (mut store, id) = store_with_chart(ChartKind::Capacity);
        store.add_database("/a.duckdb");
        store.set_graph_database(&id, Some("/a.duckdb".into()));
        store.set_capacity_asset(&id, Some("wind_1".into())).unwrap();
        let ticket = store.begin_dataset(&id).unwrap();

        assert!(store.remove_database("/a.duckdb"));
        assert!(!store.set_graph_database(&id, Some("/a.duckdb".into())));
        let g = store.graph(&id).unwrap();
        assert!(g.graph_db_file_path.is_none());
        assert_eq!(g.options, ChartOptions::default_for(ChartKind::Capacity));
        assert!(!g.is_loading);
        assert!(!store.is_current(&ticket));
        assert!(!store.finish_dataset(&ticket, Err("late".into())));
        assert!(store.graph(&id).unwrap().error.is_none());
    }

    #[test]
    fn unregistered_path_is_not_bound() {
        let (mut store, id) = store_with_chart(ChartKind::SystemCosts);
        assert!(!store.set_graph_database(&id, Some("/nowhere.duckdb".into())));
        assert!(store.graph(&id).unwrap().graph_db_file_path.is_none());

        let patch = GraphPatch {
            graph_db_file_path: Some(Some("/nowhere.duckdb".into())),
            ..GraphPatch::default()
        };
        assert_eq!(
            store.update_graph(&id, patch),
            Err(StoreError::UnknownDatabase {
                path: "/nowhere.duckdb".into()
            })
        );
        assert!(store.get_graph_database(&id).is_none());
    }

    #[test]
    fn cancelled_dataset_ticket_is_stale() {
        let (mut store, id) = store_with_chart(ChartKind::SystemCosts);
        store.add_database("/a.duckdb");
        store.set_graph_database(&id, Some("/a.duckdb".into()));
        let ticket = store.begin_dataset(&id).unwrap();
        let selection = store.begin_request(&id, RequestSlot::Selection(crate::SelectionList::Categories));

        assert!(store.cancel_dataset(&id).unwrap());
        assert!(!store.graph(&id).unwrap().is_loading);
        assert!(!store.finish_dataset(&ticket, Err("late".into())));
        assert!(store.graph(&id).unwrap().error.is_none());
        assert!(store.is_current(&selection));
    }

    #[test]
    fn remove_container_cascades() {
        let mut store = VisualizationStore::new();
        let c1 = store.add_container();
        let c2 = store.add_container();
        assert_ne!(c1, c2);
        store.add_graph(ChartKind::Capacity, c1);
        store.add_graph(ChartKind::RawTable, c1);
        let keep = store.add_graph(ChartKind::SupplyStack, c2);
        assert_eq!(store.remove_container(c1), 2);
        assert_eq!(store.graphs().len(), 1);
        assert!(store.graph(&keep).is_some());
        assert_eq!(store.containers(), [c2]);
    }

    #[test]
    fn reselecting_same_value_does_not_commit() {
        let (mut store, id) = store_with_chart(ChartKind::ProductionPrices);
        assert_eq!(store.set_year(&id, Some(2030)), Ok(true));
        let before = store.snapshot();
        assert_eq!(store.set_year(&id, Some(2030)), Ok(false));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn edit_on_unrecognized_kind_is_rejected() {
        let (mut store, id) = store_with_chart(ChartKind::Unrecognized);
        assert!(matches!(
            store.set_year(&id, Some(2030)),
            Err(StoreError::EditNotApplicable { .. })
        ));
    }

    #[test]
    fn subscribers_only_see_their_slice() {
        let (mut store, id) = store_with_chart(ChartKind::Capacity);
        let other = store.add_graph(ChartKind::SystemCosts, ContainerId(0));
        let hits = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&hits);
        store.subscribe_graph(&id, move |_| sink.lock().unwrap().push("graph"));
        let sink = Arc::clone(&hits);
        store.subscribe_databases(move |_| sink.lock().unwrap().push("databases"));
        let sink = Arc::clone(&hits);
        let status = store.subscribe_status(move |_| sink.lock().unwrap().push("status"));

        store.set_graph_title(&other, "Costs").unwrap();
        assert!(hits.lock().unwrap().is_empty());

        store.set_graph_title(&id, "Mine").unwrap();
        store.add_database("/a.duckdb");
        store.set_is_loading(true);
        assert_eq!(*hits.lock().unwrap(), ["graph", "databases", "status"]);

        assert!(store.unsubscribe(status));
        store.set_is_loading(false);
        assert_eq!(hits.lock().unwrap().len(), 3);
    }

    #[test]
    fn only_newest_dataset_ticket_applies() {
        let (mut store, id) = store_with_chart(ChartKind::SystemCosts);
        let first = store.begin_dataset(&id).unwrap();
        let second = store.begin_dataset(&id).unwrap();
        assert!(store.graph(&id).unwrap().is_loading);

        assert!(store.finish_dataset(&second, Ok(())));
        assert!(!store.finish_dataset(&first, Err("old failure".into())));
        let g = store.graph(&id).unwrap();
        assert!(!g.is_loading);
        assert!(g.error.is_none());
    }

    #[test]
    fn global_flags_are_independent_of_charts() {
        let (mut store, id) = store_with_chart(ChartKind::SystemCosts);
        store.set_error(Some("upload failed".into()));
        store.set_is_loading(true);
        assert_eq!(store.error(), Some("upload failed"));
        let g = store.graph(&id).unwrap();
        assert!(g.error.is_none());
        assert!(!g.is_loading);
    }
}
