//! Dashboard orchestration.
//!
//! Owns the store, the gateway and one [`PanelState`] per chart. Every edit
//! goes through [`Dashboard::update`], which compares the chart before and
//! after the edit against the declared triggers of its kind and refetches only
//! the selection lists and dataset that depend on a changed field.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use ev_core::{ContainerId, GraphId};
use ev_query::validation::require_extension;
use ev_query::{FilePicker, TableGateway};
use ev_store::{
    ChartKind, ChartStatus, GraphPatch, OptionEdit, Placeholder, RequestSlot, RequestTicket,
    SelectionList, StoreResult, VisualizationStore, needs_dataset_refetch, selection_lists,
    stale_selection_lists,
};
use tracing::{debug, info, warn};

use crate::charts::{self, Dataset, RenderedChart, SelectionValues};
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::worker::{FetchMessage, FetchWorker};

/// View-side state of one chart: its selection lists and what it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub selections: BTreeMap<SelectionList, SelectionValues>,
    /// Backend failures of the last load of each list.
    pub selection_errors: BTreeMap<SelectionList, String>,
    pub dataset: Option<Dataset>,
    pub rendered: RenderedChart,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            selections: BTreeMap::new(),
            selection_errors: BTreeMap::new(),
            dataset: None,
            rendered: RenderedChart::Placeholder(Placeholder::SelectDatabase),
        }
    }
}

impl PanelState {
    pub fn selection(&self, list: SelectionList) -> Option<&SelectionValues> {
        self.selections.get(&list)
    }

    fn reset(&mut self) {
        self.selections.clear();
        self.selection_errors.clear();
        self.dataset = None;
    }
}

pub struct Dashboard<G: TableGateway + 'static> {
    store: VisualizationStore,
    gateway: Arc<G>,
    config: AppConfig,
    panels: HashMap<GraphId, PanelState>,
    workers: Vec<FetchWorker>,
}

impl<G: TableGateway + 'static> Dashboard<G> {
    pub fn new(gateway: G, config: AppConfig) -> Self {
        Self::with_shared_gateway(Arc::new(gateway), config)
    }

    pub fn with_shared_gateway(gateway: Arc<G>, config: AppConfig) -> Self {
        Self {
            store: VisualizationStore::new(),
            gateway,
            config,
            panels: HashMap::new(),
            workers: Vec::new(),
        }
    }

    pub fn store(&self) -> &VisualizationStore {
        &self.store
    }

    /// Direct store access for subscriptions. Edits made here bypass the
    /// refetch logic of [`Dashboard::update`].
    pub fn store_mut(&mut self) -> &mut VisualizationStore {
        &mut self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn panel(&self, id: &GraphId) -> Option<&PanelState> {
        self.panels.get(id)
    }

    pub fn rendered(&self, id: &GraphId) -> Option<&RenderedChart> {
        self.panels.get(id).map(|p| &p.rendered)
    }

    // ---- databases ----

    /// Ask the user for a database file and register it.
    ///
    /// Cancelling is not an error and changes nothing. Picker failures and
    /// files with the wrong extension set the global error and are returned.
    pub fn upload_database(&mut self, picker: &dyn FilePicker) -> AppResult<Option<String>> {
        self.store.set_is_loading(true);
        let outcome = self.pick_database(picker);
        self.store.set_is_loading(false);
        match outcome {
            Ok(Some(path)) => {
                self.store.set_error(None);
                Ok(Some(path))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.store.set_error(Some(e.to_string()));
                Err(e)
            }
        }
    }

    fn pick_database(&mut self, picker: &dyn FilePicker) -> AppResult<Option<String>> {
        let extension = self.config.database_extension.clone();
        let Some(path) = picker.pick_database(&extension)? else {
            info!("database selection cancelled");
            return Ok(None);
        };
        require_extension(&path, &extension)?;
        let path = path.display().to_string();
        self.store.add_database(path.clone());
        Ok(Some(path))
    }

    /// Unregister a database; charts bound to it become unbound.
    pub fn remove_database(&mut self, path: &str) -> bool {
        let bound: Vec<GraphId> = self
            .store
            .graphs()
            .iter()
            .filter(|g| g.graph_db_file_path.as_deref() == Some(path))
            .map(|g| g.id.clone())
            .collect();
        let changed = self.store.remove_database(path);
        for id in &bound {
            if let Some(panel) = self.panels.get_mut(id) {
                panel.reset();
            }
            self.rerender(id);
        }
        changed
    }

    // ---- charts ----

    pub fn add_chart(&mut self, kind: ChartKind, container: ContainerId) -> GraphId {
        let id = self.store.add_graph(kind, container);
        if let Err(e) = self.apply_config_defaults(&id, kind) {
            warn!(graph = %id, error = %e, "config defaults not applied");
        }
        self.panels.insert(id.clone(), PanelState::default());
        self.rerender(&id);
        id
    }

    fn apply_config_defaults(&mut self, id: &GraphId, kind: ChartKind) -> StoreResult<()> {
        let takes_carrier = matches!(
            kind,
            ChartKind::ProductionPrices | ChartKind::StoragePrices | ChartKind::TransportationPrices
        );
        if takes_carrier || kind == ChartKind::SupplyStack {
            self.store
                .edit_options(id, OptionEdit::Resolution(self.config.default_resolution))?;
        }
        if takes_carrier {
            let carrier = self.config.default_carrier.clone();
            self.store.edit_options(id, OptionEdit::Carrier(carrier))?;
        }
        Ok(())
    }

    pub fn remove_chart(&mut self, id: &GraphId) -> bool {
        self.panels.remove(id);
        self.store.remove_graph(id)
    }

    /// Remove a container and all of its charts.
    pub fn remove_container(&mut self, container: ContainerId) -> usize {
        let ids: Vec<GraphId> = self
            .store
            .graphs_in(container)
            .into_iter()
            .map(|g| g.id.clone())
            .collect();
        for id in &ids {
            self.panels.remove(id);
        }
        self.store.remove_container(container)
    }

    /// Apply `edit` to the chart `id` and refetch whatever it invalidated.
    ///
    /// Returns `Ok(false)` when the edit changed nothing; nothing is
    /// refetched in that case.
    pub fn update(
        &mut self,
        id: &GraphId,
        edit: impl FnOnce(&mut VisualizationStore) -> StoreResult<bool>,
    ) -> AppResult<bool> {
        let old = self.store.must_get_graph(id)?.clone();
        if !edit(&mut self.store)? {
            debug!(graph = %id, "edit changed nothing");
            return Ok(false);
        }
        let Some(new) = self.store.graph(id).cloned() else {
            self.panels.remove(id);
            return Ok(true);
        };

        if old.kind != new.kind {
            if let Some(panel) = self.panels.get_mut(id) {
                panel.reset();
            }
        }
        for list in stale_selection_lists(&old, &new) {
            self.load_selection(id, list)?;
        }
        if needs_dataset_refetch(&old, &new) {
            self.refresh_dataset(id)?;
        } else {
            self.rerender(id);
        }
        Ok(true)
    }

    pub fn bind_database(&mut self, id: &GraphId, path: Option<String>) -> AppResult<bool> {
        self.update(id, |store| Ok(store.set_graph_database(id, path)))
    }

    pub fn select(&mut self, id: &GraphId, edit: OptionEdit) -> AppResult<bool> {
        self.update(id, |store| store.edit_options(id, edit))
    }

    pub fn set_kind(&mut self, id: &GraphId, kind: ChartKind) -> AppResult<bool> {
        self.update(id, |store| store.set_graph_kind(id, kind))
    }

    pub fn set_title(&mut self, id: &GraphId, title: &str) -> AppResult<bool> {
        self.update(id, |store| store.set_graph_title(id, title))
    }

    pub fn toggle_filter(&mut self, id: &GraphId, category: i32, value: i32) -> AppResult<bool> {
        self.update(id, |store| store.toggle_filter(id, category, value))
    }

    pub fn set_breakdown(&mut self, id: &GraphId, categories: Vec<i32>) -> AppResult<bool> {
        self.update(id, |store| store.set_breakdown(id, categories))
    }

    pub fn patch(&mut self, id: &GraphId, patch: GraphPatch) -> AppResult<bool> {
        self.update(id, |store| store.update_graph(id, patch))
    }

    // ---- fetching ----

    /// Reload every selection list and the dataset of `id`.
    pub fn refresh(&mut self, id: &GraphId) -> AppResult<()> {
        let kind = self.store.must_get_graph(id)?.kind;
        for list in selection_lists(kind) {
            self.load_selection(id, *list)?;
        }
        self.refresh_dataset(id)
    }

    fn load_selection(&mut self, id: &GraphId, list: SelectionList) -> AppResult<()> {
        let graph = self.store.must_get_graph(id)?.clone();
        if graph.graph_db_file_path.is_none() {
            if let Some(panel) = self.panels.get_mut(id) {
                panel.selections.remove(&list);
                panel.selection_errors.remove(&list);
            }
            return Ok(());
        }

        let ticket = self.store.begin_request(id, RequestSlot::Selection(list));
        let result = charts::load_selection(&*self.gateway, &graph, list);
        if !self.store.finish_selection(&ticket) {
            return Ok(());
        }
        let panel = self.panels.entry(id.clone()).or_default();
        match result {
            Ok(values) => {
                panel.selection_errors.remove(&list);
                panel.selections.insert(list, values);
            }
            // A prerequisite selection is still empty, e.g. years before an asset.
            Err(e) if e.is_validation() => {
                debug!(graph = %id, ?list, error = %e, "selection list skipped");
                panel.selection_errors.remove(&list);
                panel.selections.remove(&list);
            }
            // Surfaced by the dataset step, which every list trigger also reaches.
            Err(e) => {
                warn!(graph = %id, ?list, error = %e, "selection list failed");
                panel.selections.remove(&list);
                panel.selection_errors.insert(list, e.to_string());
            }
        }
        Ok(())
    }

    fn selection_failure(&self, id: &GraphId) -> Option<String> {
        self.panels
            .get(id)
            .and_then(|p| p.selection_errors.values().next().cloned())
    }

    /// Start a dataset fetch if the chart is fully configured and its
    /// selection lists loaded, otherwise show the matching placeholder.
    /// Returns the ticket of a started fetch.
    ///
    /// Any fetch still in flight is retired when no new one starts.
    fn begin_dataset(&mut self, id: &GraphId) -> AppResult<Option<RequestTicket>> {
        let configured = ChartStatus::configured(self.store.must_get_graph(id)?);
        let failure = self.selection_failure(id);
        if failure.is_some() || !configured.is_ready() {
            self.store.cancel_dataset(id)?;
            if let Some(message) = failure {
                self.store.update_graph(id, GraphPatch::error(Some(message)))?;
            }
            if let Some(panel) = self.panels.get_mut(id) {
                panel.dataset = None;
            }
            self.rerender(id);
            return Ok(None);
        }
        let ticket = self.store.begin_dataset(id)?;
        self.rerender(id);
        Ok(Some(ticket))
    }

    /// Fetch the dataset of `id` on the calling thread.
    pub fn refresh_dataset(&mut self, id: &GraphId) -> AppResult<()> {
        let Some(ticket) = self.begin_dataset(id)? else {
            return Ok(());
        };
        let graph = self.store.must_get_graph(id)?.clone();
        let result = charts::fetch_dataset(&*self.gateway, &graph, &self.config);
        self.apply_dataset(ticket, result.map_err(|e| e.to_string()));
        Ok(())
    }

    /// Fetch the dataset of `id` on a worker thread; results are applied by
    /// [`Dashboard::poll_workers`]. Returns whether a fetch was started.
    pub fn refresh_in_background(&mut self, id: &GraphId) -> AppResult<bool> {
        let Some(ticket) = self.begin_dataset(id)? else {
            return Ok(false);
        };
        let graph = self.store.must_get_graph(id)?.clone();
        self.workers.push(FetchWorker::start(
            Arc::clone(&self.gateway),
            graph,
            self.config.clone(),
            ticket,
        ));
        Ok(true)
    }

    /// Apply every finished background fetch. Returns how many results were
    /// applied; stale ones are dropped.
    pub fn poll_workers(&mut self) -> usize {
        let mut applied = 0;
        let mut running = Vec::with_capacity(self.workers.len());
        for worker in std::mem::take(&mut self.workers) {
            let (ticket, result) = match worker.poll() {
                Ok(None) => {
                    running.push(worker);
                    continue;
                }
                Ok(Some(FetchMessage::Complete { ticket, dataset })) => (ticket, Ok(dataset)),
                Ok(Some(FetchMessage::Failed { ticket, message })) => (ticket, Err(message)),
                Err(message) => (worker.ticket().clone(), Err(message)),
            };
            if self.apply_dataset(ticket, result) {
                applied += 1;
            }
        }
        self.workers = running;
        applied
    }

    /// Block until every background fetch has finished and apply the results.
    pub fn wait_for_workers(&mut self) -> usize {
        let mut applied = 0;
        for worker in std::mem::take(&mut self.workers) {
            let fallback = worker.ticket().clone();
            let (ticket, result) = match worker.wait() {
                Ok(FetchMessage::Complete { ticket, dataset }) => (ticket, Ok(dataset)),
                Ok(FetchMessage::Failed { ticket, message }) => (ticket, Err(message)),
                Err(message) => (fallback, Err(message)),
            };
            if self.apply_dataset(ticket, result) {
                applied += 1;
            }
        }
        applied
    }

    pub fn pending_fetches(&self) -> usize {
        self.workers.len()
    }

    fn apply_dataset(&mut self, ticket: RequestTicket, result: Result<Dataset, String>) -> bool {
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        if !self.store.finish_dataset(&ticket, outcome) {
            return false;
        }
        let id = ticket.graph.clone();
        if let Some(panel) = self.panels.get_mut(&id) {
            panel.dataset = result.ok();
        }
        self.rerender(&id);
        true
    }

    /// Recompute what the panel of `id` shows from the chart status and the
    /// cached dataset.
    fn rerender(&mut self, id: &GraphId) {
        let Some(graph) = self.store.graph(id) else {
            return;
        };
        let panel = self.panels.entry(id.clone()).or_default();
        panel.rendered = match (graph.status().placeholder(), &panel.dataset) {
            (Some(placeholder), _) => RenderedChart::Placeholder(placeholder),
            (None, Some(dataset)) => RenderedChart::Options(charts::render(graph, dataset)),
            (None, None) => RenderedChart::Placeholder(Placeholder::Loading),
        };
    }
}

