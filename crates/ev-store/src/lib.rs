//! ev-store: client-side visualization state.
//!
//! Holds the registry of loaded databases and the chart configurations that
//! read from them. All mutations go through [`VisualizationStore`], which
//! publishes immutable snapshots and notifies slice subscribers.

pub mod error;
pub mod graph;
pub mod kind;
pub mod options;
pub mod requests;
pub mod state;
pub mod status;
pub mod store;
pub mod subscription;
pub mod triggers;

pub use error::{StoreError, StoreResult};
pub use graph::{GraphConfig, GraphPatch};
pub use kind::ChartKind;
pub use options::{
    CapacityOptions, ChartOptions, EnergyFlowOptions, MissingOption, OptionEdit, PriceOptions,
    RawSource, RawTableOptions, StoragePriceOptions, SupplyOptions, TransportPriceOptions,
};
pub use requests::{RequestSlot, RequestTicket, RequestTracker};
pub use state::StoreState;
pub use status::{ChartStatus, Placeholder};
pub use store::VisualizationStore;
pub use subscription::{Slice, SubscriptionId};
pub use triggers::{
    SelectionList, TriggerField, changed_fields, dataset_triggers, needs_dataset_refetch,
    selection_lists, selection_triggers, stale_selection_lists,
};
