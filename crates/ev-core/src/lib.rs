//! ev-core: shared vocabulary for the energy model visualizer.
//!
//! Contains:
//! - ids (graph and container identifiers)
//! - resolution (temporal bucket sizes for time-series aggregation)
//! - years (start/end year ranges with one consistency rule)
//! - filters (metadata-filter selections keyed by category)
//! - price (storage type / flow direction selectors)
//! - error (shared error types)

pub mod error;
pub mod filters;
pub mod ids;
pub mod price;
pub mod resolution;
pub mod years;

pub use error::{CoreError, CoreResult};
pub use filters::MetadataFilters;
pub use ids::{ContainerId, GraphId};
pub use price::{ALL_CARRIERS, FlowDirection, StorageType};
pub use resolution::Resolution;
pub use years::{RangeEdit, YearRange};
