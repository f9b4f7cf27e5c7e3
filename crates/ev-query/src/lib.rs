//! ev-query: typed query services over the native backend gateway.
//!
//! Contains:
//! - gateway (file picker and tabular RPC traits)
//! - table (row/value model of backend results)
//! - validation (checks run before any backend call)
//! - services (one module per domain: capacity, costs, prices, supply, flows, metadata, raw)
//! - memory (in-memory gateway and picker)

pub mod error;
pub mod gateway;
pub mod memory;
pub mod services;
pub mod table;
pub mod validation;

pub use error::{QueryError, QueryResult, ValidationError};
pub use gateway::{FilePicker, TableGateway};
pub use memory::{Call, MemoryGateway, StaticPicker};
pub use services::{MetadataScope, SeriesPoint};
pub use table::{Row, Value};
