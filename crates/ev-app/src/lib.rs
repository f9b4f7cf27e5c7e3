//! ev-app: dashboard orchestration for energy-model visualizations.
//!
//! Contains:
//! - Chart controllers that load selection lists, fetch datasets and render
//!   ECharts-style options per chart kind
//! - The [`Dashboard`], which routes edits through the store and refetches
//!   only what an edit invalidated
//! - Background fetch workers guarded by request tickets
//! - YAML configuration and opt-in tracing setup

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod telemetry;
pub mod worker;

pub use charts::{Dataset, RenderedChart, SelectionValues};
pub use config::{AppConfig, load_config, parse_config, save_config};
pub use dashboard::{Dashboard, PanelState};
pub use error::{AppError, AppResult};
pub use worker::{FetchMessage, FetchWorker};
