use ev_core::GraphId;

use crate::kind::ChartKind;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Graph not found: {id}")]
    GraphNotFound { id: GraphId },

    #[error("Options of kind '{options}' do not fit a '{kind}' chart")]
    OptionsKindMismatch { kind: ChartKind, options: ChartKind },

    #[error("Option '{edit}' does not apply to a '{kind}' chart")]
    EditNotApplicable { kind: ChartKind, edit: &'static str },

    #[error("Database not registered: {path}")]
    UnknownDatabase { path: String },
}
