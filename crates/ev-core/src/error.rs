use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unsupported resolution: {value} (expected hours, days, weeks, months or years)")]
    UnsupportedResolution { value: String },

    #[error("Invalid {what}: {value}")]
    InvalidSelector { what: &'static str, value: String },

    #[error("Invalid identifier: {what}")]
    InvalidId { what: String },
}
