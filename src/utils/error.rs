use crate::domain::model::OperationState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("positioning service is disabled")]
    ServiceDisabled,

    #[error("location authorization is denied or restricted")]
    MissingAuthorization,

    #[error("unsupported request: {reason}")]
    Unsupported { reason: String },

    #[error("region '{identifier}' already has a pending watch")]
    DuplicateRegion { identifier: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("geocoding provider returned status '{status}'")]
    Provider { status: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("platform error: {message}")]
    Platform { message: String },

    #[error("invalid operation transition from state {from:?}")]
    InvalidTransition { from: OperationState },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing configuration field: {field}")]
    MissingConfig { field: String },

    #[error("invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, LocationError>;
