use thiserror::Error;

use crate::api::Operation;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Input required and not supplied: {0}")]
    MissingRequiredInput(String),

    #[error("{field} must be a valid number, got: {value}")]
    InvalidIntegerInput { field: String, value: String },

    #[error("{field}: expected 'true' or 'false', got: {value}")]
    InvalidBooleanInput { field: String, value: String },

    #[error("{operation} failed with status code {status_code}: {detail}")]
    RemoteCallFailed {
        operation: Operation,
        status_code: u16,
        detail: String,
    },

    #[error("{operation} failed: {source}")]
    RequestFailed {
        operation: Operation,
        #[source]
        source: anyhow::Error,
    },
}
