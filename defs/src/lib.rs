mod api;
mod config;
mod errors;
mod payload;
mod secrets;

pub use api::{ApiClient, ApiResponse, Operation};
pub use config::{ApplicationOverrides, DeploymentMetadata, NormalizedConfig};
pub use errors::ActionError;
pub use payload::{DeployRequestBody, UpdateRequestBody};
pub use secrets::SecretRegistry;
