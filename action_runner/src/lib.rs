use anyhow::Result;
use dokploy_defs::SecretRegistry;
use http_client::DokployClient;

mod inputs;
mod orchestrator;

pub use inputs::{normalize_inputs, InputNormalizer, RawInputs};
pub use orchestrator::{redeploy, DeploymentOutcome, DeploymentState, Orchestrator};

pub mod input_names {
    pub use crate::inputs::{
        API_KEY, APPLICATION_ID, CPU_LIMIT, CPU_RESERVATION, DEPLOYMENT_DESCRIPTION,
        DEPLOYMENT_TITLE, DOCKER_IMAGE, DOKPLOY_URL, ENV, MEMORY_LIMIT, MEMORY_RESERVATION, NAME,
        REGISTRY_PASSWORD, REGISTRY_URL, REGISTRY_USERNAME, REPLICAS, ROLLBACK_ACTIVE,
    };
}

/// Name of the step output carrying the deployed application id.
pub const APPLICATION_ID_OUTPUT: &str = "application-id";

/// Normalizes the inputs, then updates and deploys the application through
/// the Dokploy API. Validation failures return before any request is made.
pub async fn run_action(
    inputs: &RawInputs,
    secrets: &dyn SecretRegistry,
) -> Result<DeploymentOutcome> {
    let config = normalize_inputs(inputs, secrets)?;
    let client = DokployClient::new(&config.api_key)?;
    let outcome = redeploy(&config, &client).await?;
    Ok(outcome)
}
