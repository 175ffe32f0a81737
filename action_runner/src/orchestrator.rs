use dokploy_defs::{
    ActionError, ApiClient, ApiResponse, DeployRequestBody, NormalizedConfig, Operation,
    UpdateRequestBody,
};
use log::{debug, info};
use serde::Serialize;

/// Progress of a single run. Transitions only move forward; `UpdateFailed`
/// and `DeployFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentState {
    Start,
    UpdateSkipped,
    UpdateInFlight,
    UpdateSucceeded,
    UpdateFailed,
    DeployInFlight,
    DeploySucceeded,
    DeployFailed,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub application_id: String,
    /// Whether `application.update` was called before deploying.
    pub updated: bool,
}

/// Applies the configured overrides (if any) and then deploys the application.
pub struct Orchestrator<'a> {
    config: &'a NormalizedConfig,
    client: &'a dyn ApiClient,
    state: DeploymentState,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a NormalizedConfig, client: &'a dyn ApiClient) -> Self {
        Orchestrator {
            config,
            client,
            state: DeploymentState::Start,
        }
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    pub async fn run(&mut self) -> Result<DeploymentOutcome, ActionError> {
        let config = self.config;
        let application_id = config.application_id.as_str();

        let updated = if config.overrides.is_empty() {
            info!("No update parameters provided, skipping update.");
            self.transition(DeploymentState::UpdateSkipped);
            false
        } else {
            info!("Updating application '{}'...", application_id);
            self.transition(DeploymentState::UpdateInFlight);

            let body = UpdateRequestBody {
                application_id,
                overrides: &config.overrides,
            };
            if let Err(e) = self.post(Operation::UpdateApplication, &body).await {
                self.transition(DeploymentState::UpdateFailed);
                return Err(e);
            }

            self.transition(DeploymentState::UpdateSucceeded);
            info!("Application '{}' updated.", application_id);
            true
        };

        info!("Deploying application '{}'...", application_id);
        self.transition(DeploymentState::DeployInFlight);

        let body = DeployRequestBody {
            application_id,
            title: config.deployment.title.as_deref(),
            description: config.deployment.description.as_deref(),
        };
        if let Err(e) = self.post(Operation::DeployApplication, &body).await {
            self.transition(DeploymentState::DeployFailed);
            return Err(e);
        }

        self.transition(DeploymentState::DeploySucceeded);
        info!("Application '{}' deployed.", application_id);

        self.transition(DeploymentState::Done);
        Ok(DeploymentOutcome {
            application_id: application_id.to_string(),
            updated,
        })
    }

    fn transition(&mut self, next: DeploymentState) {
        debug!("deployment state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    async fn post<T: Serialize>(
        &self,
        operation: Operation,
        body: &T,
    ) -> Result<ApiResponse, ActionError> {
        let url = self.config.endpoint(operation.procedure());
        let body = serde_json::to_value(body).map_err(|e| ActionError::RequestFailed {
            operation,
            source: e.into(),
        })?;

        debug!("{}: {}", operation, url);
        debug!(
            "request body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );

        let response = self
            .client
            .post_json(&url, &body)
            .await
            .map_err(|source| ActionError::RequestFailed { operation, source })?;
        debug!("response status: {}", response.status_code);

        if !response.is_ok() {
            return Err(ActionError::RemoteCallFailed {
                operation,
                status_code: response.status_code,
                detail: response.error_detail(),
            });
        }

        Ok(response)
    }
}

pub async fn redeploy(
    config: &NormalizedConfig,
    client: &dyn ApiClient,
) -> Result<DeploymentOutcome, ActionError> {
    Orchestrator::new(config, client).run().await
}
