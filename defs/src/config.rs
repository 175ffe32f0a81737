use std::fmt;

use serde::Serialize;

const REDACTED: &str = "***";

/// Typed configuration for a single run, derived once from the raw inputs.
#[derive(Clone, PartialEq, Eq)]
pub struct NormalizedConfig {
    /// Base URL of the Dokploy instance, without a trailing slash.
    pub dokploy_url: String,
    pub api_key: String,
    pub application_id: String,
    pub overrides: ApplicationOverrides,
    pub deployment: DeploymentMetadata,
}

impl NormalizedConfig {
    /// Full URL of an API procedure, e.g. `application.deploy`.
    pub fn endpoint(&self, procedure: &str) -> String {
        format!("{}/api/{}", self.dokploy_url, procedure)
    }
}

impl fmt::Debug for NormalizedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedConfig")
            .field("dokploy_url", &self.dokploy_url)
            .field("api_key", &REDACTED)
            .field("application_id", &self.application_id)
            .field("overrides", &self.overrides)
            .field("deployment", &self.deployment)
            .finish()
    }
}

/// Application settings to change before deploying. Serializes to the
/// field names of Dokploy's `application.update` procedure; unset fields
/// are left out of the payload entirely.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
    #[serde(rename = "username", skip_serializing_if = "Option::is_none")]
    pub registry_username: Option<String>,
    #[serde(rename = "password", skip_serializing_if = "Option::is_none")]
    pub registry_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i64>,
}

impl ApplicationOverrides {
    /// True when no override was provided, in which case the update call is skipped.
    pub fn is_empty(&self) -> bool {
        *self == ApplicationOverrides::default()
    }
}

impl fmt::Debug for ApplicationOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| REDACTED);

        f.debug_struct("ApplicationOverrides")
            .field("name", &self.name)
            .field("env", &self.env)
            .field("rollback_active", &self.rollback_active)
            .field("memory_reservation", &self.memory_reservation)
            .field("memory_limit", &self.memory_limit)
            .field("cpu_reservation", &self.cpu_reservation)
            .field("cpu_limit", &self.cpu_limit)
            .field("registry_url", &self.registry_url)
            .field("registry_username", &redact(&self.registry_username))
            .field("registry_password", &redact(&self.registry_password))
            .field("docker_image", &self.docker_image)
            .field("replicas", &self.replicas)
            .finish()
    }
}

/// Metadata attached to the deployment record, never to the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn config() -> NormalizedConfig {
        NormalizedConfig {
            dokploy_url: "https://dokploy.example.com".to_string(),
            api_key: "super-secret-key".to_string(),
            application_id: "app-123".to_string(),
            overrides: ApplicationOverrides::default(),
            deployment: DeploymentMetadata::default(),
        }
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            config().endpoint("application.update"),
            "https://dokploy.example.com/api/application.update"
        );
    }

    #[test]
    fn test_empty_overrides() {
        let mut overrides = ApplicationOverrides::default();
        assert!(overrides.is_empty());

        overrides.rollback_active = Some(false);
        assert!(!overrides.is_empty());
    }

    #[test]
    fn test_overrides_serialize_only_present_fields() {
        let overrides = ApplicationOverrides {
            docker_image: Some("nginx:1.27".to_string()),
            registry_username: Some("deployer".to_string()),
            replicas: Some(2),
            ..Default::default()
        };
        let value = serde_json::to_value(&overrides).unwrap();
        assert_eq!(
            value,
            json!({"dockerImage": "nginx:1.27", "username": "deployer", "replicas": 2})
        );
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let mut config = config();
        config.overrides.registry_password = Some("hunter2".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("app-123"));
    }
}
