use std::collections::HashMap;
use std::env;

use dokploy_defs::{
    ActionError, ApplicationOverrides, DeploymentMetadata, NormalizedConfig, SecretRegistry,
};

pub const DOKPLOY_URL: &str = "dokploy-url";
pub const API_KEY: &str = "api-key";
pub const APPLICATION_ID: &str = "application-id";
pub const NAME: &str = "name";
pub const ENV: &str = "env";
pub const REGISTRY_URL: &str = "registry-url";
pub const REGISTRY_USERNAME: &str = "registry-username";
pub const REGISTRY_PASSWORD: &str = "registry-password";
pub const DOCKER_IMAGE: &str = "docker-image";
pub const MEMORY_RESERVATION: &str = "memory-reservation";
pub const MEMORY_LIMIT: &str = "memory-limit";
pub const CPU_RESERVATION: &str = "cpu-reservation";
pub const CPU_LIMIT: &str = "cpu-limit";
pub const REPLICAS: &str = "replicas";
pub const ROLLBACK_ACTIVE: &str = "rollback-active";
pub const DEPLOYMENT_TITLE: &str = "deployment-title";
pub const DEPLOYMENT_DESCRIPTION: &str = "deployment-description";

const ENV_PREFIX: &str = "INPUT_";

/// Step inputs as plain strings, keyed the way the runner exposes them
/// (`dokploy-url` is read from `INPUT_DOKPLOY-URL`).
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    values: HashMap<String, String>,
}

impl RawInputs {
    pub fn from_env() -> Self {
        env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_string(), value))
            })
            .collect()
    }

    /// Trimmed value of an input; empty and missing inputs are both `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&input_key(key))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawInputs {
            values: iter
                .into_iter()
                .map(|(key, value)| (input_key(key.as_ref()), value.into()))
                .collect(),
        }
    }
}

fn input_key(name: &str) -> String {
    name.replace(' ', "_").to_uppercase()
}

/// Turns raw inputs into a [`NormalizedConfig`], registering sensitive values
/// with the secret registry as soon as they are read.
pub struct InputNormalizer<'a> {
    inputs: &'a RawInputs,
    secrets: &'a dyn SecretRegistry,
}

impl<'a> InputNormalizer<'a> {
    pub fn new(inputs: &'a RawInputs, secrets: &'a dyn SecretRegistry) -> Self {
        InputNormalizer { inputs, secrets }
    }

    pub fn parse_required_string(&self, key: &str) -> Result<String, ActionError> {
        self.inputs
            .get(key)
            .map(|value| value.to_string())
            .ok_or_else(|| ActionError::MissingRequiredInput(key.to_string()))
    }

    pub fn parse_optional_string(&self, key: &str) -> Option<String> {
        self.inputs.get(key).map(|value| value.to_string())
    }

    /// Like [`Self::parse_optional_string`], registering the value as a secret.
    pub fn parse_optional_secret(&self, key: &str) -> Option<String> {
        let value = self.parse_optional_string(key);
        if let Some(secret) = &value {
            self.secrets.register_secret(secret);
        }
        value
    }

    pub fn parse_integer(&self, key: &str, name: &str) -> Result<Option<i64>, ActionError> {
        let Some(value) = self.inputs.get(key) else {
            return Ok(None);
        };

        parse_leading_integer(value)
            .map(Some)
            .ok_or_else(|| ActionError::InvalidIntegerInput {
                field: name.to_string(),
                value: value.to_string(),
            })
    }

    pub fn parse_boolean(&self, key: &str) -> Result<Option<bool>, ActionError> {
        let Some(value) = self.inputs.get(key) else {
            return Ok(None);
        };

        match value.to_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(ActionError::InvalidBooleanInput {
                field: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn normalize(&self) -> Result<NormalizedConfig, ActionError> {
        let dokploy_url = strip_trailing_slash(&self.parse_required_string(DOKPLOY_URL)?);

        let api_key = self.parse_required_string(API_KEY)?;
        self.secrets.register_secret(&api_key);

        let application_id = self.parse_required_string(APPLICATION_ID)?;

        let registry_username = self.parse_optional_secret(REGISTRY_USERNAME);
        let registry_password = self.parse_optional_secret(REGISTRY_PASSWORD);

        let overrides = ApplicationOverrides {
            name: self.parse_optional_string(NAME),
            env: self.parse_optional_string(ENV),
            rollback_active: self.parse_boolean(ROLLBACK_ACTIVE)?,
            memory_reservation: self.parse_optional_string(MEMORY_RESERVATION),
            memory_limit: self.parse_optional_string(MEMORY_LIMIT),
            cpu_reservation: self.parse_optional_string(CPU_RESERVATION),
            cpu_limit: self.parse_optional_string(CPU_LIMIT),
            registry_url: self.parse_optional_string(REGISTRY_URL),
            registry_username,
            registry_password,
            docker_image: self.parse_optional_string(DOCKER_IMAGE),
            replicas: self.parse_integer(REPLICAS, REPLICAS)?,
        };

        let deployment = DeploymentMetadata {
            title: self.parse_optional_string(DEPLOYMENT_TITLE),
            description: self.parse_optional_string(DEPLOYMENT_DESCRIPTION),
        };

        Ok(NormalizedConfig {
            dokploy_url,
            api_key,
            application_id,
            overrides,
            deployment,
        })
    }
}

pub fn normalize_inputs(
    inputs: &RawInputs,
    secrets: &dyn SecretRegistry,
) -> Result<NormalizedConfig, ActionError> {
    InputNormalizer::new(inputs, secrets).normalize()
}

/// Parses the leading base-10 integer of `value`, ignoring anything after
/// the digits (`"3 replicas"` is 3). `None` when there are no digits.
fn parse_leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, rest) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value.strip_prefix('+').unwrap_or(value)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    format!("{}{}", sign, &rest[..end]).parse().ok()
}

fn strip_trailing_slash(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}
