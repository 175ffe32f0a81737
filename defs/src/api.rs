use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// The two calls made against the Dokploy API during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    UpdateApplication,
    DeployApplication,
}

impl Operation {
    /// Procedure name as exposed under `/api/` by Dokploy.
    pub fn procedure(&self) -> &'static str {
        match self {
            Operation::UpdateApplication => "application.update",
            Operation::DeployApplication => "application.deploy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::UpdateApplication => write!(f, "updating application"),
            Operation::DeployApplication => write!(f, "deploying application"),
        }
    }
}

/// Minimal view of a Dokploy response: the status code plus whatever error
/// detail the body carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub message: Option<String>,
    pub error_message: Option<String>,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status_code: u16) -> Self {
        ApiResponse {
            status_code,
            ..Default::default()
        }
    }

    /// Builds a response from a decoded JSON body, picking up the `message`
    /// and `errorMessage` fields when they hold non-empty strings.
    pub fn from_body(status_code: u16, body: Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        ApiResponse {
            status_code,
            message: field("message"),
            error_message: field("errorMessage"),
            body: Some(body),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    /// Best available explanation for a failed call, falling back to the
    /// status code when the body had nothing to say.
    pub fn error_detail(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error_message.clone())
            .unwrap_or_else(|| self.status_code.to_string())
    }
}

#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse, anyhow::Error>;
}
