use serde::Serialize;

use crate::config::ApplicationOverrides;

/// Body of `application.update`: the target application plus every override that was set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestBody<'a> {
    pub application_id: &'a str,
    #[serde(flatten)]
    pub overrides: &'a ApplicationOverrides,
}

/// Body of `application.deploy`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequestBody<'a> {
    pub application_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}
