use anyhow::{Context, Result};
use async_trait::async_trait;
use dokploy_defs::{ApiClient, ApiResponse};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;

const USER_AGENT: &str = "dokploy-redeploy-application";
const API_KEY_HEADER: &str = "x-api-key";

/// JSON client for the Dokploy API, authenticated with an API key.
pub struct DokployClient {
    client: reqwest::Client,
}

impl DokployClient {
    pub fn new(api_key: &str) -> Result<Self> {
        let mut api_key =
            HeaderValue::from_str(api_key).context("API key is not a valid header value")?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(DokployClient { client })
    }
}

#[async_trait]
impl ApiClient for DokployClient {
    async fn post_json(&self, url: &str, body: &Value) -> Result<ApiResponse> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context(format!("Failed to make request to {}", url))?;

        let status_code = response.status().as_u16();
        let text = response
            .text()
            .await
            .context(format!("Failed to read response from {}", url))?;
        debug!("response body: {}", text);

        Ok(parse_response(status_code, &text))
    }
}

fn parse_response(status_code: u16, text: &str) -> ApiResponse {
    if text.trim().is_empty() {
        return ApiResponse::new(status_code);
    }

    match serde_json::from_str::<Value>(text) {
        Ok(body) => ApiResponse::from_body(status_code, body),
        Err(_) => {
            let mut response = ApiResponse::new(status_code);
            // Proxies in front of Dokploy answer errors with plain text or HTML
            if !response.is_ok() {
                response.message = Some(text.trim().to_string());
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_response_empty_body() {
        assert_eq!(parse_response(200, ""), ApiResponse::new(200));
    }

    #[test]
    fn test_parse_response_plain_text_error() {
        let response = parse_response(502, "Bad Gateway\n");
        assert_eq!(response.message.as_deref(), Some("Bad Gateway"));
        assert_eq!(response.error_detail(), "Bad Gateway");
    }

    #[test]
    fn test_parse_response_plain_text_success() {
        let response = parse_response(200, "OK");
        assert_eq!(response.message, None);
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_post_json_sends_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/application.deploy"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", USER_AGENT))
            .and(body_json(json!({"applicationId": "app-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = DokployClient::new("test-api-key").unwrap();
        let url = format!("{}/api/application.deploy", mock_server.uri());
        let response = client
            .post_json(&url, &json!({"applicationId": "app-1"}))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, Some(json!(true)));
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_post_json_extracts_error_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/application.update"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Unauthorized",
                "code": "UNAUTHORIZED"
            })))
            .mount(&mock_server)
            .await;

        let client = DokployClient::new("wrong-key").unwrap();
        let url = format!("{}/api/application.update", mock_server.uri());
        let response = client
            .post_json(&url, &json!({"applicationId": "app-1"}))
            .await
            .unwrap();

        assert_eq!(response.status_code, 401);
        assert_eq!(response.message.as_deref(), Some("Unauthorized"));
        assert_eq!(response.error_detail(), "Unauthorized");
    }

    #[tokio::test]
    async fn test_post_json_transport_error() {
        let client = DokployClient::new("test-api-key").unwrap();
        let result = client
            .post_json("http://127.0.0.1:1/api/application.deploy", &json!({}))
            .await;

        let error = result.unwrap_err();
        assert!(error
            .to_string()
            .contains("Failed to make request to http://127.0.0.1:1/api/application.deploy"));
    }

    #[test]
    fn test_invalid_api_key_is_rejected() {
        assert!(DokployClient::new("bad\nkey").is_err());
    }
}
