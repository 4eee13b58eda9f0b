//! HTTP client for scenario `api_call` steps

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use crate::models::HttpMethod;
use crate::utils::errors::Result;

/// Status and raw body of an external API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues outbound HTTP requests
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request; transport errors and timeouts are `Err`, any HTTP
    /// status is `Ok`
    async fn request(&self, method: HttpMethod, url: &str, body: Option<&Value>) -> Result<ApiResponse>;
}

/// reqwest-backed client with a bounded timeout
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a new client whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ScenarioBot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn request(&self, method: HttpMethod, url: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let url = url::Url::parse(url)?;
        debug!(method = %method, url = %url, has_body = body.is_some(), "Sending API request");

        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}
