//! HTTP Transport
//!
//! `reqwest`-backed transport against the Everlive REST API.

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::config::ClientConfig;
use crate::error::{GroceryError, GroceryResult};

pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// `base_url` must end in `/` for relative paths to join beneath it
    pub fn new(base_url: Url, timeout: Duration) -> GroceryResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GroceryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> GroceryResult<Self> {
        Self::new(config.base_url()?, config.request_timeout())
    }

    fn url(&self, path: &str) -> GroceryResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GroceryError::Config(format!("invalid request path {:?}: {}", path, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> GroceryResult<ApiResponse> {
        let url = self.url(&request.path)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            // Also sets `Content-Type: application/json`
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(ApiResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}
