use crate::{
    config::RunwareConfig,
    error::{Result, RunwareError},
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

/// Sends a serialized task batch and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, body: String) -> Result<String>;
}

/// reqwest-backed transport with bearer auth against a fixed endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    api_url: String,
}

impl HttpTransport {
    pub fn new(config: &RunwareConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RunwareError::Config("Runware API key is not set".into()))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| RunwareError::Config(format!("invalid API key: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RunwareError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: String) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Runware request failed before a response arrived: {}", e);
                RunwareError::Connection(Box::new(e))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RunwareError::Connection(Box::new(e)))?;

        if !status.is_success() {
            log::error!("Runware API returned {}: {}", status, text);
            return Err(RunwareError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
