use crate::{Config, WeatherResponse, provider::weatherapi::WeatherApiClient};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// Failure of a single forecast request.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response was obtained: DNS, refused connection, timeout.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },

    /// The body does not match the expected structure.
    #[error("failed to decode forecast response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rejected before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// The request URL carries the API key, so it is stripped before wrapping.
    pub fn network(e: reqwest::Error) -> Self {
        ClientError::Network(e.without_url())
    }


    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Network(e) if e.is_timeout())
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// One GET of the forecast resource. No retries.
    async fn fetch_forecast(
        &self,
        api_key: &str,
        location: &str,
        days: u32,
    ) -> Result<WeatherResponse, ClientError>;
}

/// Construct the forecast client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn ForecastProvider>> {
    let client = WeatherApiClient::new(&config.base_url, config.timeout())
        .context("Failed to build HTTP client")?;

    Ok(Arc::new(client))
}
