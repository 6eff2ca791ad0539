use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{config::parse_location, model::WeatherResponse, provider::ClientError};

use super::ForecastProvider;

/// Client for the WeatherAPI.com `forecast.json` resource.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    forecast_url: String,
    http: Client,
}

impl WeatherApiClient {
    /// `timeout` bounds connect, send and body read together.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { forecast_url: forecast_url(base_url), http })
    }
}

#[async_trait]
impl ForecastProvider for WeatherApiClient {
    async fn fetch_forecast(
        &self,
        api_key: &str,
        location: &str,
        days: u32,
    ) -> Result<WeatherResponse, ClientError> {
        if days < 1 {
            return Err(ClientError::InvalidRequest(format!(
                "day count must be at least 1, got {days}"
            )));
        }
        parse_location(location).map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        log::debug!("GET {} q={location} days={days}", self.forecast_url);

        let days_param = days.to_string();
        let res = self
            .http
            .get(&self.forecast_url)
            .query(&[("key", api_key), ("q", location), ("days", days_param.as_str())])
            .send()
            .await
            .map_err(ClientError::network)?;

        let status = res.status();
        let body = res.text().await.map_err(ClientError::network)?;

        if !status.is_success() {
            return Err(ClientError::Http { status, message: error_message(&body) });
        }

        let parsed: WeatherResponse = serde_json::from_str(&body)?;

        let received = parsed.forecast.forecast_day.len();
        if received != days as usize {
            log::warn!("Requested {days} forecast days, provider returned {received}");
        }
        log::debug!("Decoded forecast for {} ({received} days)", parsed.location.name);

        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaError,
}

#[derive(Debug, Deserialize)]
struct WaError {
    message: String,
}

fn forecast_url(base_url: &str) -> String {
    format!("{}/forecast.json", base_url.trim_end_matches('/'))
}

/// Provider error message if the body carries one, else the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<WaErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
