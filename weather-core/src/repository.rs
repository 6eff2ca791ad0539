use async_trait::async_trait;
use std::sync::Arc;

use crate::{config::ForecastQuery, model::WeatherResponse, provider::ForecastProvider};

/// Opaque fetch failure; only the message survives the repository boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[async_trait]
pub trait WeatherRepository: Send + Sync {
    async fn get_weather_forecast(&self) -> Result<WeatherResponse, FetchError>;
}

/// Runs each forecast request on its own task and folds every failure into [`FetchError`].
#[derive(Debug, Clone)]
pub struct ForecastRepository {
    provider: Arc<dyn ForecastProvider>,
    query: ForecastQuery,
}

impl ForecastRepository {
    pub fn new(provider: Arc<dyn ForecastProvider>, query: ForecastQuery) -> Self {
        Self { provider, query }
    }
}

#[async_trait]
impl WeatherRepository for ForecastRepository {
    async fn get_weather_forecast(&self) -> Result<WeatherResponse, FetchError> {
        let provider = Arc::clone(&self.provider);
        let query = self.query.clone();

        let task = tokio::spawn(async move {
            provider.fetch_forecast(&query.api_key, &query.location, query.days).await
        });

        match task.await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                log::warn!("Forecast request failed: {e}");
                Err(FetchError::new(e.to_string()))
            }
            Err(e) => {
                log::error!("Forecast task did not complete: {e}");
                Err(FetchError::new(e.to_string()))
            }
        }
    }
}
