use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    model::WeatherResponse,
    repository::{FetchError, WeatherRepository},
};

/// The operation the projector runs on every fetch.
#[async_trait]
pub trait FetchForecast: Send + Sync {
    async fn call(&self) -> Result<WeatherResponse, FetchError>;
}

/// Delegates straight to the repository.
#[derive(Clone)]
pub struct GetWeatherForecast {
    repository: Arc<dyn WeatherRepository>,
}

impl GetWeatherForecast {
    pub fn new(repository: Arc<dyn WeatherRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FetchForecast for GetWeatherForecast {
    async fn call(&self) -> Result<WeatherResponse, FetchError> {
        self.repository.get_weather_forecast().await
    }
}
