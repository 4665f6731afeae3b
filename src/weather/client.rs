//! Open-Meteo REST API Client
//!
//! HTTP client for the Open-Meteo current-weather endpoint.

use super::{classify_code, WeatherProvider, UNKNOWN_CONDITION};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Open-Meteo weather client
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

/// Configuration for the weather client
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Forecast endpoint (e.g., "https://api.open-meteo.com/v1/forecast")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            request_timeout_ms: 3000,
        }
    }
}

impl OpenMeteoClient {
    /// Create a new weather client with the given configuration
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch the raw WMO weather code for a location
    pub async fn current_weather_code(&self, lat: f64, lon: f64) -> Result<i64, WeatherError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Timeout
                } else if e.is_connect() {
                    WeatherError::Unavailable
                } else {
                    WeatherError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(WeatherError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: ForecastResponse = response.json().await.map_err(WeatherError::Request)?;
        Ok(body.current_weather.weathercode)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn classify(&self, lat: f64, lon: f64) -> String {
        match self.current_weather_code(lat, lon).await {
            Ok(code) => {
                let condition = classify_code(code);
                tracing::debug!(lat, lon, code, condition, "Weather lookup succeeded");
                condition.to_string()
            }
            Err(e) => {
                tracing::warn!(lat, lon, error = %e, "Weather lookup failed");
                UNKNOWN_CONDITION.to_string()
            }
        }
    }
}

// ============================================
// Response DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weathercode: i64,
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the weather service
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,
}
