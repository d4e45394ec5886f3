//! HTTP client for the fire simulation backend.

use std::time::Duration;

use anyhow::{Context, Result};
use firesim_core::{
    BackendError, SimulationBackend, SimulationRequest, SimulationResult, WeatherReport,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Applied to every request unless the caller picks another timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `{success, data?, error?}` wrapper used by every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success: false` into a rejection.
    pub fn into_result(self) -> Result<T, BackendError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(BackendError::Decode(
                "successful response without data".to_string(),
            )),
            (false, _) => Err(BackendError::Rejected(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

/// Client for the simulation backend.
#[derive(Debug, Clone)]
pub struct FireSimClient {
    base_url: String,
    client: Client,
}

impl FireSimClient {
    /// Create a client with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    ///
    /// Expired requests surface as [`BackendError::Network`].
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the backend is up.
    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        let url = format!("{}/api/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(network)?;
        let status = response.status();
        let body = response.text().await.map_err(network)?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: body,
            });
        }
        serde_json::from_str(&body).map_err(|err| BackendError::Decode(err.to_string()))
    }

    /// Fetch current weather for a location.
    pub async fn weather(&self, lat: f64, lon: f64) -> Result<WeatherReport, BackendError> {
        let url = format!("{}/api/weather", self.base_url);
        debug!(lat, lon, "fetching weather");
        let response = self
            .client
            .get(&url)
            .query(&[("lat", lat), ("lon", lon)])
            .send()
            .await
            .map_err(network)?;
        read_envelope(response).await
    }

    /// Run a simulation for `request`.
    pub async fn run_simulation(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, BackendError> {
        let url = format!("{}/api/simulate", self.base_url);
        debug!(lat = request.lat, lon = request.lon, "posting simulation request");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(network)?;
        read_envelope(response).await
    }
}

impl SimulationBackend for FireSimClient {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, BackendError> {
        self.run_simulation(request).await
    }
}

fn network(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Network(format!("request timed out: {}", err))
    } else {
        BackendError::Network(err.to_string())
    }
}

async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await.map_err(network)?;

    if !status.is_success() {
        // Failure responses usually still carry `{success: false, error}`.
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or(body);
        return Err(BackendError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: ApiEnvelope<T> =
        serde_json::from_str(&body).map_err(|err| BackendError::Decode(err.to_string()))?;
    envelope.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_failure_carries_backend_message() {
        let envelope: ApiEnvelope<SimulationResult> =
            serde_json::from_value(json!({"success": false, "error": "model diverged"})).unwrap();
        assert_eq!(
            envelope.into_result().unwrap_err(),
            BackendError::Rejected("model diverged".to_string())
        );
    }

    #[test]
    fn envelope_failure_without_message_is_unknown() {
        let envelope: ApiEnvelope<WeatherReport> =
            serde_json::from_value(json!({"success": false})).unwrap();
        assert_eq!(
            envelope.into_result().unwrap_err(),
            BackendError::Rejected("Unknown error".to_string())
        );
    }

    #[test]
    fn envelope_success_without_data_is_malformed() {
        let envelope: ApiEnvelope<WeatherReport> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert!(matches!(
            envelope.into_result(),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn envelope_decodes_payload_types_without_default() {
        let envelope: ApiEnvelope<WeatherReport> = serde_json::from_value(json!({
            "success": true,
            "data": {
                "temperature": 21.0,
                "humidity": 50,
                "windSpeed": 12.2,
                "windDirection": 90,
                "description": "haze",
                "location": "Los Angeles",
                "source": "OpenWeatherMap API"
            }
        }))
        .unwrap();
        let weather = envelope.into_result().unwrap();
        assert_eq!(weather.description, "haze");
        assert!(weather.icon.is_none());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = FireSimClient::new("http://localhost:5001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001");
    }
}
