//! CLI configuration from environment.

use std::env;
use std::time::Duration;

use firesim_core::LatLon;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub default_location: LatLon,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Missing or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_f64 = |key: &str, default: f64| {
            lookup(key)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .unwrap_or(default)
        };

        Self {
            api_url: lookup("FIRESIM_API_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "http://localhost:5001".to_string()),
            request_timeout: Duration::from_secs(
                lookup("FIRESIM_REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(30),
            ),
            default_location: LatLon::new(
                parse_f64("FIRESIM_DEFAULT_LAT", 34.0522),
                parse_f64("FIRESIM_DEFAULT_LON", -118.2437),
            ),
        }
    }
}
