//! Core data models shared by the session, the visualization layer and the SDK.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::geometry;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl LatLon {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Point where a simulated fire begins. At most one is active per session.
pub type FireOrigin = LatLon;

/// User-supplied inputs for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    /// Base wind speed in km/h
    pub wind_speed: f64,
    /// Share of built-up area, 0-100
    pub building_density: f64,
    pub time_steps: u32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            wind_speed: 15.0,
            building_density: 40.0,
            time_steps: 10,
        }
    }
}

impl SimulationParameters {
    pub fn validate(&self) -> Result<(), SessionError> {
        if !(self.wind_speed.is_finite() && self.wind_speed > 0.0) {
            return Err(SessionError::Validation(format!(
                "windSpeed must be greater than 0, got {}",
                self.wind_speed
            )));
        }
        if !(0.0..=100.0).contains(&self.building_density) {
            return Err(SessionError::Validation(format!(
                "buildingDensity must be within [0, 100], got {}",
                self.building_density
            )));
        }
        if self.time_steps < 1 {
            return Err(SessionError::Validation(
                "timeSteps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Pre-seed the wind speed from a weather report, rounded to a whole km/h.
    pub fn with_wind_from(mut self, weather: &WeatherReport) -> Self {
        let rounded = weather.wind_speed.round();
        if rounded.is_finite() && rounded > 0.0 {
            self.wind_speed = rounded;
        }
        self
    }
}

/// Body of `POST /api/simulate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub lat: f64,
    pub lon: f64,
    pub wind_speed: f64,
    pub building_density: f64,
    pub time_steps: u32,
}

impl SimulationRequest {
    pub fn new(origin: FireOrigin, parameters: &SimulationParameters) -> Self {
        Self {
            lat: origin.latitude,
            lon: origin.longitude,
            wind_speed: parameters.wind_speed,
            building_density: parameters.building_density,
            time_steps: parameters.time_steps,
        }
    }
}

/// Parameters echoed back (and derived) by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultParameters {
    #[serde(default)]
    pub base_wind: Option<f64>,
    /// Street-canyon adjusted wind speed in km/h
    pub urban_wind: f64,
    /// Spread rate in m/min
    pub spread_rate: f64,
    #[serde(default)]
    pub building_density: Option<f64>,
    pub time_steps: u32,
    /// Minutes between consecutive steps
    pub time_interval: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    /// Meters
    pub max_distance: f64,
    /// Minutes
    pub total_time: u32,
    /// Square meters
    #[serde(default)]
    pub affected_area: Option<f64>,
}

/// One time-stepped region of fire spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireZone {
    pub step: u32,
    /// Minutes since ignition
    pub time: u32,
    /// Meters from the origin
    pub distance: f64,
    /// Severity, nominally within [0, 1]. Not trusted.
    pub intensity: f64,
    pub perimeter: Vec<LatLon>,
}

/// Response payload of a successful simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub origin: Option<LatLon>,
    pub parameters: ResultParameters,
    pub summary: SimulationSummary,
    pub zones: Vec<FireZone>,
}

impl SimulationResult {
    /// Check the invariants the visualization layer relies on.
    ///
    /// Zone steps must be strictly increasing within `0..=timeSteps` and
    /// every perimeter must be a ring of at least three finite points.
    pub fn validate(&self) -> Result<(), String> {
        let mut previous: Option<u32> = None;
        for zone in &self.zones {
            if zone.step > self.parameters.time_steps {
                return Err(format!(
                    "zone step {} exceeds timeSteps {}",
                    zone.step, self.parameters.time_steps
                ));
            }
            if let Some(prev) = previous {
                if zone.step <= prev {
                    return Err(format!(
                        "zone steps must be strictly increasing ({} follows {})",
                        zone.step, prev
                    ));
                }
            }
            geometry::validate_ring(&zone.perimeter)
                .map_err(|reason| format!("zone {}: {}", zone.step, reason))?;
            previous = Some(zone.step);
        }
        Ok(())
    }

    /// Label for a time-window position: "Origin" at step 0, elapsed minutes otherwise.
    pub fn time_label(&self, step: u32) -> String {
        if step == 0 {
            "Origin".to_string()
        } else {
            format!("{} minutes", step.saturating_mul(self.parameters.time_interval))
        }
    }

    pub fn zone(&self, step: u32) -> Option<&FireZone> {
        self.zones.iter().find(|zone| zone.step == step)
    }
}

/// Current conditions from `GET /api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// Degrees Celsius
    pub temperature: f64,
    /// Percent
    pub humidity: f64,
    /// km/h
    pub wind_speed: f64,
    /// Degrees
    pub wind_direction: f64,
    pub description: String,
    pub location: String,
    pub source: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// hPa
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ring(center: LatLon) -> Vec<LatLon> {
        vec![
            LatLon::new(center.latitude + 0.001, center.longitude),
            LatLon::new(center.latitude, center.longitude + 0.001),
            LatLon::new(center.latitude - 0.001, center.longitude),
        ]
    }

    fn result_with_steps(steps: &[u32]) -> SimulationResult {
        let center = LatLon::new(34.0522, -118.2437);
        SimulationResult {
            origin: Some(center),
            parameters: ResultParameters {
                base_wind: Some(15.0),
                urban_wind: 19.4,
                spread_rate: 25.0,
                building_density: Some(40.0),
                time_steps: 10,
                time_interval: 5,
            },
            summary: SimulationSummary {
                max_distance: 1250.0,
                total_time: 50,
                affected_area: None,
            },
            zones: steps
                .iter()
                .map(|&step| FireZone {
                    step,
                    time: step * 5,
                    distance: f64::from(step) * 125.0,
                    intensity: 0.5,
                    perimeter: ring(center),
                })
                .collect(),
        }
    }

    #[test]
    fn default_parameters_are_valid() {
        assert!(SimulationParameters::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let cases = [
            SimulationParameters { wind_speed: 0.0, ..Default::default() },
            SimulationParameters { wind_speed: f64::NAN, ..Default::default() },
            SimulationParameters { building_density: 150.0, ..Default::default() },
            SimulationParameters { building_density: -1.0, ..Default::default() },
            SimulationParameters { time_steps: 0, ..Default::default() },
        ];
        for parameters in cases {
            assert!(
                matches!(parameters.validate(), Err(SessionError::Validation(_))),
                "{parameters:?} should be rejected"
            );
        }
    }

    #[test]
    fn request_serializes_with_backend_field_names() {
        let request = SimulationRequest::new(
            LatLon::new(34.0522, -118.2437),
            &SimulationParameters::default(),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "lat": 34.0522,
                "lon": -118.2437,
                "windSpeed": 15.0,
                "buildingDensity": 40.0,
                "timeSteps": 10
            })
        );
    }

    #[test]
    fn parses_backend_result_payload() {
        let payload = json!({
            "origin": {"lat": 34.0522, "lon": -118.2437},
            "parameters": {
                "baseWind": 15,
                "urbanWind": 19.4,
                "spreadRate": 97.561,
                "buildingDensity": 40,
                "timeSteps": 2,
                "timeInterval": 5
            },
            "zones": [
                {"step": 1, "time": 5, "distance": 487.8, "intensity": 0.75,
                 "perimeter": [{"lat": 34.05, "lon": -118.24}, {"lat": 34.06, "lon": -118.25}, {"lat": 34.04, "lon": -118.23}]},
                {"step": 2, "time": 10, "distance": 975.6, "intensity": 0.5,
                 "perimeter": [{"lat": 34.05, "lon": -118.24}, {"lat": 34.07, "lon": -118.26}, {"lat": 34.03, "lon": -118.22}]}
            ],
            "summary": {"totalTime": 10, "maxDistance": 975.61, "affectedArea": 2990183.12}
        });

        let result: SimulationResult = serde_json::from_value(payload).unwrap();
        assert_eq!(result.zones.len(), 2);
        assert_eq!(result.parameters.time_interval, 5);
        assert_eq!(result.summary.affected_area, Some(2990183.12));
        assert_eq!(result.zones[1].perimeter[1], LatLon::new(34.07, -118.26));
        assert!(result.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unordered_steps() {
        let result = result_with_steps(&[0, 2, 1]);
        let err = result.validate().unwrap_err();
        assert!(err.contains("strictly increasing"), "{err}");
    }

    #[test]
    fn validate_rejects_steps_beyond_time_steps() {
        let mut result = result_with_steps(&[0, 1, 2, 3, 4, 5]);
        result.parameters.time_steps = 2;
        let err = result.validate().unwrap_err();
        assert!(err.contains("exceeds timeSteps"), "{err}");

        result.parameters.time_steps = 5;
        assert!(result.validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_perimeter() {
        let mut result = result_with_steps(&[0, 1]);
        result.zones[1].perimeter.truncate(2);
        assert!(result.validate().is_err());
    }

    #[test]
    fn time_label_uses_interval() {
        let result = result_with_steps(&[0, 1, 2]);
        assert_eq!(result.time_label(0), "Origin");
        assert_eq!(result.time_label(3), "15 minutes");
    }

    #[test]
    fn weather_pre_seeds_rounded_wind_speed() {
        let weather: WeatherReport = serde_json::from_value(json!({
            "temperature": 22.4,
            "humidity": 45,
            "windSpeed": 18.6,
            "windDirection": 270,
            "description": "clear sky",
            "icon": "01d",
            "pressure": 1013,
            "location": "Los Angeles",
            "timestamp": "2024-06-01T12:30:00.123456",
            "source": "Mock Data (Add API key for real data)"
        }))
        .unwrap();

        assert!(weather.timestamp.is_some());
        let parameters = SimulationParameters::default().with_wind_from(&weather);
        assert_eq!(parameters.wind_speed, 19.0);
    }
}
