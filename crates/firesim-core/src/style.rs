//! Presentation styles derived from zone intensity.

use serde::{Deserialize, Serialize};

/// Hue used for the least severe zones (yellow). The most severe zones are red (0°).
pub const MAX_HUE_DEG: f64 = 60.0;
pub const BASE_FILL_OPACITY: f64 = 0.3;
pub const FILL_OPACITY_RANGE: f64 = 0.3;
pub const STROKE_WEIGHT: f64 = 2.0;
pub const STROKE_OPACITY: f64 = 0.8;

/// Clamp an untrusted intensity into [0, 1]. NaN is treated as 0.
pub fn clamp_intensity(intensity: f64) -> f64 {
    if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    }
}

/// Polygon style for a single fire zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneStyle {
    /// Clamped intensity the style was derived from
    pub intensity: f64,
    pub hue_deg: f64,
    pub fill_opacity: f64,
    pub stroke_weight: f64,
    pub stroke_opacity: f64,
}

impl ZoneStyle {
    pub fn for_intensity(intensity: f64) -> Self {
        let intensity = clamp_intensity(intensity);
        Self {
            intensity,
            hue_deg: (1.0 - intensity) * MAX_HUE_DEG,
            fill_opacity: BASE_FILL_OPACITY + FILL_OPACITY_RANGE * intensity,
            stroke_weight: STROKE_WEIGHT,
            stroke_opacity: STROKE_OPACITY,
        }
    }

    /// CSS color at full saturation and 50% lightness. Used for both stroke and fill.
    pub fn color(&self) -> String {
        format!("hsl({:.0}, 100%, 50%)", self.hue_deg)
    }
}

/// Rendering options for the aggregated heat overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatOptions {
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u32,
    pub max: f64,
    /// (stop, color) pairs in ascending stop order
    pub gradient: Vec<(f64, String)>,
}

impl Default for HeatOptions {
    fn default() -> Self {
        Self {
            radius: 25,
            blur: 35,
            max_zoom: 17,
            max: 1.0,
            gradient: vec![
                (0.0, "yellow".to_string()),
                (0.5, "orange".to_string()),
                (1.0, "red".to_string()),
            ],
        }
    }
}
