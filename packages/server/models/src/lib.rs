#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the ranch map server.
//!
//! These types are serialized to JSON for the dashboard. Field names are
//! `snake_case` because the existing dashboard reads them that way (e.g.
//! `soil_moisture`, `water_loc`), so unlike the internal types they are
//! frozen wire contracts.

use chrono::{DateTime, NaiveDateTime, Utc};
use ranch_map_geography_models::Coordinate;
use ranch_map_herd_models::{Alert, Position, Tally};
use serde::{Deserialize, Serialize};

/// Response from the herd poll endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CattleResponse {
    /// Every tracked animal after this poll's movement.
    pub cattle: Vec<Position>,
    /// Head count per region.
    pub counts: Tally,
    /// Density alerts (only for profiles with an alert threshold).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<ApiAlert>>,
    /// Heatmap points (only for profiles with a heatmap).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<Vec<HeatmapPoint>>,
    /// When this poll was taken.
    pub polled_at: DateTime<Utc>,
}

/// A density alert as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAlert {
    /// County (region) name.
    pub county: String,
    /// Human-readable reason.
    pub reason: String,
}

impl From<Alert> for ApiAlert {
    fn from(alert: Alert) -> Self {
        Self {
            county: alert.region,
            reason: alert.reason,
        }
    }
}

/// A heatmap sample, serialized as `[lat, lon, intensity]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint(pub f64, pub f64, pub f64);

impl HeatmapPoint {
    /// Sample at a position with a fixed intensity.
    #[must_use]
    pub const fn at(position: &Position, intensity: f64) -> Self {
        Self(position.lat, position.lon, intensity)
    }
}

/// Request body for the ranch analysis endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl AnalyzeRequest {
    /// The requested point.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Response from the ranch analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Synthetic vegetation index.
    pub ndvi: f64,
    /// Live soil moisture (m³/m³).
    pub soil_moisture: f64,
    /// Live air temperature (°C), when the profile requests it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Local time of the weather reading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<NaiveDateTime>,
    /// Distance to the nearest water source in km.
    pub dist_water: f64,
    /// Grazing recommendation.
    pub recommendation: String,
    /// Nearest water source.
    pub water_loc: Coordinate,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
}

impl ApiError {
    /// Wraps any displayable error.
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Active deployment profile.
    pub profile: String,
    /// Number of regions in the loaded catalog.
    pub region_count: usize,
}

/// Operator contact block shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    /// Operator name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Specialty line.
    pub specialty: String,
}
