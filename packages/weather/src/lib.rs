#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Live field conditions for ranch analysis.
//!
//! The [`WeatherProvider`] trait is the seam between the analyzer and the
//! outside world. [`open_meteo::OpenMeteoClient`] is the production
//! implementation; tests substitute their own.

pub mod open_meteo;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use ranch_map_geography_models::Coordinate;
use serde::Deserialize;
use thiserror::Error;

/// Current conditions at a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Volumetric soil moisture in the top centimeter (m³/m³).
    pub soil_moisture: f64,
    /// Air temperature at 2 m (°C), when requested.
    pub temperature: Option<f64>,
    /// Local observation time reported by the provider.
    pub observed_at: Option<NaiveDateTime>,
}

/// Errors from weather lookups.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Weather service returned {status}: {reason}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Provider-supplied reason, or the raw body.
        reason: String,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Weather client settings from the deployment profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeatherConfig {
    /// Forecast endpoint (e.g. `"https://api.open-meteo.com/v1/forecast"`).
    pub base_url: String,
    /// Whether to request air temperature alongside soil moisture.
    #[serde(default)]
    pub include_temperature: bool,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

/// Source of current field conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetches current conditions at `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] if the lookup fails.
    async fn current_conditions(
        &self,
        coordinate: Coordinate,
    ) -> Result<CurrentConditions, WeatherError>;
}
