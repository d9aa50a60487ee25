#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ranch analysis for a single map coordinate.
//!
//! Combines a live soil moisture reading with a synthetic vegetation index
//! (NDVI) and the distance to a nominal water source, then turns the NDVI
//! into a grazing recommendation. The NDVI is a uniform random draw, not a
//! remote-sensing measurement; the random source is supplied by the caller.

use chrono::NaiveDateTime;
use ranch_map_geography::distance::{DistanceExt as _, round_hundredths};
use ranch_map_geography_models::Coordinate;
use ranch_map_weather::{WeatherError, WeatherProvider};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// Lower bound of the synthetic NDVI draw.
pub const NDVI_MIN: f64 = 0.1;

/// Upper bound of the synthetic NDVI draw.
pub const NDVI_MAX: f64 = 0.9;

/// NDVI above which the current pasture is considered good.
pub const OPTIMAL_NDVI: f64 = 0.5;

/// Offset in degrees (both axes) from the query point to the nominal
/// nearest water source.
pub const WATER_OFFSET_DEG: f64 = 0.005;

/// Grazing recommendation derived from NDVI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum Recommendation {
    /// Vegetation is healthy enough to keep grazing here.
    #[serde(rename = "Optimal Grazing")]
    #[strum(serialize = "Optimal Grazing")]
    OptimalGrazing,
    /// Vegetation is sparse; rotate to fresh pasture.
    #[serde(rename = "Move Herd to New Pasture")]
    #[strum(serialize = "Move Herd to New Pasture")]
    MoveHerd,
}

impl Recommendation {
    /// Recommendation for a given NDVI.
    #[must_use]
    pub fn for_ndvi(ndvi: f64) -> Self {
        if ndvi > OPTIMAL_NDVI {
            Self::OptimalGrazing
        } else {
            Self::MoveHerd
        }
    }
}

/// Composed analysis for one coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct RanchAnalysis {
    /// Synthetic NDVI in `[0.1, 0.9]`, two decimals.
    pub ndvi: f64,
    /// Live soil moisture reading.
    pub soil_moisture: f64,
    /// Live air temperature, when the provider was asked for it.
    pub temperature: Option<f64>,
    /// Local time of the weather reading, when the provider reports one.
    pub observed_at: Option<NaiveDateTime>,
    /// Nominal nearest water source.
    pub water_location: Coordinate,
    /// Haversine distance to the water source in km, two decimals.
    pub distance_to_water_km: f64,
    /// Grazing recommendation from the NDVI.
    pub recommendation: Recommendation,
}

/// Errors from ranch analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The coordinate is outside the WGS84 ranges.
    #[error(
        "Invalid coordinate {coordinate}: latitude must be in [-90, 90] and longitude in [-180, 180]"
    )]
    InvalidCoordinate {
        /// The rejected coordinate.
        coordinate: Coordinate,
    },

    /// The weather lookup failed.
    #[error(transparent)]
    Weather(#[from] WeatherError),
}

impl AnalysisError {
    /// Whether the caller is at fault (as opposed to an upstream failure).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidCoordinate { .. })
    }
}

/// Draws a synthetic NDVI in `[0.1, 0.9]`, rounded to two decimals.
pub fn synthesize_ndvi<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    round_hundredths(rng.gen_range(NDVI_MIN..=NDVI_MAX))
}

/// Nominal nearest water source for a coordinate.
#[must_use]
pub fn nearest_water(coordinate: Coordinate) -> Coordinate {
    coordinate.offset(WATER_OFFSET_DEG, WATER_OFFSET_DEG)
}

/// Analyzes the pasture at `coordinate`.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidCoordinate`] for out-of-range input
/// (the weather provider is not called), or [`AnalysisError::Weather`] if
/// the weather lookup fails.
pub async fn analyze<W, R>(
    weather: &W,
    coordinate: Coordinate,
    rng: &mut R,
) -> Result<RanchAnalysis, AnalysisError>
where
    W: WeatherProvider + ?Sized,
    R: Rng + ?Sized,
{
    if !coordinate.is_valid() {
        return Err(AnalysisError::InvalidCoordinate { coordinate });
    }

    let ndvi = synthesize_ndvi(rng);
    let conditions = weather.current_conditions(coordinate).await?;

    let water_location = nearest_water(coordinate);
    let distance_to_water_km = coordinate.distance_km(&water_location);
    let recommendation = Recommendation::for_ndvi(ndvi);

    log::debug!(
        "Analyzed {coordinate}: ndvi={ndvi} soil_moisture={} -> {recommendation}",
        conditions.soil_moisture
    );

    Ok(RanchAnalysis {
        ndvi,
        soil_moisture: conditions.soil_moisture,
        temperature: conditions.temperature,
        observed_at: conditions.observed_at,
        water_location,
        distance_to_water_km,
        recommendation,
    })
}
