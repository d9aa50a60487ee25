#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Herd tracking types.
//!
//! These types describe the simulated herd (tagged positions), how a herd
//! is configured for a deployment, and the per-poll occupancy results
//! (tallies and density alerts). They carry no behavior beyond small
//! helpers so every crate in the workspace can share them.

use std::collections::BTreeMap;

use ranch_map_geography_models::Coordinate;
use serde::{Deserialize, Serialize};

/// Region label for a position outside every known boundary.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Per-region head count for one poll, keyed by region name.
pub type Tally = BTreeMap<String, u32>;

/// A tagged animal's current location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Ear tag identifier (e.g. "Tag_100"). Never reused.
    pub id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Name of the containing region, or [`UNKNOWN_REGION`].
    pub current_region: String,
}

impl Position {
    /// Creates an unclassified position.
    #[must_use]
    pub fn new(id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            lat: coordinate.lat,
            lon: coordinate.lon,
            current_region: UNKNOWN_REGION.to_string(),
        }
    }

    /// The position as a [`Coordinate`].
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// Whether the last classification placed this position in a region.
    #[must_use]
    pub fn is_in_region(&self) -> bool {
        self.current_region != UNKNOWN_REGION
    }
}

/// An axis-aligned grazing area that positions are clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrazingBounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
}

impl GrazingBounds {
    /// Whether the edges are finite and ordered.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
    }

    /// Clamps a coordinate into the box.
    #[must_use]
    pub fn clamp(&self, coordinate: Coordinate) -> Coordinate {
        Coordinate::new(
            coordinate.lat.clamp(self.min_lat, self.max_lat),
            coordinate.lon.clamp(self.min_lon, self.max_lon),
        )
    }

    /// Whether the coordinate lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coordinate.lat)
            && (self.min_lon..=self.max_lon).contains(&coordinate.lon)
    }
}

/// Herd simulation parameters for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerdConfig {
    /// Number of tagged animals.
    pub count: usize,
    /// Tag prefix (e.g. `"Tag_"`).
    pub id_prefix: String,
    /// Number appended to the prefix for the first animal.
    #[serde(default)]
    pub id_start: u32,
    /// Latitude the herd is scattered around.
    pub center_lat: f64,
    /// Longitude the herd is scattered around.
    pub center_lon: f64,
    /// Maximum initial offset from the center per axis (degrees).
    pub spread: f64,
    /// Maximum movement per poll per axis (degrees).
    pub step: f64,
    /// Optional grazing area. Without one the walk is unbounded.
    #[serde(default)]
    pub bounds: Option<GrazingBounds>,
}

impl HerdConfig {
    /// The herd's center point.
    #[must_use]
    pub const fn center(&self) -> Coordinate {
        Coordinate::new(self.center_lat, self.center_lon)
    }

    /// Tag for the `index`-th animal.
    #[must_use]
    pub fn tag(&self, index: usize) -> String {
        format!("{}{}", self.id_prefix, u64::from(self.id_start) + index as u64)
    }
}

/// A density warning for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Region name.
    pub region: String,
    /// Human-readable explanation including the head count.
    pub reason: String,
}

impl Alert {
    /// Builds the high-density alert for `region` holding `count` head.
    #[must_use]
    pub fn high_density(region: impl Into<String>, count: u32) -> Self {
        Self {
            region: region.into(),
            reason: format!("High Density: {count} head detected. Check forage levels."),
        }
    }
}
