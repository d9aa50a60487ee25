//! Region catalog loading from `GeoJSON`.
//!
//! The catalog is an ordered list of named county boundaries read once at
//! startup. Order matters: when boundaries overlap, lookups resolve to the
//! region that appears first in the source document.

use std::path::Path;

use geo::{Contains, MultiPolygon};
use geojson::{Feature, GeoJson};
use ranch_map_geography_models::Coordinate;

use crate::GeoError;

/// Property holding the region name on each feature.
const NAME_PROPERTY: &str = "name";

/// A named boundary polygon.
#[derive(Debug, Clone)]
pub struct Region {
    /// Display name, used as the tally key (e.g. "Lewis and Clark").
    pub name: String,
    /// Boundary in lon/lat degrees.
    pub boundary: MultiPolygon<f64>,
}

impl Region {
    /// Creates a region from a name and boundary.
    #[must_use]
    pub fn new(name: impl Into<String>, boundary: MultiPolygon<f64>) -> Self {
        Self {
            name: name.into(),
            boundary,
        }
    }

    /// Planar point-in-polygon test over lon/lat degrees.
    ///
    /// Points lying exactly on the boundary are not contained.
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.boundary
            .contains(&geo::Point::new(coordinate.lon, coordinate.lat))
    }
}

/// Parses a `GeoJSON` `FeatureCollection` into an ordered region catalog.
///
/// Features without a string `name` property or without a `Polygon` /
/// `MultiPolygon` geometry are skipped with a warning.
///
/// # Errors
///
/// Returns [`GeoError`] if the document is not valid `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn parse_catalog(geojson_str: &str) -> Result<Vec<Region>, GeoError> {
    let geojson: GeoJson = geojson_str.parse()?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeoError::Conversion {
            message: "boundary document is not a FeatureCollection".to_string(),
        });
    };

    let total = collection.features.len();
    let regions: Vec<Region> = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(idx, feature)| feature_to_region(idx, feature))
        .collect();

    if regions.len() < total {
        log::warn!(
            "Skipped {} of {total} boundary features",
            total - regions.len()
        );
    }

    Ok(regions)
}

/// Reads and parses the region catalog at `path`.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Vec<Region>, GeoError> {
    let contents = std::fs::read_to_string(path)?;
    parse_catalog(&contents)
}

/// Loads the region catalog, falling back to an empty catalog on failure.
///
/// The server stays up without boundary data; every position then
/// classifies as unknown.
#[must_use]
pub fn load_catalog_or_empty(path: &Path) -> Vec<Region> {
    match load_catalog(path) {
        Ok(regions) => {
            log::info!(
                "Loaded {} regions from {}",
                regions.len(),
                path.display()
            );
            regions
        }
        Err(e) => {
            log::error!("Error loading regions from {}: {e}", path.display());
            Vec::new()
        }
    }
}

fn feature_to_region(idx: usize, feature: Feature) -> Option<Region> {
    let Some(name) = feature
        .property(NAME_PROPERTY)
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
    else {
        log::warn!("Feature {idx} has no string '{NAME_PROPERTY}' property");
        return None;
    };

    let Some(geometry) = feature.geometry else {
        log::warn!("Feature {idx} ({name}) has no geometry");
        return None;
    };

    let geo_geom: geo::Geometry<f64> = match geometry.try_into() {
        Ok(g) => g,
        Err(e) => {
            log::warn!("Feature {idx} ({name}) has invalid geometry: {e}");
            return None;
        }
    };

    let boundary = match geo_geom {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => {
            log::warn!("Feature {idx} ({name}) is not a polygon");
            return None;
        }
    };

    Some(Region { name, boundary })
}
