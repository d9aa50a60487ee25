#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for region attribution.
//!
//! Takes the ordered region catalog at startup, builds an R-tree over the
//! region envelopes, and answers point-in-polygon lookups. Overlapping
//! regions resolve to the one listed first in the catalog, exactly as a
//! linear scan in catalog order would.

use std::collections::BTreeSet;

use geo::{BoundingRect, Contains, MultiPolygon};
use ranch_map_geography::regions::Region;
use ranch_map_geography_models::Coordinate;
use rstar::{AABB, RTree, RTreeObject};

/// A region polygon stored in the R-tree with its catalog position.
struct RegionEntry {
    ordinal: usize,
    name: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for RegionEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over the region catalog.
///
/// Constructed once and shared read-only across requests.
pub struct RegionIndex {
    regions: RTree<RegionEntry>,
}

impl RegionIndex {
    /// Builds the index, remembering each region's catalog order.
    #[must_use]
    pub fn build(catalog: Vec<Region>) -> Self {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(catalog.len());

        for (ordinal, region) in catalog.into_iter().enumerate() {
            if !seen.insert(region.name.clone()) {
                log::warn!(
                    "Region name '{}' appears more than once; counts will be merged",
                    region.name
                );
            }

            let Some(envelope) = compute_envelope(&region.boundary) else {
                log::warn!("Region '{}' has an empty boundary", region.name);
                continue;
            };

            entries.push(RegionEntry {
                ordinal,
                name: region.name,
                envelope,
                polygon: region.boundary,
            });
        }

        let regions = RTree::bulk_load(entries);
        log::info!("Loaded {} regions into spatial index", regions.size());

        Self { regions }
    }

    /// An index with no regions; every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self::build(Vec::new())
    }

    /// Look up the region containing a point.
    ///
    /// When several regions contain the point, the one earliest in the
    /// catalog wins.
    #[must_use]
    pub fn lookup(&self, coordinate: Coordinate) -> Option<&str> {
        let point = geo::Point::new(coordinate.lon, coordinate.lat);
        let query_env = AABB::from_point([coordinate.lon, coordinate.lat]);

        self.regions
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.contains(&point))
            .min_by_key(|entry| entry.ordinal)
            .map(|entry| entry.name.as_str())
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.size()
    }

    /// Whether the index holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
