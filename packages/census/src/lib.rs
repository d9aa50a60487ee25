#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Herd census: which county is each animal in, and how crowded is it?
//!
//! [`classify`] assigns every position to the first region in catalog
//! order whose boundary contains it, builds a fresh per-region tally, and
//! raises a density alert for each region whose head count exceeds the
//! configured threshold. Nothing carries over between polls.

use ranch_map_herd_models::{Alert, Position, Tally, UNKNOWN_REGION};
use ranch_map_spatial::RegionIndex;

/// Head count above which a region is flagged as overcrowded.
pub const DEFAULT_ALERT_THRESHOLD: u32 = 10;

/// Result of one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Census {
    /// Head count per region. Unknown positions are not counted.
    pub tally: Tally,
    /// Density alerts, in region name order.
    pub alerts: Vec<Alert>,
}

impl Census {
    /// Total number of positions placed in some region.
    #[must_use]
    pub fn classified(&self) -> u32 {
        self.tally.values().sum()
    }
}

/// Classifies every position against the region index.
///
/// Each position's `current_region` is overwritten with the matching
/// region name or [`UNKNOWN_REGION`]. A catalog region whose name is
/// itself [`UNKNOWN_REGION`] is treated as no match, so it is never tallied.
/// Alerts are only produced when `alert_threshold` is set.
pub fn classify(
    positions: &mut [Position],
    index: &RegionIndex,
    alert_threshold: Option<u32>,
) -> Census {
    let mut tally = Tally::new();

    for position in positions.iter_mut() {
        let region = index
            .lookup(position.coordinate())
            .filter(|name| *name != UNKNOWN_REGION);

        if let Some(name) = region {
            *tally.entry(name.to_string()).or_insert(0) += 1;
            name.clone_into(&mut position.current_region);
        } else {
            UNKNOWN_REGION.clone_into(&mut position.current_region);
        }
    }

    let alerts = alert_threshold
        .map(|threshold| density_alerts(&tally, threshold))
        .unwrap_or_default();

    let census = Census { tally, alerts };
    log::debug!(
        "Classified {}/{} positions into {} regions ({} alerts)",
        census.classified(),
        positions.len(),
        census.tally.len(),
        census.alerts.len()
    );
    census
}

/// Alerts for every region whose count strictly exceeds `threshold`.
#[must_use]
pub fn density_alerts(tally: &Tally, threshold: u32) -> Vec<Alert> {
    tally
        .iter()
        .filter(|(_, count)| **count > threshold)
        .map(|(region, count)| Alert::high_density(region.clone(), *count))
        .collect()
}

#[cfg(test)]
mod tests {
    use geo::{MultiPolygon, polygon};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ranch_map_geography::regions::Region;
    use ranch_map_geography_models::Coordinate;
    use ranch_map_herd::Herd;
    use ranch_map_herd_models::HerdConfig;

    use super::*;

    fn rect(name: &str, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Region {
        Region::new(
            name,
            MultiPolygon(vec![polygon![
                (x: min_lon, y: min_lat),
                (x: max_lon, y: min_lat),
                (x: max_lon, y: max_lat),
                (x: min_lon, y: max_lat),
            ]]),
        )
    }

    fn pos(id: &str, lat: f64, lon: f64) -> Position {
        Position::new(id, Coordinate::new(lat, lon))
    }

    #[test]
    fn three_head_one_region_scenario() {
        let index = RegionIndex::build(vec![rect("RegionA", 0.0, 0.0, 10.0, 10.0)]);
        let mut positions = vec![
            pos("a", 1.0, 1.0),
            pos("b", 5.0, 5.0),
            pos("c", 20.0, 20.0),
        ];

        let census = classify(&mut positions, &index, Some(1));

        assert_eq!(census.tally.len(), 1);
        assert_eq!(census.tally.get("RegionA"), Some(&2));
        assert_eq!(census.alerts, vec![Alert::high_density("RegionA", 2)]);
        assert_eq!(positions[0].current_region, "RegionA");
        assert_eq!(positions[1].current_region, "RegionA");
        assert_eq!(positions[2].current_region, UNKNOWN_REGION);
    }

    #[test]
    fn empty_catalog_means_everything_unknown() {
        let index = RegionIndex::empty();
        let mut positions = vec![pos("a", 46.8, -110.3), pos("b", 46.9, -110.1)];

        let census = classify(&mut positions, &index, Some(DEFAULT_ALERT_THRESHOLD));

        assert!(census.tally.is_empty());
        assert!(census.alerts.is_empty());
        assert!(positions.iter().all(|p| p.current_region == UNKNOWN_REGION));
    }

    #[test]
    fn reclassification_clears_stale_region() {
        let index = RegionIndex::build(vec![rect("RegionA", 0.0, 0.0, 10.0, 10.0)]);
        let mut positions = vec![pos("a", 1.0, 1.0)];

        classify(&mut positions, &index, None);
        assert_eq!(positions[0].current_region, "RegionA");

        positions[0].lat = 50.0;
        let census = classify(&mut positions, &index, None);
        assert_eq!(positions[0].current_region, UNKNOWN_REGION);
        assert!(census.tally.is_empty());
    }

    #[test]
    fn region_named_unknown_is_not_tallied() {
        let index = RegionIndex::build(vec![
            rect(UNKNOWN_REGION, 0.0, 0.0, 10.0, 10.0),
            rect("Petroleum", 10.0, 0.0, 20.0, 10.0),
        ]);
        let mut positions = vec![pos("a", 5.0, 5.0), pos("b", 5.0, 15.0)];

        let census = classify(&mut positions, &index, Some(0));

        assert_eq!(census.tally.len(), 1);
        assert_eq!(census.tally.get("Petroleum"), Some(&1));
        assert!(!positions[0].is_in_region());
        assert!(positions[1].is_in_region());
        let known = positions.iter().filter(|p| p.is_in_region()).count();
        assert_eq!(census.classified() as usize, known);
        assert_eq!(census.alerts, vec![Alert::high_density("Petroleum", 1)]);
    }

    #[test]
    fn alert_only_when_strictly_above_threshold() {
        let mut tally = Tally::new();
        tally.insert("Cascade".to_string(), 10);
        tally.insert("Fergus".to_string(), 11);
        tally.insert("Judith Basin".to_string(), 3);

        let alerts = density_alerts(&tally, DEFAULT_ALERT_THRESHOLD);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].region, "Fergus");
        assert_eq!(
            alerts[0].reason,
            "High Density: 11 head detected. Check forage levels."
        );
    }

    #[test]
    fn no_threshold_no_alerts() {
        let index = RegionIndex::build(vec![rect("RegionA", 0.0, 0.0, 10.0, 10.0)]);
        let mut positions: Vec<Position> = (0..20)
            .map(|i| pos(&format!("Cow_{i}"), 5.0, 5.0))
            .collect();

        let census = classify(&mut positions, &index, None);

        assert_eq!(census.tally.get("RegionA"), Some(&20));
        assert!(census.alerts.is_empty());
    }

    #[test]
    fn overlapping_regions_count_once_in_first_region() {
        let index = RegionIndex::build(vec![
            rect("North", 0.0, 5.0, 10.0, 10.0),
            rect("Everything", 0.0, 0.0, 10.0, 10.0),
        ]);
        let mut positions = vec![pos("a", 7.0, 5.0), pos("b", 2.0, 5.0)];

        let census = classify(&mut positions, &index, None);

        assert_eq!(census.tally.get("North"), Some(&1));
        assert_eq!(census.tally.get("Everything"), Some(&1));
        assert_eq!(census.classified(), 2);
    }

    #[test]
    fn simulated_herd_tallies_are_consistent() {
        let config = HerdConfig {
            count: 35,
            id_prefix: "Tag_".to_string(),
            id_start: 100,
            center_lat: 46.8,
            center_lon: -110.3,
            spread: 0.5,
            step: 0.002,
            bounds: None,
        };
        // Four quadrants around the center leave a gap to the south-east.
        let index = RegionIndex::build(vec![
            rect("NW", -110.8, 46.8, -110.3, 47.3),
            rect("NE", -110.3, 46.8, -109.8, 47.3),
            rect("SW", -110.8, 46.3, -110.3, 46.8),
        ]);

        let mut rng = StdRng::seed_from_u64(2024);
        let mut herd = Herd::initialize(&config, &mut rng).unwrap();

        for _ in 0..10 {
            herd.perturb(config.step, None, &mut rng);
            let census = classify(herd.positions_mut(), &index, Some(DEFAULT_ALERT_THRESHOLD));

            let known = herd.positions().iter().filter(|p| p.is_in_region()).count();
            assert_eq!(census.classified() as usize, known);
            assert!(census.classified() as usize <= herd.len());

            for p in herd.positions() {
                if p.is_in_region() {
                    assert!(census.tally.contains_key(&p.current_region));
                }
            }

            for (region, count) in &census.tally {
                let alerted = census.alerts.iter().any(|a| &a.region == region);
                assert_eq!(alerted, *count > DEFAULT_ALERT_THRESHOLD);
            }
        }
    }
}
