//! Compile-time registry of deployment profiles.
//!
//! Each deployment variant (herd size, scatter, alerting, heatmap, weather
//! variables, operator info) is a TOML file under `profiles/`. The registry
//! embeds these at compile time and exposes them via [`all_profiles`] and
//! [`load_profile`].

use ranch_map_herd_models::HerdConfig;
use ranch_map_server_models::ApiInfo;
use ranch_map_weather::WeatherConfig;
use serde::Deserialize;
use thiserror::Error;

/// Profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "range";

/// A deployment profile loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RanchProfile {
    /// Unique identifier (e.g. `"range"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Herd simulation parameters.
    pub herd: HerdConfig,
    /// Census settings.
    #[serde(default)]
    pub census: CensusSettings,
    /// Heatmap output; omitted from poll responses when absent.
    #[serde(default)]
    pub heatmap: Option<HeatmapSettings>,
    /// Weather client settings.
    pub weather: WeatherConfig,
    /// Operator contact block for the dashboard.
    pub info: ApiInfo,
}

/// Census behavior for a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CensusSettings {
    /// Head count above which a county is flagged. No alerts when unset.
    #[serde(default)]
    pub alert_threshold: Option<u32>,
}

/// Heatmap output for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HeatmapSettings {
    /// Intensity reported for every animal.
    pub intensity: f64,
}

/// Errors from profile lookup.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No embedded profile has this id.
    #[error("Unknown profile '{id}' (available: {available})")]
    Unknown {
        /// Requested id.
        id: String,
        /// Comma-separated list of known ids.
        available: String,
    },

    /// An embedded profile failed to parse.
    #[error("Failed to parse profile '{id}': {source}")]
    Parse {
        /// Profile id.
        id: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

// ── Compile-time embedded TOML files ────────────────────────────────

const PROFILE_TOMLS: &[(&str, &str)] = &[
    ("range", include_str!("../profiles/range.toml")),
    ("pasture", include_str!("../profiles/pasture.toml")),
];

#[cfg(test)]
const EXPECTED_PROFILE_COUNT: usize = 2;

/// Ids of every embedded profile.
#[must_use]
pub fn profile_ids() -> Vec<&'static str> {
    PROFILE_TOMLS.iter().map(|(id, _)| *id).collect()
}

/// Parses every embedded profile.
///
/// # Errors
///
/// Returns [`ProfileError::Parse`] if any embedded TOML is malformed.
pub fn all_profiles() -> Result<Vec<RanchProfile>, ProfileError> {
    PROFILE_TOMLS
        .iter()
        .map(|(id, toml_str)| parse_profile(id, toml_str))
        .collect()
}

/// Loads the embedded profile with the given id.
///
/// # Errors
///
/// Returns [`ProfileError`] if no such profile exists or it fails to parse.
pub fn load_profile(id: &str) -> Result<RanchProfile, ProfileError> {
    let (key, toml_str) = PROFILE_TOMLS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(id))
        .ok_or_else(|| ProfileError::Unknown {
            id: id.to_string(),
            available: profile_ids().join(", "),
        })?;

    parse_profile(key, toml_str)
}

fn parse_profile(id: &str, toml_str: &str) -> Result<RanchProfile, ProfileError> {
    toml::de::from_str(toml_str).map_err(|source| ProfileError::Parse {
        id: id.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_profiles() {
        let profiles = all_profiles().unwrap();
        assert_eq!(profiles.len(), EXPECTED_PROFILE_COUNT);
    }

    #[test]
    fn profile_ids_match_file_keys() {
        for profile in all_profiles().unwrap() {
            assert!(
                profile_ids().contains(&profile.id.as_str()),
                "Profile id {} does not match its registry key",
                profile.id
            );
        }
    }

    #[test]
    fn profile_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for id in profile_ids() {
            assert!(seen.insert(id), "Duplicate profile ID: {id}");
        }
    }

    #[test]
    fn all_profiles_have_valid_herds() {
        for profile in all_profiles().unwrap() {
            assert!(profile.herd.count > 0, "Profile {} has no herd", profile.id);
            ranch_map_herd::validate(&profile.herd)
                .unwrap_or_else(|e| panic!("Profile {} is invalid: {e}", profile.id));
            assert!(!profile.weather.base_url.is_empty());
        }
    }

    #[test]
    fn range_profile_alerts_without_heatmap() {
        let profile = load_profile("range").unwrap();
        assert_eq!(profile.herd.count, 35);
        assert_eq!(profile.herd.tag(0), "Tag_100");
        assert_eq!(profile.census.alert_threshold, Some(10));
        assert!(profile.heatmap.is_none());
        assert!(!profile.weather.include_temperature);
    }

    #[test]
    fn pasture_profile_heatmap_without_alerts() {
        let profile = load_profile("PASTURE").unwrap();
        assert_eq!(profile.herd.count, 30);
        assert_eq!(profile.herd.tag(0), "Cow_0");
        assert!(profile.census.alert_threshold.is_none());
        assert_eq!(profile.heatmap.map(|h| h.intensity), Some(0.6));
        assert!(profile.weather.include_temperature);
    }

    #[test]
    fn unknown_profile_lists_alternatives() {
        let err = load_profile("feedlot").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("feedlot"));
        assert!(message.contains("range"));
        assert!(message.contains("pasture"));
    }

    #[test]
    fn default_profile_exists() {
        assert!(load_profile(DEFAULT_PROFILE).is_ok());
    }
}
