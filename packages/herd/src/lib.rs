#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Simulated herd state.
//!
//! A [`Herd`] is a fixed set of tagged positions scattered around a center
//! point at startup and nudged by a small uniform random walk on every
//! poll. The random source is always passed in by the caller so the walk
//! can be replayed from a seed.

use ranch_map_geography_models::Coordinate;
use ranch_map_herd_models::{GrazingBounds, HerdConfig, Position};
use rand::Rng;
use thiserror::Error;

/// Largest `spread` or `step` accepted, in degrees.
pub const MAX_OFFSET_DEG: f64 = 180.0;

/// Errors from herd construction.
#[derive(Debug, Error)]
pub enum HerdError {
    /// The herd configuration cannot drive a random walk.
    #[error("Invalid herd config: {message}")]
    InvalidConfig {
        /// Description of the offending field.
        message: String,
    },
}

/// Checks that a [`HerdConfig`] describes a usable simulation.
///
/// # Errors
///
/// Returns [`HerdError::InvalidConfig`] if `spread` or `step` is negative or
/// above [`MAX_OFFSET_DEG`], the center is not finite, or the bounds are
/// inverted.
pub fn validate(config: &HerdConfig) -> Result<(), HerdError> {
    let invalid = |message: String| Err(HerdError::InvalidConfig { message });

    if !(0.0..=MAX_OFFSET_DEG).contains(&config.spread) {
        return invalid(format!(
            "spread must be in [0, {MAX_OFFSET_DEG}], got {}",
            config.spread
        ));
    }
    if !(0.0..=MAX_OFFSET_DEG).contains(&config.step) {
        return invalid(format!(
            "step must be in [0, {MAX_OFFSET_DEG}], got {}",
            config.step
        ));
    }
    if !(config.center_lat.is_finite() && config.center_lon.is_finite()) {
        return invalid(format!("center must be finite, got {}", config.center()));
    }
    if let Some(bounds) = &config.bounds
        && !bounds.is_valid()
    {
        return invalid(format!("grazing bounds are not ordered: {bounds:?}"));
    }

    Ok(())
}

/// The tracked herd.
#[derive(Debug, Clone, Default)]
pub struct Herd {
    positions: Vec<Position>,
}

impl Herd {
    /// Scatters `config.count` animals around the configured center.
    ///
    /// Each animal is offset by an independent uniform draw in
    /// `[-spread, spread]` on each axis, then clamped into the grazing
    /// bounds if any are configured.
    ///
    /// # Errors
    ///
    /// Returns [`HerdError`] if the configuration fails [`validate`].
    pub fn initialize<R: Rng + ?Sized>(
        config: &HerdConfig,
        rng: &mut R,
    ) -> Result<Self, HerdError> {
        validate(config)?;

        let center = config.center();
        let positions = (0..config.count)
            .map(|i| {
                let mut coordinate = center.offset(
                    uniform_delta(rng, config.spread),
                    uniform_delta(rng, config.spread),
                );
                if let Some(bounds) = &config.bounds {
                    coordinate = bounds.clamp(coordinate);
                }
                Position::new(config.tag(i), coordinate)
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Initialized herd of {} around {center} (spread {})",
            positions.len(),
            config.spread
        );

        Ok(Self { positions })
    }

    /// Moves every animal by an independent uniform delta in
    /// `[-step, step]` on each axis.
    ///
    /// Without `bounds` the walk is unbounded. A non-positive or
    /// non-finite `step` leaves the herd in place; larger steps are capped
    /// at [`MAX_OFFSET_DEG`].
    pub fn perturb<R: Rng + ?Sized>(
        &mut self,
        step: f64,
        bounds: Option<&GrazingBounds>,
        rng: &mut R,
    ) {
        for position in &mut self.positions {
            let moved = position
                .coordinate()
                .offset(uniform_delta(rng, step), uniform_delta(rng, step));
            let Coordinate { lat, lon } = bounds.map_or(moved, |b| b.clamp(moved));
            position.lat = lat;
            position.lon = lon;
        }
    }

    /// Current positions in tag order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Mutable access for classification.
    pub fn positions_mut(&mut self) -> &mut [Position] {
        &mut self.positions
    }

    /// Number of animals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the herd has no animals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn uniform_delta<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        let max = max.min(MAX_OFFSET_DEG);
        rng.gen_range(-max..=max)
    } else {
        0.0
    }
}
