//! Astronomical position providers.
//!
//! The searches only need `instant -> (altitude, azimuth)` for a fixed
//! observer. [`PositionProvider`] is that seam; the production implementation
//! wraps the NREL SPA from `solar-positioning` without refraction correction
//! (the sun is treated as a geometric point).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use solar_positioning::{spa, time::DeltaT};

use crate::geo::Location;
use crate::terrain::normalize_azimuth;

/// Sun position in the observer's topocentric horizontal frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    /// Degrees above the horizontal plane, negative below.
    pub altitude_deg: f64,
    /// Degrees clockwise from north, in [0, 360).
    pub azimuth_deg: f64,
    pub instant: DateTime<Utc>,
}

/// Source of sun positions for a location.
///
/// Implementations must be deterministic for a given `(location, instant)`.
/// A failure is returned as an error and must never be disguised as an altitude.
pub trait PositionProvider {
    fn position(&self, location: &Location, instant: DateTime<Utc>) -> Result<SolarPosition>;
}

/// Provider backed by the NREL Solar Position Algorithm (±0.0003°, years -2000 to 6000).
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaProvider;

impl PositionProvider for SpaProvider {
    fn position(&self, location: &Location, instant: DateTime<Utc>) -> Result<SolarPosition> {
        let delta_t = DeltaT::estimate_from_date_like(instant)
            .with_context(|| format!("No delta T estimate for {instant}"))?;

        let position = spa::solar_position(
            instant,
            location.latitude(),
            location.longitude(),
            location.elevation(),
            delta_t,
            None,
        )
        .with_context(|| {
            format!(
                "SPA position failed at {} for {:.4}°, {:.4}°",
                instant,
                location.latitude(),
                location.longitude()
            )
        })?;

        Ok(SolarPosition {
            altitude_deg: position.elevation_angle(),
            azimuth_deg: normalize_azimuth(position.azimuth()),
            instant,
        })
    }
}

/// Analytic sun model for tests.
///
/// Altitude follows `amplitude * cos(2π (t - noon) / 24h) + offset` and the
/// azimuth sweeps a full circle per day, passing 180° at `noon`. Zeros of the
/// altitude are known in closed form, which makes search precision checkable.
#[cfg(any(test, feature = "testing-support"))]
pub mod testing {
    use super::*;
    use chrono::Duration;
    use std::cell::Cell;
    use std::f64::consts::PI;

    #[derive(Debug)]
    pub struct SyntheticSun {
        pub noon: DateTime<Utc>,
        pub amplitude: f64,
        pub offset: f64,
        calls: Cell<usize>,
        fail_after: Option<usize>,
    }

    impl SyntheticSun {
        pub fn new(noon: DateTime<Utc>, amplitude: f64, offset: f64) -> Self {
            Self {
                noon,
                amplitude,
                offset,
                calls: Cell::new(0),
                fail_after: None,
            }
        }

        /// Make every evaluation after the first `n` fail.
        pub fn failing_after(mut self, n: usize) -> Self {
            self.fail_after = Some(n);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.get()
        }

        fn day_fraction(&self, instant: DateTime<Utc>) -> f64 {
            (instant - self.noon).num_milliseconds() as f64 / 86_400_000.0
        }

        pub fn altitude_at(&self, instant: DateTime<Utc>) -> f64 {
            self.amplitude * (2.0 * PI * self.day_fraction(instant)).cos() + self.offset
        }

        /// Instants where the altitude equals `threshold`, before and after noon.
        pub fn crossings(&self, threshold: f64) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
            let ratio = (threshold - self.offset) / self.amplitude;
            if !(-1.0..=1.0).contains(&ratio) {
                return None;
            }
            let half = ratio.acos() / (2.0 * PI) * 86_400_000.0;
            let half = Duration::milliseconds(half.round() as i64);
            Some((self.noon - half, self.noon + half))
        }
    }

    impl PositionProvider for SyntheticSun {
        fn position(&self, _location: &Location, instant: DateTime<Utc>) -> Result<SolarPosition> {
            let calls = self.calls.get() + 1;
            self.calls.set(calls);
            if let Some(limit) = self.fail_after
                && calls > limit
            {
                anyhow::bail!("synthetic provider unavailable");
            }

            Ok(SolarPosition {
                altitude_deg: self.altitude_at(instant),
                azimuth_deg: normalize_azimuth(180.0 + 360.0 * self.day_fraction(instant)),
                instant,
            })
        }
    }
}
