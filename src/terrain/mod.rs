//! Terrain obstruction model.
//!
//! A [`TerrainProfile`] turns a sparse set of `(azimuth, obstruction angle)`
//! measurements into a continuous, periodic obstruction function. Samples are
//! held in a vector sorted by azimuth so lookups are a binary search and the
//! interpolation result never depends on container iteration order.
//!
//! ## File Format
//!
//! Profiles persist as JSON, keyed by azimuth in degrees:
//!
//! ```json
//! {
//!   "elevations": { "0.0": 2.5, "90.0": 12.0, "180.0": 4.1, "270.0": 0.8 },
//!   "reference_elevation": 1600.0
//! }
//! ```
//!
//! Keys are normalized into [0, 360) on load; later duplicates overwrite
//! earlier ones. Keys or values that are not numbers are skipped with a warning.

pub mod survey;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Normalize an azimuth into [0, 360).
///
/// `rem_euclid` can return exactly 360.0 for tiny negative inputs; that is folded to 0.
pub fn normalize_azimuth(azimuth: f64) -> f64 {
    let normalized = azimuth.rem_euclid(360.0);
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// One obstruction measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainSample {
    /// Degrees clockwise from north, in [0, 360).
    pub azimuth_deg: f64,
    /// Altitude of the terrain silhouette at this azimuth, in degrees. May be negative.
    pub obstruction_deg: f64,
}

/// How lookups before the smallest sampled azimuth are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMode {
    /// Treat the samples as a ring: interpolate across 360°/0° in both directions.
    #[default]
    Circular,
    /// Wrap past the largest sample, but return the smallest sample's value
    /// unchanged for queries before it. Matches profiles produced by older releases.
    Legacy,
}

impl InterpolationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpolationMode::Circular => "circular",
            InterpolationMode::Legacy => "legacy",
        }
    }
}

/// Read-only obstruction lookup built from terrain samples.
///
/// An empty profile means "no obstruction anywhere": [`obstruction_angle`]
/// returns negative infinity and [`is_blocked`] is always false.
///
/// [`obstruction_angle`]: TerrainProfile::obstruction_angle
/// [`is_blocked`]: TerrainProfile::is_blocked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainProfile {
    samples: Vec<TerrainSample>,
    reference_elevation: f64,
    interpolation: InterpolationMode,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct TerrainFile {
    #[serde(default)]
    elevations: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    reference_elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<serde_json::Value>,
}

impl TerrainProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from `(azimuth, obstruction angle)` pairs.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut profile = Self::new();
        for (azimuth, angle) in samples {
            profile.add_sample(azimuth, angle);
        }
        profile
    }

    /// Build a profile from an azimuth-keyed mapping plus the observer's reference elevation.
    pub fn from_map<I>(data: I, reference_elevation: f64) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut profile = Self::from_samples(data);
        profile.reference_elevation = reference_elevation;
        profile
    }

    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    /// Insert or overwrite the sample at `azimuth` (normalized into [0, 360)).
    ///
    /// Non-finite azimuths cannot be placed on the circle and are skipped.
    pub fn add_sample(&mut self, azimuth: f64, obstruction_deg: f64) {
        if !azimuth.is_finite() {
            log_warning!("Skipping terrain sample with non-finite azimuth {}", azimuth);
            return;
        }

        let azimuth_deg = normalize_azimuth(azimuth);
        let sample = TerrainSample {
            azimuth_deg,
            obstruction_deg,
        };
        match self
            .samples
            .binary_search_by(|s| s.azimuth_deg.total_cmp(&azimuth_deg))
        {
            Ok(idx) => self.samples[idx] = sample,
            Err(idx) => self.samples.insert(idx, sample),
        }
    }

    /// Load a profile from a JSON terrain file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read terrain file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse terrain file {}", path.display()))
    }

    /// Parse a profile from JSON terrain data.
    pub fn from_json(content: &str) -> Result<Self> {
        let file: TerrainFile = serde_json::from_str(content)?;
        let mut profile = Self::new();
        profile.reference_elevation = file.reference_elevation.unwrap_or(0.0);

        for (key, value) in file.elevations {
            let Ok(azimuth) = key.trim().parse::<f64>() else {
                log_warning!("Skipping terrain entry with non-numeric azimuth '{}'", key);
                continue;
            };
            let Some(angle) = value.as_f64() else {
                log_warning!(
                    "Skipping terrain entry at azimuth {} with non-numeric angle {}",
                    key,
                    value
                );
                continue;
            };
            profile.add_sample(azimuth, angle);
        }

        log_debug!(
            "Loaded terrain profile with {} samples (reference elevation {:.0}m)",
            profile.len(),
            profile.reference_elevation
        );
        Ok(profile)
    }

    /// Serialize the profile to the JSON terrain format.
    pub fn to_json(&self) -> Result<String> {
        let file = TerrainFile {
            elevations: self
                .samples
                .iter()
                .map(|s| (s.azimuth_deg.to_string(), serde_json::json!(s.obstruction_deg)))
                .collect(),
            reference_elevation: Some(self.reference_elevation),
            location: None,
            metadata: None,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write terrain file {}", path.display()))
    }

    pub fn samples(&self) -> &[TerrainSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Elevation of the observation point the profile was measured from (meters).
    pub fn reference_elevation(&self) -> f64 {
        self.reference_elevation
    }

    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Obstruction angle in degrees at `azimuth`.
    ///
    /// Exact sample hits return the stored value. Between samples the value is
    /// interpolated linearly by arc length; past the largest sample it wraps
    /// through 360° to the smallest. Before the smallest sample the behavior
    /// follows the profile's [`InterpolationMode`].
    pub fn obstruction_angle(&self, azimuth: f64) -> f64 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return f64::NEG_INFINITY;
        };

        let azimuth = normalize_azimuth(azimuth);
        let upper = self.samples.partition_point(|s| s.azimuth_deg <= azimuth);

        if upper > 0 && self.samples[upper - 1].azimuth_deg == azimuth {
            return self.samples[upper - 1].obstruction_deg;
        }

        let (lower, upper, arc, offset) = if upper == self.samples.len() {
            // Past the largest sample: wrap forward to the smallest one
            (
                last,
                first,
                360.0 + first.azimuth_deg - last.azimuth_deg,
                azimuth - last.azimuth_deg,
            )
        } else if upper == 0 {
            if self.interpolation == InterpolationMode::Legacy {
                return first.obstruction_deg;
            }
            (
                last,
                first,
                360.0 + first.azimuth_deg - last.azimuth_deg,
                360.0 + azimuth - last.azimuth_deg,
            )
        } else {
            let lower = &self.samples[upper - 1];
            let upper = &self.samples[upper];
            (
                lower,
                upper,
                upper.azimuth_deg - lower.azimuth_deg,
                azimuth - lower.azimuth_deg,
            )
        };

        let fraction = offset / arc;
        lower.obstruction_deg + fraction * (upper.obstruction_deg - lower.obstruction_deg)
    }

    /// Whether terrain hides a sun at `altitude` (degrees) in direction `azimuth`.
    ///
    /// A sun exactly at the obstruction angle counts as blocked.
    pub fn is_blocked(&self, altitude: f64, azimuth: f64) -> bool {
        altitude <= self.obstruction_angle(azimuth)
    }
}
