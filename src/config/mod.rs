//! Configuration system for sunpredict.
//!
//! Settings live in `sunpredict.toml`, looked up in the platform configuration
//! directory (`$XDG_CONFIG_HOME/sunpredict/` on Linux) or in the directory
//! passed with `--config`. Every field is optional; a missing default file
//! simply means built-in defaults.
//!
//! ```toml
//! [location]
//! latitude = 35.1264          # Degrees, -90 to 90 (negative for south)
//! longitude = -106.6055       # Degrees, -180 to 180 (negative for west)
//! elevation = 1600.0          # Meters above sea level, required with coordinates
//! timezone = "America/Denver" # Display timezone; detected from coordinates if omitted
//!
//! [prediction]
//! include_terrain = true
//! terrain_file = "terrain.json" # Relative paths resolve against the config directory
//!
//! [search]
//! tolerance_seconds = 1         # Crossing precision (1-60)
//! horizon_step_seconds = 60     # Sunrise/sunset scan step (5-1800)
//! twilight_step_minutes = 60    # Civil twilight scan step (1-180)
//! twilight_max_span_hours = 24  # How far twilight scans may travel (1-48)
//! civil_twilight_angle = -6.0   # Civil twilight altitude (-18 to 0)
//! dawn_day_offset = -1          # Dawn searched from the previous (-1) or same (0) day's noon
//! interpolation = "circular"    # Terrain lookup before the first sample: "circular" or "legacy"
//! ```
//!
//! Command-line values take precedence over anything loaded here.

pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use chrono::Duration;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;

use crate::constants::*;
use crate::geo::Location;
use crate::solar::SearchConfig;
use crate::terrain::InterpolationMode;

pub use loading::{default_config_path, load, load_from_path};

/// Observer position and display timezone.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LocationSection {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Meters above sea level; 0 when omitted.
    pub elevation: Option<f64>,
    /// IANA timezone name used for reports and local day framing.
    pub timezone: Option<String>,
}

/// What a prediction takes into account.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PredictionSection {
    pub include_terrain: Option<bool>,
    pub terrain_file: Option<PathBuf>,
}

/// Crossing search tuning.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchSection {
    pub tolerance_seconds: Option<u64>,
    pub horizon_step_seconds: Option<u64>,
    pub twilight_step_minutes: Option<u64>,
    pub twilight_max_span_hours: Option<u64>,
    pub civil_twilight_angle: Option<f64>,
    pub dawn_day_offset: Option<i64>,
    pub interpolation: Option<InterpolationMode>,
}

/// Configuration loaded from `sunpredict.toml`.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub location: LocationSection,
    pub prediction: PredictionSection,
    pub search: SearchSection,

    /// Directory the file was loaded from, used to resolve relative paths.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

impl Config {
    /// Search tuning with defaults filled in for omitted fields.
    pub fn search_config(&self) -> SearchConfig {
        let search = &self.search;
        SearchConfig {
            tolerance: Duration::seconds(
                search.tolerance_seconds.unwrap_or(DEFAULT_TOLERANCE_SECONDS) as i64,
            ),
            horizon_step: Duration::seconds(
                search
                    .horizon_step_seconds
                    .unwrap_or(DEFAULT_HORIZON_STEP_SECONDS) as i64,
            ),
            twilight_step: Duration::minutes(
                search
                    .twilight_step_minutes
                    .unwrap_or(DEFAULT_TWILIGHT_STEP_MINUTES) as i64,
            ),
            twilight_max_span: Duration::hours(
                search
                    .twilight_max_span_hours
                    .unwrap_or(DEFAULT_TWILIGHT_MAX_SPAN_HOURS) as i64,
            ),
            civil_twilight_angle: search
                .civil_twilight_angle
                .unwrap_or(DEFAULT_CIVIL_TWILIGHT_ANGLE),
            dawn_day_offset: search.dawn_day_offset.unwrap_or(DEFAULT_DAWN_DAY_OFFSET),
        }
    }

    pub fn interpolation(&self) -> InterpolationMode {
        self.search.interpolation.unwrap_or_default()
    }

    /// The configured observer, if both coordinates are present.
    pub fn location(&self) -> Result<Option<Location>> {
        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => {
                let elevation = self
                    .location
                    .elevation
                    .context("[location] needs an elevation in meters")?;
                Location::new(latitude, longitude, elevation)
                    .map(Some)
                    .context("Invalid [location] in configuration")
            }
            (None, None) => Ok(None),
            _ => anyhow::bail!("[location] needs both latitude and longitude"),
        }
    }

    /// The configured display timezone, if any.
    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.location
            .timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| anyhow::anyhow!("Unknown timezone '{name}' in [location]: {e}"))
            })
            .transpose()
    }

    pub fn include_terrain(&self) -> bool {
        self.prediction.include_terrain.unwrap_or(false)
    }

    /// The terrain file, with a relative path resolved against the config directory.
    pub fn terrain_path(&self) -> Option<PathBuf> {
        let path = self.prediction.terrain_file.as_ref()?;
        match &self.config_dir {
            Some(dir) if path.is_relative() => Some(dir.join(path)),
            _ => Some(path.clone()),
        }
    }

    /// Log the effective settings in a summary block.
    pub fn log_config(&self) {
        let source = match &self.config_dir {
            Some(dir) => format!("configuration from {}", dir.display()),
            None => "default configuration".to_string(),
        };
        log_block_start!("Loaded {}", source);

        if let (Some(lat), Some(lon)) = (self.location.latitude, self.location.longitude) {
            let lat_dir = if lat >= 0.0 { "N" } else { "S" };
            let lon_dir = if lon >= 0.0 { "E" } else { "W" };
            log_indented!(
                "Location: {:.4}°{}, {:.4}°{} at {:.0}m",
                lat.abs(),
                lat_dir,
                lon.abs(),
                lon_dir,
                self.location.elevation.unwrap_or(0.0)
            );
        }
        if let Some(ref tz) = self.location.timezone {
            log_indented!("Timezone: {}", tz);
        }

        if self.include_terrain() {
            match self.terrain_path() {
                Some(path) => log_indented!("Terrain: {}", path.display()),
                None => log_indented!("Terrain: enabled, no file configured"),
            }
        }

        let search = self.search_config();
        log_indented!(
            "Search: {}s tolerance, {}s horizon step, {}min twilight step",
            search.tolerance.num_seconds(),
            search.horizon_step.num_seconds(),
            search.twilight_step.num_minutes()
        );
        log_indented!(
            "Civil twilight: {:.1}°, dawn from day offset {}",
            search.civil_twilight_angle,
            search.dawn_day_offset
        );
        log_indented!("Terrain interpolation: {}", self.interpolation().as_str());
    }
}
