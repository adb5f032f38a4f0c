//! Prediction command: resolve inputs, compose windows, report.
//!
//! Inputs come from two places. Command-line values win over the
//! configuration file, which wins over built-in defaults and detection.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

use crate::args::PredictOptions;
use crate::config::{self, Config};
use crate::geo::{DaySpan, Location, determine_timezone_from_coordinates};
use crate::logger::Log;
use crate::solar::{PositionProvider, SearchConfig, SpaProvider};
use crate::terrain::TerrainProfile;
use crate::window::{DailyWindowComposer, VisibilityWindow, display};

/// Everything a prediction run needs, after merging arguments and configuration.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub location: Location,
    pub timezone: Tz,
    pub first_day: NaiveDate,
    pub days: u32,
    pub terrain: Option<TerrainProfile>,
    pub search: SearchConfig,
}

impl PredictionRequest {
    /// Merge command-line options over `config`.
    pub fn resolve(options: &PredictOptions, config: &Config) -> Result<Self> {
        let location = match options.coordinates {
            Some((latitude, longitude, elevation)) => Location::new(latitude, longitude, elevation)
                .context("Invalid coordinates on the command line")?,
            None => config.location()?.context(
                "No location given: pass LATITUDE LONGITUDE ELEVATION or set [location] in sunpredict.toml",
            )?,
        };

        let timezone = match options.timezone.as_deref() {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Unknown timezone '{name}': {e}"))?,
            None => match config.timezone()? {
                Some(tz) => tz,
                None => {
                    let tz =
                        determine_timezone_from_coordinates(location.latitude(), location.longitude());
                    log_debug!("Detected timezone {} from coordinates", tz);
                    tz
                }
            },
        };

        let terrain_path: Option<PathBuf> = if options.no_terrain {
            None
        } else if let Some(ref file) = options.terrain_file {
            Some(PathBuf::from(file))
        } else if config.include_terrain() {
            config.terrain_path()
        } else {
            None
        };
        let terrain = terrain_path
            .as_deref()
            .map(|path| load_terrain(path, config))
            .transpose()?;

        let first_day = options
            .date
            .unwrap_or_else(|| Utc::now().with_timezone(&timezone).date_naive());

        Ok(Self {
            location,
            timezone,
            first_day,
            days: options.days,
            terrain,
            search: config.search_config(),
        })
    }

    /// Compose one window per requested day, framed on local calendar days.
    pub fn compose<P: PositionProvider>(&self, provider: &P) -> Result<Vec<VisibilityWindow>> {
        let mut composer = DailyWindowComposer::new(provider, self.location, self.search);
        if let Some(ref profile) = self.terrain {
            composer = composer.with_terrain(profile);
        }

        self.first_day
            .iter_days()
            .take(self.days as usize)
            .map(|date| {
                let span = DaySpan::local(date, &self.timezone)?;
                composer
                    .compose_span(date, span)
                    .with_context(|| format!("Failed to compute the window for {date}"))
            })
            .collect()
    }
}

fn load_terrain(path: &Path, config: &Config) -> Result<TerrainProfile> {
    let profile = TerrainProfile::load_from_file(path)?.with_interpolation(config.interpolation());
    if profile.is_empty() {
        log_pipe!();
        log_warning!(
            "Terrain file {} has no usable samples; terrain is ignored",
            path.display()
        );
    }
    Ok(profile)
}

/// Run the prediction command end to end.
pub fn run_predict_command(options: &PredictOptions) -> Result<()> {
    Log::set_debug(options.debug_enabled);
    if options.json {
        Log::set_enabled(false);
    }

    log_version!();
    if options.debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled - showing search details");
    }

    let config = config::load(options.config_dir.as_deref().map(Path::new))?;
    if options.debug_enabled {
        config.log_config();
    }

    let request = PredictionRequest::resolve(options, &config)?;
    let windows = request.compose(&SpaProvider)?;

    if options.json {
        println!("{}", display::to_json(&windows, &request.timezone)?);
        return Ok(());
    }

    log_report_header(&request);
    for window in &windows {
        display::log_window(window, &request.timezone);
    }
    log_end!();
    Ok(())
}

fn log_report_header(request: &PredictionRequest) {
    let location = &request.location;
    let lat_dir = if location.latitude() >= 0.0 { "N" } else { "S" };
    let lon_dir = if location.longitude() >= 0.0 { "E" } else { "W" };
    log_block_start!(
        "Location: {:.4}°{}, {:.4}°{} at {:.0}m",
        location.latitude().abs(),
        lat_dir,
        location.longitude().abs(),
        lon_dir,
        location.elevation()
    );
    log_indented!("Timezone: {}", request.timezone);
    match request.terrain {
        Some(ref profile) if !profile.is_empty() => log_indented!(
            "Terrain: {} samples, {} interpolation",
            profile.len(),
            profile.interpolation().as_str()
        ),
        _ => log_indented!("Terrain: none (horizon only)"),
    }
}
