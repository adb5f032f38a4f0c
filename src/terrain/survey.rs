//! Terrain profile construction from elevation data.
//!
//! The survey walks outward from the observer along evenly spaced bearings,
//! asks an [`ElevationSource`] for the ground height at each sample point and
//! keeps the steepest elevation angle seen per bearing. Fetching elevations
//! (an HTTP service, a DEM raster) is entirely the source's business.

use anyhow::Result;

use super::TerrainProfile;
use crate::constants::*;
use crate::geo::Location;

/// Ground elevation lookup, in meters above sea level.
///
/// `Ok(None)` means "no data for this point"; the sample is skipped.
pub trait ElevationSource {
    fn elevation_at(&self, latitude: f64, longitude: f64) -> Result<Option<f64>>;
}

impl<F> ElevationSource for F
where
    F: Fn(f64, f64) -> Option<f64>,
{
    fn elevation_at(&self, latitude: f64, longitude: f64) -> Result<Option<f64>> {
        Ok(self(latitude, longitude))
    }
}

/// Sampling density of a survey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyConfig {
    pub max_distance_km: f64,
    pub num_azimuths: u32,
    pub samples_per_azimuth: u32,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            max_distance_km: DEFAULT_SURVEY_MAX_DISTANCE_KM,
            num_azimuths: DEFAULT_SURVEY_AZIMUTHS,
            samples_per_azimuth: DEFAULT_SURVEY_SAMPLES_PER_AZIMUTH,
        }
    }
}

/// Build a terrain profile around `observer`.
///
/// Source errors abort the survey. Bearings without any elevation data are
/// left out of the profile, so interpolation bridges them.
pub fn build_profile<S: ElevationSource>(
    observer: &Location,
    source: &S,
    config: &SurveyConfig,
) -> Result<TerrainProfile> {
    if config.num_azimuths == 0 || config.samples_per_azimuth == 0 {
        anyhow::bail!("survey needs at least one azimuth and one sample per azimuth");
    }
    if !(config.max_distance_km > 0.0) {
        anyhow::bail!(
            "survey max_distance_km must be positive (got {})",
            config.max_distance_km
        );
    }

    // The flat offset approximation divides by cos(latitude); it has no
    // meaningful bearings once the survey radius reaches a pole.
    let reach_deg = config.max_distance_km / KM_PER_DEGREE;
    if observer.latitude().abs() + reach_deg >= 90.0 {
        anyhow::bail!(
            "cannot survey within {:.1}km of a pole (observer latitude {})",
            config.max_distance_km,
            observer.latitude()
        );
    }

    let mut profile = TerrainProfile::from_map(std::iter::empty(), observer.elevation());

    for azimuth_idx in 0..config.num_azimuths {
        let azimuth = 360.0 / f64::from(config.num_azimuths) * f64::from(azimuth_idx);
        let mut steepest: Option<f64> = None;

        for distance_idx in 1..=config.samples_per_azimuth {
            let distance_km = config.max_distance_km / f64::from(config.samples_per_azimuth)
                * f64::from(distance_idx);
            let (lat, lon) = offset_point(
                observer.latitude(),
                observer.longitude(),
                azimuth,
                distance_km,
            );

            let Some(target_elevation) = source.elevation_at(lat, lon)? else {
                log_debug!("No elevation at {azimuth:.1}° / {distance_km:.1}km");
                continue;
            };

            let angle = elevation_angle_deg(
                observer.latitude(),
                observer.longitude(),
                observer.elevation(),
                lat,
                lon,
                target_elevation,
            );
            steepest = Some(steepest.map_or(angle, |s| s.max(angle)));
        }

        match steepest {
            Some(angle) => profile.add_sample(azimuth, angle),
            None => log_warning!("No elevation data along azimuth {:.1}°", azimuth),
        }
    }

    Ok(profile)
}

/// Great-circle ground distance between two points (meters).
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Angle from the observer up (positive) or down to a target point, in degrees.
///
/// Coincident points give 0°.
pub fn elevation_angle_deg(
    observer_lat: f64,
    observer_lon: f64,
    observer_elevation: f64,
    target_lat: f64,
    target_lon: f64,
    target_elevation: f64,
) -> f64 {
    let horizontal = haversine_distance_m(observer_lat, observer_lon, target_lat, target_lon);
    if horizontal == 0.0 {
        return 0.0;
    }
    ((target_elevation - observer_elevation) / horizontal)
        .atan()
        .to_degrees()
}

/// Initial bearing from the observer to a target, degrees clockwise from north in [0, 360).
pub fn bearing_deg(observer_lat: f64, observer_lon: f64, target_lat: f64, target_lon: f64) -> f64 {
    let lat1_rad = observer_lat.to_radians();
    let lat2_rad = target_lat.to_radians();
    let delta_lon = (target_lon - observer_lon).to_radians();

    let x = delta_lon.sin() * lat2_rad.cos();
    let y = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();
    super::normalize_azimuth(x.atan2(y).to_degrees())
}

/// Point `distance_km` away along `azimuth`, using the flat small-distance approximation.
pub fn offset_point(latitude: f64, longitude: f64, azimuth: f64, distance_km: f64) -> (f64, f64) {
    let azimuth_rad = azimuth.to_radians();
    let delta_lat = distance_km / KM_PER_DEGREE * azimuth_rad.cos();
    let delta_lon = distance_km / KM_PER_DEGREE * azimuth_rad.sin() / latitude.to_radians().cos();
    (latitude + delta_lat, longitude + delta_lon)
}
