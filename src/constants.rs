//! Application-wide defaults and limits.
//!
//! Search parameters here are only defaults: they feed `SearchConfig::default()`
//! and the configuration layer, and every one of them can be overridden.

// # Crossing search defaults

/// Bisection stops once the bracket is at most this wide (seconds).
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 1;
/// Coarse scan increment for horizon and terrain searches (seconds).
pub const DEFAULT_HORIZON_STEP_SECONDS: u64 = 60;
/// Coarse scan increment for civil twilight searches (minutes).
pub const DEFAULT_TWILIGHT_STEP_MINUTES: u64 = 60;
/// How far a twilight scan may run from its anchor before giving up (hours).
pub const DEFAULT_TWILIGHT_MAX_SPAN_HOURS: u64 = 24;
/// Sun altitude marking civil dawn and dusk (degrees).
pub const DEFAULT_CIVIL_TWILIGHT_ANGLE: f64 = -6.0;
/// Day offset of the noon the dawn search scans backward from.
pub const DEFAULT_DAWN_DAY_OFFSET: i64 = -1;
/// Horizon altitude (degrees).
pub const HORIZON_ALTITUDE: f64 = 0.0;

// # Validation limits

pub const MINIMUM_TOLERANCE_SECONDS: u64 = 1;
pub const MAXIMUM_TOLERANCE_SECONDS: u64 = 60;
pub const MINIMUM_HORIZON_STEP_SECONDS: u64 = 5;
pub const MAXIMUM_HORIZON_STEP_SECONDS: u64 = 1800;
pub const MINIMUM_TWILIGHT_STEP_MINUTES: u64 = 1;
pub const MAXIMUM_TWILIGHT_STEP_MINUTES: u64 = 180;
pub const MINIMUM_TWILIGHT_MAX_SPAN_HOURS: u64 = 1;
pub const MAXIMUM_TWILIGHT_MAX_SPAN_HOURS: u64 = 48;
pub const MINIMUM_CIVIL_TWILIGHT_ANGLE: f64 = -18.0;
pub const MAXIMUM_CIVIL_TWILIGHT_ANGLE: f64 = 0.0;
pub const MINIMUM_DAWN_DAY_OFFSET: i64 = -1;
pub const MAXIMUM_DAWN_DAY_OFFSET: i64 = 0;
pub const MAXIMUM_PREDICTION_DAYS: u32 = 366;

// # Terrain survey defaults

pub const DEFAULT_SURVEY_MAX_DISTANCE_KM: f64 = 10.0;
pub const DEFAULT_SURVEY_AZIMUTHS: u32 = 36;
pub const DEFAULT_SURVEY_SAMPLES_PER_AZIMUTH: u32 = 5;
/// Mean Earth radius used for ground distances (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
/// Kilometers per degree of latitude, as used by the survey's offset approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

// # Files

pub const CONFIG_DIR_NAME: &str = "sunpredict";
pub const CONFIG_FILE_NAME: &str = "sunpredict.toml";

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
