//! Configuration validation functionality.
//!
//! Every numeric field is range-checked so that a bad value is reported with
//! its name instead of surfacing later as a silent search failure.

use anyhow::Result;
use chrono_tz::Tz;
use std::fmt::Display;

use super::Config;
use crate::constants::*;

/// Validate all configured values.
pub fn validate_config(config: &Config) -> Result<()> {
    let location = &config.location;

    if let Some(lat) = location.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = location.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if location.latitude.is_some() != location.longitude.is_some() {
        anyhow::bail!("latitude and longitude must be configured together");
    }

    if location.latitude.is_some() && location.elevation.is_none() {
        anyhow::bail!("elevation must be configured together with latitude and longitude");
    }

    if let Some(elevation) = location.elevation
        && !elevation.is_finite()
    {
        anyhow::bail!("elevation must be a finite number of meters (got {})", elevation);
    }

    if let Some(ref name) = location.timezone
        && name.parse::<Tz>().is_err()
    {
        anyhow::bail!("timezone '{}' is not a known IANA timezone name", name);
    }

    let search = &config.search;
    check_range(
        "tolerance_seconds",
        search.tolerance_seconds,
        MINIMUM_TOLERANCE_SECONDS,
        MAXIMUM_TOLERANCE_SECONDS,
        "seconds",
    )?;
    check_range(
        "horizon_step_seconds",
        search.horizon_step_seconds,
        MINIMUM_HORIZON_STEP_SECONDS,
        MAXIMUM_HORIZON_STEP_SECONDS,
        "seconds",
    )?;
    check_range(
        "twilight_step_minutes",
        search.twilight_step_minutes,
        MINIMUM_TWILIGHT_STEP_MINUTES,
        MAXIMUM_TWILIGHT_STEP_MINUTES,
        "minutes",
    )?;
    check_range(
        "twilight_max_span_hours",
        search.twilight_max_span_hours,
        MINIMUM_TWILIGHT_MAX_SPAN_HOURS,
        MAXIMUM_TWILIGHT_MAX_SPAN_HOURS,
        "hours",
    )?;
    check_range(
        "civil_twilight_angle",
        search.civil_twilight_angle,
        MINIMUM_CIVIL_TWILIGHT_ANGLE,
        MAXIMUM_CIVIL_TWILIGHT_ANGLE,
        "degrees",
    )?;
    check_range(
        "dawn_day_offset",
        search.dawn_day_offset,
        MINIMUM_DAWN_DAY_OFFSET,
        MAXIMUM_DAWN_DAY_OFFSET,
        "days",
    )?;

    // The twilight scan must be able to take at least one step
    let step_minutes = search
        .twilight_step_minutes
        .unwrap_or(DEFAULT_TWILIGHT_STEP_MINUTES);
    let span_hours = search
        .twilight_max_span_hours
        .unwrap_or(DEFAULT_TWILIGHT_MAX_SPAN_HOURS);
    if step_minutes > span_hours * 60 {
        anyhow::bail!(
            "twilight_step_minutes ({}) must not exceed twilight_max_span_hours ({} hours)",
            step_minutes,
            span_hours
        );
    }

    if config.include_terrain() && config.prediction.terrain_file.is_none() {
        anyhow::bail!("include_terrain requires terrain_file to be set in [prediction]");
    }

    Ok(())
}

// NaN fails the range check as well, so it needs no separate case.
fn check_range<T>(name: &str, value: Option<T>, min: T, max: T, unit: &str) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    if let Some(value) = value
        && !(min..=max).contains(&value)
    {
        anyhow::bail!(
            "{} ({} {}) must be between {} and {} {}",
            name,
            value,
            unit,
            min,
            max,
            unit
        );
    }
    Ok(())
}
