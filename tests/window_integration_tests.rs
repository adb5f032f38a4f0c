//! End-to-end windows computed with the NREL SPA provider.

use chrono::{Duration, NaiveDate, Timelike};
use chrono_tz::America::Denver;
use std::path::PathBuf;
use sunpredict::{
    DailyWindowComposer, DaySpan, Location, SearchConfig, SpaProvider, TerrainProfile,
};

fn albuquerque() -> Location {
    Location::new(35.1264, -106.6055, 1600.0).unwrap()
}

fn sample_terrain() -> TerrainProfile {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_terrain.json");
    TerrainProfile::load_from_file(&path).unwrap()
}

fn minutes_of_day(instant: chrono::DateTime<chrono::Utc>) -> u32 {
    let local = instant.with_timezone(&Denver);
    local.hour() * 60 + local.minute()
}

#[test]
fn test_albuquerque_winter_day() {
    let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
    let composer = DailyWindowComposer::new(&SpaProvider, albuquerque(), SearchConfig::default());

    let window = composer
        .compose_span(date, DaySpan::local(date, &Denver).unwrap())
        .unwrap();

    assert!(window.has_sunlight);
    let sunrise = window.sunrise.unwrap();
    let sunset = window.sunset.unwrap();

    // Geometric rise and set, no refraction: about 06:57 and 17:58 MST
    let rise = minutes_of_day(sunrise.instant);
    let set = minutes_of_day(sunset.instant);
    assert!((6 * 60 + 45..=7 * 60 + 15).contains(&rise), "sunrise at {rise} min");
    assert!((17 * 60 + 40..=18 * 60 + 15).contains(&set), "sunset at {set} min");

    assert!(sunrise.instant < sunset.instant);
    assert!(window.noon.altitude_deg > sunrise.altitude_deg);
    assert!(window.noon.altitude_deg > sunset.altitude_deg);
    for event in [sunrise, sunset, window.noon] {
        assert!((0.0..360.0).contains(&event.azimuth_deg));
    }
    // Rising south of east, setting south of west in February
    assert!((95.0..120.0).contains(&sunrise.azimuth_deg), "{}", sunrise.azimuth_deg);
    assert!((240.0..265.0).contains(&sunset.azimuth_deg), "{}", sunset.azimuth_deg);

    let civil_dusk = window.civil_dusk.unwrap();
    assert!(civil_dusk.instant > sunset.instant);
    assert!(civil_dusk.instant - sunset.instant < Duration::minutes(40));
}

#[test]
fn test_terrain_window_inside_horizon_window() {
    let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
    let terrain = sample_terrain();
    let composer = DailyWindowComposer::new(&SpaProvider, albuquerque(), SearchConfig::default())
        .with_terrain(&terrain);

    let window = composer
        .compose_span(date, DaySpan::local(date, &Denver).unwrap())
        .unwrap();

    assert!(window.terrain_applied);
    assert!(window.has_direct_sunlight);
    let sunrise = window.sunrise.unwrap();
    let terrain_sunrise = window.terrain_sunrise.unwrap();
    let terrain_sunset = window.terrain_sunset.unwrap();

    // The ridge to the east holds the sun back for the best part of an hour
    assert!(terrain_sunrise.instant > sunrise.instant + Duration::minutes(30));
    assert!(terrain_sunset.instant <= window.sunset.unwrap().instant);
    assert!(window.direct_sunlight_duration() <= window.horizon_duration());

    // At the reported instant the sun sits on the silhouette
    let silhouette = terrain.obstruction_angle(terrain_sunrise.azimuth_deg);
    assert!((terrain_sunrise.altitude_deg - silhouette).abs() < 0.05);
}

#[test]
fn test_polar_night() {
    let date = NaiveDate::from_ymd_opt(2026, 12, 21).unwrap();
    let location = Location::new(85.0, 0.0, 0.0).unwrap();
    let composer = DailyWindowComposer::new(&SpaProvider, location, SearchConfig::default());

    let window = composer.compose(date).unwrap();

    assert!(!window.has_sunlight);
    assert!(window.sunrise.is_none());
    assert!(window.sunset.is_none());
    assert!(window.terrain_sunrise.is_none());
    assert!(window.terrain_sunset.is_none());
    assert!(window.civil_dawn.is_none());
    assert!(window.civil_dusk.is_none());
    assert!(window.noon.altitude_deg < -15.0);
    assert_eq!(window.horizon_duration(), Duration::zero());
}

#[test]
fn test_polar_day() {
    let date = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
    let location = Location::new(80.0, 0.0, 0.0).unwrap();
    let composer = DailyWindowComposer::new(&SpaProvider, location, SearchConfig::default());

    let window = composer.compose(date).unwrap();

    assert!(window.has_sunlight);
    assert!(window.sunrise.is_none());
    assert!(window.sunset.is_none());
    assert_eq!(window.horizon_duration(), Duration::days(1));
}

#[test]
fn test_consecutive_days_lengthen_in_spring() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let composer = DailyWindowComposer::new(&SpaProvider, albuquerque(), SearchConfig::default());

    let windows = composer.compose_days(date, 5).unwrap();

    for pair in windows.windows(2) {
        assert!(pair[1].horizon_duration() > pair[0].horizon_duration());
    }
}
