use super::*;
use crate::solar::position::testing::SyntheticSun;
use chrono::TimeZone;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap()
}

fn equator() -> Location {
    Location::new(0.0, 0.0, 0.0).unwrap()
}

fn close(a: DateTime<Utc>, b: DateTime<Utc>, seconds: f64) -> bool {
    (a - b).num_milliseconds().abs() as f64 / 1000.0 <= seconds
}

#[test]
fn test_ordinary_day() {
    let sun = SyntheticSun::new(noon(), 60.0, -20.0);
    let (rise, set) = sun.crossings(0.0).unwrap();
    let composer = DailyWindowComposer::new(&sun, equator(), SearchConfig::default());

    let window = composer.compose(date()).unwrap();

    assert!(window.has_sunlight);
    assert!(window.has_direct_sunlight);
    assert!(!window.terrain_applied);
    assert_eq!(window.noon.instant, noon());

    let sunrise = window.sunrise.unwrap();
    let sunset = window.sunset.unwrap();
    assert!(close(sunrise.instant, rise, 1.0));
    assert!(close(sunset.instant, set, 1.0));
    assert!(sunrise.instant < window.noon.instant && window.noon.instant < sunset.instant);
    assert!(window.noon.altitude_deg > sunrise.altitude_deg);
    assert!(window.noon.altitude_deg > sunset.altitude_deg);

    assert_eq!(window.horizon_duration(), sunset.instant - sunrise.instant);
    assert_eq!(window.direct_sunlight_duration(), window.horizon_duration());
    assert_eq!(window.first_and_last_light(), (window.sunrise, window.sunset));
}

#[test]
fn test_polar_night_has_no_events() {
    let sun = SyntheticSun::new(noon(), 10.0, -30.0);
    let composer = DailyWindowComposer::new(&sun, equator(), SearchConfig::default());

    let window = composer.compose(date()).unwrap();

    assert!(!window.has_sunlight);
    assert!(!window.has_direct_sunlight);
    assert!(window.sunrise.is_none());
    assert!(window.sunset.is_none());
    assert!(window.terrain_sunrise.is_none());
    assert!(window.terrain_sunset.is_none());
    assert!(window.civil_dawn.is_none());
    assert!(window.civil_dusk.is_none());
    assert_eq!(window.horizon_duration(), Duration::zero());
    assert_eq!(window.direct_sunlight_duration(), Duration::zero());
}

#[test]
fn test_polar_day_spans_the_whole_day() {
    let sun = SyntheticSun::new(noon(), 10.0, 30.0);
    let composer = DailyWindowComposer::new(&sun, equator(), SearchConfig::default());

    let window = composer.compose(date()).unwrap();

    assert!(window.has_sunlight);
    assert!(window.sunrise.is_none());
    assert!(window.sunset.is_none());
    assert_eq!(window.horizon_duration(), Duration::days(1));
    assert_eq!(window.horizon_bounds(), Some((window.span.start, window.span.end)));
}

#[test]
fn test_terrain_narrows_the_window() {
    let sun = SyntheticSun::new(noon(), 60.0, -20.0);
    let (ridge_rise, ridge_set) = sun.crossings(8.0).unwrap();
    let profile = TerrainProfile::from_samples([(0.0, 8.0), (180.0, 8.0)]);
    let composer =
        DailyWindowComposer::new(&sun, equator(), SearchConfig::default()).with_terrain(&profile);

    let window = composer.compose(date()).unwrap();

    assert!(window.terrain_applied);
    assert!(window.has_direct_sunlight);
    let terrain_sunrise = window.terrain_sunrise.unwrap();
    let terrain_sunset = window.terrain_sunset.unwrap();
    assert!(close(terrain_sunrise.instant, ridge_rise, 1.0));
    assert!(close(terrain_sunset.instant, ridge_set, 1.0));

    assert!(window.sunrise.unwrap().instant <= terrain_sunrise.instant);
    assert!(terrain_sunset.instant <= window.sunset.unwrap().instant);
    assert!(window.direct_sunlight_duration() < window.horizon_duration());
    assert_eq!(
        window.first_and_last_light(),
        (window.terrain_sunrise, window.terrain_sunset)
    );
}

#[test]
fn test_terrain_below_horizon_matches_horizon_window() {
    let sun = SyntheticSun::new(noon(), 60.0, -20.0);
    let profile = TerrainProfile::from_samples([(0.0, -5.0)]);
    let composer =
        DailyWindowComposer::new(&sun, equator(), SearchConfig::default()).with_terrain(&profile);

    let window = composer.compose(date()).unwrap();

    let difference = window.horizon_duration() - window.direct_sunlight_duration();
    assert!(difference >= Duration::zero());
    assert!(difference <= Duration::seconds(2));
}

#[test]
fn test_terrain_hiding_the_whole_day() {
    let sun = SyntheticSun::new(noon(), 60.0, -20.0);
    // Peak altitude is 40°
    let profile = TerrainProfile::from_samples([(0.0, 50.0)]);
    let composer =
        DailyWindowComposer::new(&sun, equator(), SearchConfig::default()).with_terrain(&profile);

    let window = composer.compose(date()).unwrap();

    assert!(window.has_sunlight);
    assert!(!window.has_direct_sunlight);
    assert!(window.sunrise.is_some());
    assert!(window.terrain_sunrise.is_none());
    assert!(window.terrain_sunset.is_none());
    assert_eq!(window.direct_sunlight_duration(), Duration::zero());
    assert_eq!(window.first_and_last_light(), (None, None));
    assert!(window.horizon_duration() > Duration::hours(9));
}

#[test]
fn test_daylight_away_from_noon_is_found() {
    // Short daylight around 05:00 UTC while the span's noon is deep in the night
    let solar_noon = Utc.with_ymd_and_hms(2026, 3, 20, 5, 0, 0).unwrap();
    let sun = SyntheticSun::new(solar_noon, 60.0, -50.0);
    let (rise, set) = sun.crossings(0.0).unwrap();
    let composer = DailyWindowComposer::new(&sun, equator(), SearchConfig::default());

    let window = composer.compose(date()).unwrap();

    assert!(window.noon.altitude_deg < 0.0);
    assert!(window.has_sunlight);
    assert!(close(window.sunrise.unwrap().instant, rise, 1.0));
    assert!(close(window.sunset.unwrap().instant, set, 1.0));
}

#[test]
fn test_western_longitude_frames_on_mean_solar_noon() {
    let sun = SyntheticSun::new(noon(), 60.0, -20.0);
    let location = Location::new(10.0, -90.0, 0.0).unwrap();
    let composer = DailyWindowComposer::new(&sun, location, SearchConfig::default());

    let window = composer.compose(date()).unwrap();

    let expected_noon = Utc.with_ymd_and_hms(2026, 3, 20, 18, 0, 0).unwrap();
    assert_eq!(window.span.noon(), expected_noon);
    assert_eq!(window.noon.instant, expected_noon);
    assert_eq!(window.location, location);
}

#[test]
fn test_explicit_span() {
    let sun = SyntheticSun::new(noon(), 60.0, -20.0);
    let composer = DailyWindowComposer::new(&sun, equator(), SearchConfig::default());
    let span = DaySpan::local(date(), &chrono_tz::Europe::Paris).unwrap();

    let window = composer.compose_span(date(), span).unwrap();

    assert_eq!(window.span, span);
    assert_eq!(window.noon.instant, span.noon());
    assert!(window.sunrise.is_some() && window.sunset.is_some());
}

#[test]
fn test_compose_days_is_consecutive() {
    let sun = SyntheticSun::new(noon(), 60.0, -20.0);
    let composer = DailyWindowComposer::new(&sun, equator(), SearchConfig::default());

    let windows = composer.compose_days(date(), 3).unwrap();

    let dates: Vec<NaiveDate> = windows.iter().map(|w| w.date).collect();
    assert_eq!(
        dates,
        vec![
            date(),
            NaiveDate::from_ymd_opt(2026, 3, 21).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 22).unwrap(),
        ]
    );
}

#[test]
fn test_provider_failure_is_an_error() {
    let sun = SyntheticSun::new(noon(), 60.0, -20.0).failing_after(5);
    let composer = DailyWindowComposer::new(&sun, equator(), SearchConfig::default());

    assert!(composer.compose(date()).is_err());
}

#[test]
fn test_zero_horizon_step_is_an_error() {
    // Sun down at noon, so the off-noon daylight sweep runs
    let solar_noon = Utc.with_ymd_and_hms(2026, 3, 20, 5, 0, 0).unwrap();
    let sun = SyntheticSun::new(solar_noon, 60.0, -50.0);
    let config = SearchConfig {
        horizon_step: Duration::zero(),
        ..SearchConfig::default()
    };
    let composer = DailyWindowComposer::new(&sun, equator(), config);

    let err = composer.compose(date()).unwrap_err();
    assert!(err.to_string().contains("horizon step"));
}
