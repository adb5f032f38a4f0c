use super::*;
use tempfile::tempdir;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_normalize_azimuth() {
    assert_eq!(normalize_azimuth(0.0), 0.0);
    assert_eq!(normalize_azimuth(360.0), 0.0);
    assert_eq!(normalize_azimuth(405.0), 45.0);
    assert_eq!(normalize_azimuth(-90.0), 270.0);
    assert!(normalize_azimuth(-1e-300) < 360.0);
}

#[test]
fn test_exact_sample_returns_stored_value() {
    let profile = TerrainProfile::from_samples([(0.0, 2.0), (90.0, 12.0), (180.0, 4.0)]);

    assert_eq!(profile.obstruction_angle(0.0), 2.0);
    assert_eq!(profile.obstruction_angle(90.0), 12.0);
    assert_eq!(profile.obstruction_angle(180.0), 4.0);
}

#[test]
fn test_linear_interpolation_between_samples() {
    let profile = TerrainProfile::from_samples([(0.0, 0.0), (90.0, 20.0)]);

    assert!(approx(profile.obstruction_angle(45.0), 10.0));
    assert!(approx(profile.obstruction_angle(22.5), 5.0));
}

#[test]
fn test_lookup_is_periodic() {
    let profile = TerrainProfile::from_samples([(0.0, 0.0), (90.0, 20.0)]);

    assert!(approx(profile.obstruction_angle(405.0), profile.obstruction_angle(45.0)));
    assert!(approx(profile.obstruction_angle(-315.0), profile.obstruction_angle(45.0)));
    assert_eq!(profile.obstruction_angle(360.0), 0.0);
}

#[test]
fn test_wraps_past_the_largest_sample() {
    let profile = TerrainProfile::from_samples([(10.0, 0.0), (300.0, 14.0)]);

    // 300 -> 370 (10°) is a 70° arc; 335 is halfway
    assert!(approx(profile.obstruction_angle(335.0), 7.0));
}

#[test]
fn test_before_smallest_sample_by_mode() {
    let circular = TerrainProfile::from_samples([(10.0, 0.0), (300.0, 14.0)]);
    let legacy = circular.clone().with_interpolation(InterpolationMode::Legacy);

    // 5° sits 65° into the 70° arc from 300° to 10°
    assert!(approx(circular.obstruction_angle(5.0), 1.0));
    assert_eq!(legacy.obstruction_angle(5.0), 0.0);

    // Past the last sample both modes wrap
    assert!(approx(legacy.obstruction_angle(335.0), 7.0));
}

#[test]
fn test_duplicate_azimuth_overwrites() {
    let profile = TerrainProfile::from_samples([(90.0, 5.0), (450.0, 9.0)]);

    assert_eq!(profile.len(), 1);
    assert_eq!(profile.obstruction_angle(90.0), 9.0);
}

#[test]
fn test_single_sample_is_constant() {
    let profile = TerrainProfile::from_samples([(123.0, 7.5)]);

    for azimuth in [0.0, 45.0, 123.0, 200.0, 359.9] {
        assert!(approx(profile.obstruction_angle(azimuth), 7.5), "azimuth {azimuth}");
    }
}

#[test]
fn test_empty_profile_never_blocks() {
    let profile = TerrainProfile::new();

    assert!(profile.is_empty());
    assert_eq!(profile.obstruction_angle(90.0), f64::NEG_INFINITY);
    assert!(!profile.is_blocked(-89.0, 90.0));
}

#[test]
fn test_sun_on_the_silhouette_is_blocked() {
    let profile = TerrainProfile::from_samples([(0.0, 5.0)]);

    assert!(profile.is_blocked(5.0, 0.0));
    assert!(profile.is_blocked(4.9, 0.0));
    assert!(!profile.is_blocked(5.1, 0.0));
}

#[test]
fn test_non_finite_azimuth_is_skipped() {
    let mut profile = TerrainProfile::new();
    profile.add_sample(f64::NAN, 3.0);
    profile.add_sample(f64::INFINITY, 3.0);

    assert!(profile.is_empty());
}

#[test]
fn test_from_json_skips_bad_entries() {
    let json = r#"{
        "elevations": { "0.0": 2.5, "north": 9.0, "90": 12.0, "180.0": "high", "450.0": 13.0 },
        "reference_elevation": 1600.0,
        "metadata": { "source": "survey" }
    }"#;

    let profile = TerrainProfile::from_json(json).unwrap();

    assert_eq!(profile.reference_elevation(), 1600.0);
    let azimuths: Vec<f64> = profile.samples().iter().map(|s| s.azimuth_deg).collect();
    assert_eq!(azimuths, vec![0.0, 90.0]);
    // "450.0" normalizes onto 90 and sorts before "90", which overwrites it
    assert_eq!(profile.obstruction_angle(90.0), 12.0);
}

#[test]
fn test_from_json_rejects_malformed_document() {
    assert!(TerrainProfile::from_json("not json").is_err());
    assert!(TerrainProfile::from_json(r#"{"elevations": [1, 2]}"#).is_err());
}

#[test]
fn test_missing_fields_default() {
    let profile = TerrainProfile::from_json("{}").unwrap();

    assert!(profile.is_empty());
    assert_eq!(profile.reference_elevation(), 0.0);
}

#[test]
fn test_save_and_load_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("profiles").join("site.json");
    let profile =
        TerrainProfile::from_map([(0.0, 1.5), (90.0, 12.25), (270.0, -0.5)], 2100.0);

    profile.save_to_file(&path).unwrap();
    let loaded = TerrainProfile::load_from_file(&path).unwrap();

    assert_eq!(loaded, profile);
}

#[test]
fn test_json_keeps_fractional_azimuths_apart() {
    let profile = TerrainProfile::from_samples([
        (0.0, 1.0),
        (12.25, 5.0),
        (12.3, 6.0),
        (180.0, 2.0),
        (359.96, 3.0),
    ]);

    let loaded = TerrainProfile::from_json(&profile.to_json().unwrap()).unwrap();

    assert_eq!(loaded.len(), 5);
    assert_eq!(loaded.obstruction_angle(0.0), 1.0);
    assert_eq!(loaded.obstruction_angle(12.25), 5.0);
    assert_eq!(loaded.obstruction_angle(359.96), 3.0);
}

#[test]
fn test_load_missing_file_names_the_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = TerrainProfile::load_from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("missing.json"));
}
