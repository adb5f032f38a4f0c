//! Human and JSON rendering of visibility windows.
//!
//! Windows carry UTC instants only. Rendering converts them into a display
//! timezone; the human report goes through the logger, the JSON document is
//! returned as a string for the caller to print.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::VisibilityWindow;
use crate::solar::SunEvent;

/// Format a duration as `10h 32m`, or `45m` under an hour.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m")
    }
}

/// Local wall-clock time of an instant, with the offset abbreviation.
pub fn format_instant(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%H:%M:%S %Z").to_string()
}

fn format_event(event: Option<&SunEvent>, tz: &Tz, missing: &str) -> String {
    match event {
        Some(event) => format!(
            "{} (azimuth {:.1}°)",
            format_instant(event.instant, tz),
            event.azimuth_deg
        ),
        None => missing.to_string(),
    }
}

/// Print one day's report through the box-drawing logger.
pub fn log_window(window: &VisibilityWindow, tz: &Tz) {
    log_block_start!("{}", window.date.format("%A, %Y-%m-%d"));

    if !window.has_sunlight {
        log_indented!("           Sun: below the horizon all day");
        log_indented!("    Solar noon: altitude {:.2}°", window.noon.altitude_deg);
        log_twilight(window, tz);
        return;
    }

    // Polar day keeps the sun up, so rise and set are absent rather than missing
    let up_all_day = "sun up all day";
    log_indented!(
        "       Sunrise: {}",
        format_event(window.sunrise.as_ref(), tz, up_all_day)
    );
    log_indented!(
        "    Solar noon: {} (altitude {:.2}°)",
        format_instant(window.noon.instant, tz),
        window.noon.altitude_deg
    );
    log_indented!(
        "        Sunset: {}",
        format_event(window.sunset.as_ref(), tz, up_all_day)
    );
    log_indented!("  Horizon time: {}", format_duration(window.horizon_duration()));

    if window.terrain_applied {
        if window.has_direct_sunlight {
            log_indented!(
                " Terrain rise: {}",
                format_event(window.terrain_sunrise.as_ref(), tz, "clear of terrain")
            );
            log_indented!(
                "  Terrain set: {}",
                format_event(window.terrain_sunset.as_ref(), tz, "clear of terrain")
            );
        } else {
            log_indented!("       Terrain: hides the sun all day");
        }
        log_indented!(
            " Direct sunlight: {}",
            format_duration(window.direct_sunlight_duration())
        );
    }

    log_twilight(window, tz);
}

fn log_twilight(window: &VisibilityWindow, tz: &Tz) {
    log_indented!(
        "    Civil dawn: {}{}",
        format_event(window.civil_dawn.as_ref(), tz, "none"),
        outside_day_marker(window, window.civil_dawn.as_ref())
    );
    log_indented!(
        "    Civil dusk: {}{}",
        format_event(window.civil_dusk.as_ref(), tz, "none"),
        outside_day_marker(window, window.civil_dusk.as_ref())
    );
}

// Twilight searches may reach into the neighbouring days.
fn outside_day_marker(window: &VisibilityWindow, event: Option<&SunEvent>) -> &'static str {
    match event {
        Some(event) if event.instant < window.span.start => " (previous day)",
        Some(event) if !window.span.contains(event.instant) => " (next day)",
        _ => "",
    }
}

#[derive(Debug, Serialize)]
struct EventReport {
    local: String,
    utc: DateTime<Utc>,
    altitude_deg: f64,
    azimuth_deg: f64,
}

impl EventReport {
    fn new(event: &SunEvent, tz: &Tz) -> Self {
        Self {
            local: event.instant.with_timezone(tz).to_rfc3339(),
            utc: event.instant,
            altitude_deg: event.altitude_deg,
            azimuth_deg: event.azimuth_deg,
        }
    }
}

#[derive(Debug, Serialize)]
struct DayReport {
    date: String,
    has_sunlight: bool,
    has_direct_sunlight: bool,
    terrain_applied: bool,
    noon: EventReport,
    sunrise: Option<EventReport>,
    sunset: Option<EventReport>,
    terrain_sunrise: Option<EventReport>,
    terrain_sunset: Option<EventReport>,
    civil_dawn: Option<EventReport>,
    civil_dusk: Option<EventReport>,
    first_light: Option<EventReport>,
    last_light: Option<EventReport>,
    horizon_seconds: i64,
    direct_sunlight_seconds: i64,
}

impl DayReport {
    fn new(window: &VisibilityWindow, tz: &Tz) -> Self {
        let event = |e: &Option<SunEvent>| e.as_ref().map(|e| EventReport::new(e, tz));
        let (first_light, last_light) = window.first_and_last_light();
        Self {
            date: window.date.format("%Y-%m-%d").to_string(),
            has_sunlight: window.has_sunlight,
            has_direct_sunlight: window.has_direct_sunlight,
            terrain_applied: window.terrain_applied,
            noon: EventReport::new(&window.noon, tz),
            sunrise: event(&window.sunrise),
            sunset: event(&window.sunset),
            terrain_sunrise: event(&window.terrain_sunrise),
            terrain_sunset: event(&window.terrain_sunset),
            civil_dawn: event(&window.civil_dawn),
            civil_dusk: event(&window.civil_dusk),
            first_light: event(&first_light),
            last_light: event(&last_light),
            horizon_seconds: window.horizon_duration().num_seconds(),
            direct_sunlight_seconds: window.direct_sunlight_duration().num_seconds(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    timezone: String,
    days: Vec<DayReport>,
}

/// Render windows as a pretty-printed JSON document with local and UTC times.
pub fn to_json(windows: &[VisibilityWindow], tz: &Tz) -> Result<String> {
    let Some(first) = windows.first() else {
        anyhow::bail!("No prediction days to render");
    };
    let report = Report {
        latitude: first.location.latitude(),
        longitude: first.location.longitude(),
        elevation: first.location.elevation(),
        timezone: tz.name().to_string(),
        days: windows.iter().map(|w| DayReport::new(w, tz)).collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
