//! Observer location and prediction-day framing.
//!
//! A [`Location`] is validated once at construction and is immutable afterwards.
//! A [`DaySpan`] is the UTC interval one prediction covers; any local or naive
//! calendar reasoning is resolved here, before the solar searches see an instant.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;


/// Geographic observer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    elevation: f64,
}

impl Location {
    /// Create a validated location.
    ///
    /// # Arguments
    /// * `latitude` - Degrees, -90 to +90 (negative for south)
    /// * `longitude` - Degrees, -180 to +180 (negative for west)
    /// * `elevation` - Meters above sea level
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            anyhow::bail!(
                "latitude must be between -90 and 90 degrees (got {})",
                latitude
            );
        }
        if !(-180.0..=180.0).contains(&longitude) {
            anyhow::bail!(
                "longitude must be between -180 and 180 degrees (got {})",
                longitude
            );
        }
        if !elevation.is_finite() {
            anyhow::bail!("elevation must be a finite number of meters (got {})", elevation);
        }

        Ok(Self {
            latitude,
            longitude,
            elevation,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }
}

/// The UTC interval covered by one prediction day.
///
/// Searches anchor at [`DaySpan::noon`] and never produce instants outside
/// `[start, end]`, except the dawn search which is explicitly allowed to look
/// into the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DaySpan {
    /// The UTC calendar day: 00:00 to 24:00 UTC, anchored at 12:00 UTC.
    pub fn utc(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// The 24 hours centred on mean local solar noon at `longitude`.
    ///
    /// Mean solar noon is 12:00 UTC shifted by four minutes per degree of
    /// longitude, so at the prime meridian this equals [`DaySpan::utc`].
    pub fn mean_solar(date: NaiveDate, longitude: f64) -> Self {
        let shift = Duration::milliseconds((-longitude / 15.0 * 3_600_000.0).round() as i64);
        let utc = Self::utc(date);
        Self {
            start: utc.start + shift,
            end: utc.end + shift,
        }
    }

    /// Local midnight to local midnight in `tz`, converted to UTC.
    ///
    /// On daylight saving changes the span is 23 or 25 hours long.
    pub fn local(date: NaiveDate, tz: &Tz) -> Result<Self> {
        let next = date
            .succ_opt()
            .with_context(|| format!("No calendar day after {date}"))?;
        Ok(Self {
            start: local_midnight(date, tz)?,
            end: local_midnight(next, tz)?,
        })
    }

    /// Midpoint of the span, the anchor for noon-based scans.
    pub fn noon(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The same framing shifted by whole days.
    pub fn shifted_days(&self, days: i64) -> Self {
        Self {
            start: self.start + Duration::days(days),
            end: self.end + Duration::days(days),
        }
    }
}

// Midnight can be skipped by a DST change in some zones; the earliest valid
// instant of the day is used then.
fn local_midnight(date: NaiveDate, tz: &Tz) -> Result<DateTime<Utc>> {
    let mut naive = date.and_time(NaiveTime::MIN);
    for _ in 0..4 {
        if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
            return Ok(dt.with_timezone(&Utc));
        }
        naive += Duration::minutes(30);
    }
    anyhow::bail!("Could not resolve local midnight of {date} in {tz}")
}

/// Determine the timezone for given coordinates using timezone boundary data.
///
/// Falls back to UTC for coordinates without a named zone.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    use std::sync::OnceLock;
    use tzf_rs::DefaultFinder;

    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs uses (longitude, latitude) order
    finder
        .get_tz_name(longitude, latitude)
        .parse::<Tz>()
        .unwrap_or(Tz::UTC)
}
