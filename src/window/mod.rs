//! Daily visibility window composition.
//!
//! The composer runs the individual crossing searches for one observer and one
//! day and assembles a [`VisibilityWindow`]:
//!
//! - **Horizon window**: sunrise and sunset, backward and forward from the
//!   day's anchor at 1-minute resolution, refined to the search tolerance
//! - **Civil twilight**: dawn and dusk at the civil angle, scanned hourly
//! - **Terrain window**: when a profile is supplied, the first and last
//!   instants inside the horizon window where terrain does not hide the sun
//!
//! Days without any crossing (polar day, polar night) are ordinary results
//! with absent fields, never errors.

pub mod display;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::constants::HORIZON_ALTITUDE;
use crate::geo::{DaySpan, Location};
use crate::solar::{
    CrossingSearch, PositionProvider, SearchConfig, SearchWindow, SunEvent, Threshold,
};
use crate::terrain::TerrainProfile;

/// One day's sunlight report. All instants are UTC.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilityWindow {
    pub date: NaiveDate,
    pub span: DaySpan,
    pub location: Location,
    /// Sun position at the span's noon anchor.
    pub noon: SunEvent,
    /// The sun is above the horizon at some point of the span.
    pub has_sunlight: bool,
    pub terrain_applied: bool,
    /// The sun is above both horizon and terrain at some point of the span.
    pub has_direct_sunlight: bool,
    pub sunrise: Option<SunEvent>,
    pub sunset: Option<SunEvent>,
    pub terrain_sunrise: Option<SunEvent>,
    pub terrain_sunset: Option<SunEvent>,
    pub civil_dawn: Option<SunEvent>,
    pub civil_dusk: Option<SunEvent>,
}

impl VisibilityWindow {
    /// Start and end of the above-horizon period, clamped to the span.
    pub fn horizon_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if !self.has_sunlight {
            return None;
        }
        Some((
            self.sunrise.map_or(self.span.start, |e| e.instant),
            self.sunset.map_or(self.span.end, |e| e.instant),
        ))
    }

    /// Start and end of direct sunlight, after terrain.
    ///
    /// Without a terrain profile this is the horizon window. Periods hidden
    /// behind terrain in the middle of the day are not subtracted.
    pub fn direct_sunlight_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if !self.terrain_applied {
            return self.horizon_bounds();
        }
        if !self.has_direct_sunlight {
            return None;
        }
        let (start, end) = self.horizon_bounds()?;
        Some((
            self.terrain_sunrise.map_or(start, |e| e.instant),
            self.terrain_sunset.map_or(end, |e| e.instant),
        ))
    }

    pub fn horizon_duration(&self) -> Duration {
        self.horizon_bounds()
            .map_or(Duration::zero(), |(start, end)| end - start)
    }

    pub fn direct_sunlight_duration(&self) -> Duration {
        self.direct_sunlight_bounds()
            .map_or(Duration::zero(), |(start, end)| end - start)
    }

    /// First and last direct-sunlight events: the terrain-adjusted ones when
    /// terrain holds the sun back, otherwise sunrise and sunset.
    pub fn first_and_last_light(&self) -> (Option<SunEvent>, Option<SunEvent>) {
        if self.terrain_applied && !self.has_direct_sunlight {
            return (None, None);
        }
        (
            self.terrain_sunrise.or(self.sunrise),
            self.terrain_sunset.or(self.sunset),
        )
    }
}

/// Orchestrates crossing searches into daily visibility windows.
pub struct DailyWindowComposer<'a, P: PositionProvider> {
    search: CrossingSearch<'a, P>,
    terrain: Option<&'a TerrainProfile>,
}

impl<'a, P: PositionProvider> DailyWindowComposer<'a, P> {
    pub fn new(provider: &'a P, location: Location, config: SearchConfig) -> Self {
        Self {
            search: CrossingSearch::new(provider, location, config),
            terrain: None,
        }
    }

    /// Account for terrain obstruction in every composed window.
    pub fn with_terrain(mut self, profile: &'a TerrainProfile) -> Self {
        self.terrain = Some(profile);
        self
    }

    pub fn search(&self) -> &CrossingSearch<'a, P> {
        &self.search
    }

    /// Compose the window for `date`, framed on the observer's mean solar day.
    pub fn compose(&self, date: NaiveDate) -> Result<VisibilityWindow> {
        let span = DaySpan::mean_solar(date, self.search.location().longitude());
        self.compose_span(date, span)
    }

    /// Compose the window for `date` over an explicit UTC span.
    pub fn compose_span(&self, date: NaiveDate, span: DaySpan) -> Result<VisibilityWindow> {
        let noon = SunEvent::from(self.search.position(span.noon())?);

        let civil_dawn = self.search.civil_dawn(&span)?;
        let civil_dusk = self.search.civil_dusk(&span)?;

        let mut window = VisibilityWindow {
            date,
            span,
            location: *self.search.location(),
            noon,
            has_sunlight: false,
            terrain_applied: self.terrain.is_some(),
            has_direct_sunlight: false,
            sunrise: None,
            sunset: None,
            terrain_sunrise: None,
            terrain_sunset: None,
            civil_dawn,
            civil_dusk,
        };

        let Some(anchor) = self.daylight_anchor(&span, &noon)? else {
            log_debug!("No direct sunlight on {date}: sun stays at or below the horizon");
            return Ok(window);
        };

        window.has_sunlight = true;
        window.sunrise = self.search.sunrise(anchor, &span)?;
        window.sunset = self.search.sunset(anchor, &span)?;
        window.has_direct_sunlight = true;

        if let Some(profile) = self.terrain {
            self.apply_terrain(profile, &mut window)?;
        }

        Ok(window)
    }

    /// Compose consecutive days starting at `first`.
    pub fn compose_days(&self, first: NaiveDate, days: u32) -> Result<Vec<VisibilityWindow>> {
        first
            .iter_days()
            .take(days as usize)
            .map(|date| self.compose(date))
            .collect()
    }

    // The anchor is normally the span's noon. When the sun is down there, a
    // coarse sweep checks for a short daylight period off-noon (low sun near the
    // polar-night boundary) and anchors at the highest sample instead.
    fn daylight_anchor(&self, span: &DaySpan, noon: &SunEvent) -> Result<Option<DateTime<Utc>>> {
        if noon.altitude_deg > HORIZON_ALTITUDE {
            return Ok(Some(noon.instant));
        }

        let step = self.search.config().horizon_step;
        if step <= Duration::zero() {
            anyhow::bail!("horizon step must be positive (got {})", step);
        }

        let mut highest: Option<(DateTime<Utc>, f64)> = None;
        let mut instant = span.start;
        while instant <= span.end {
            let altitude = self.search.position(instant)?.altitude_deg;
            if highest.is_none_or(|(_, best)| altitude > best) {
                highest = Some((instant, altitude));
            }
            instant += step;
        }

        Ok(highest
            .filter(|&(_, altitude)| altitude > HORIZON_ALTITUDE)
            .map(|(instant, _)| instant))
    }

    // Terrain sunrise scans forward from the start of the horizon window and
    // terrain sunset backward from its end, so both stay inside it.
    fn apply_terrain(&self, profile: &TerrainProfile, window: &mut VisibilityWindow) -> Result<()> {
        let Some((start, end)) = window.horizon_bounds() else {
            return Ok(());
        };
        let threshold = Threshold::terrain(profile);
        let step = self.search.config().horizon_step;

        if self.search.is_blocked(&threshold, start)? {
            window.terrain_sunrise = self
                .search
                .find(&threshold, &SearchWindow::new(start, end, step))?;
            if window.terrain_sunrise.is_none() {
                log_debug!("Terrain hides the sun for the whole of {}", window.date);
                window.has_direct_sunlight = false;
                return Ok(());
            }
        }

        if self.search.is_blocked(&threshold, end)? {
            window.terrain_sunset = self
                .search
                .find(&threshold, &SearchWindow::new(end, start, step))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
