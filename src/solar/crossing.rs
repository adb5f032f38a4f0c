//! Threshold crossing search.
//!
//! Locates the instant the sun's altitude, optionally measured against an
//! azimuth-dependent terrain silhouette, crosses a threshold. The search is a
//! coarse fixed-step scan from an anchor toward a bound, followed by bisection
//! of the first bracket where `altitude - threshold` changes sign.
//!
//! ## Conventions
//!
//! - "Blocked" means `altitude - threshold <= 0`; a sun exactly on the
//!   threshold is not visible.
//! - The reported instant is the end of the final bracket on the blocked side,
//!   never the midpoint.
//! - Running out of window without a sign change is `Ok(None)`: that is how
//!   polar day and polar night look to the search.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::position::{PositionProvider, SolarPosition};
use crate::constants::*;
use crate::geo::{DaySpan, Location};
use crate::terrain::TerrainProfile;

/// Explicit search tuning, passed to the search and to the composer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Bisection stops when the bracket is no wider than this.
    pub tolerance: Duration,
    /// Coarse scan step for horizon and terrain searches.
    pub horizon_step: Duration,
    /// Coarse scan step for civil twilight searches.
    pub twilight_step: Duration,
    /// Maximum distance a twilight scan may travel from its anchor.
    pub twilight_max_span: Duration,
    /// Altitude defining civil dawn and dusk, degrees.
    pub civil_twilight_angle: f64,
    /// Which day's noon the dawn search scans backward from, relative to the target day.
    pub dawn_day_offset: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tolerance: Duration::seconds(DEFAULT_TOLERANCE_SECONDS as i64),
            horizon_step: Duration::seconds(DEFAULT_HORIZON_STEP_SECONDS as i64),
            twilight_step: Duration::minutes(DEFAULT_TWILIGHT_STEP_MINUTES as i64),
            twilight_max_span: Duration::hours(DEFAULT_TWILIGHT_MAX_SPAN_HOURS as i64),
            civil_twilight_angle: DEFAULT_CIVIL_TWILIGHT_ANGLE,
            dawn_day_offset: DEFAULT_DAWN_DAY_OFFSET,
        }
    }
}

/// The altitude a crossing is measured against.
#[derive(Debug, Clone, Copy)]
pub enum Threshold<'a> {
    /// A constant altitude (0° horizon, -6° civil twilight).
    Altitude(f64),
    /// The terrain silhouette at the sun's azimuth, never lower than `floor`.
    Terrain {
        profile: &'a TerrainProfile,
        floor: f64,
    },
}

impl Threshold<'_> {
    /// Horizon-bounded terrain threshold.
    pub fn terrain(profile: &TerrainProfile) -> Threshold<'_> {
        Threshold::Terrain {
            profile,
            floor: HORIZON_ALTITUDE,
        }
    }

    /// Threshold altitude in the direction `azimuth`.
    pub fn at(&self, azimuth: f64) -> f64 {
        match *self {
            Threshold::Altitude(altitude) => altitude,
            Threshold::Terrain { profile, floor } => profile.obstruction_angle(azimuth).max(floor),
        }
    }
}

/// Where a scan starts, where it must stop, and how far each step moves.
///
/// The direction follows from the bound: a bound before the anchor scans backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub anchor: DateTime<Utc>,
    pub bound: DateTime<Utc>,
    pub step: Duration,
}

impl SearchWindow {
    pub fn new(anchor: DateTime<Utc>, bound: DateTime<Utc>, step: Duration) -> Self {
        Self {
            anchor,
            bound,
            step,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.bound >= self.anchor
    }

    fn next(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        if self.is_forward() {
            (from + self.step).min(self.bound)
        } else {
            (from - self.step).max(self.bound)
        }
    }
}

/// Two consecutive scan samples, in scan order, whose differences have opposite signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingBracket {
    pub time_before: DateTime<Utc>,
    pub time_after: DateTime<Utc>,
    /// Whether the sun was visible at `time_before` (and so blocked at `time_after`).
    pub before_visible: bool,
}

/// Sun position at a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunEvent {
    pub instant: DateTime<Utc>,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

impl From<SolarPosition> for SunEvent {
    fn from(position: SolarPosition) -> Self {
        Self {
            instant: position.instant,
            altitude_deg: position.altitude_deg,
            azimuth_deg: position.azimuth_deg,
        }
    }
}

/// What a coarse scan found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanHit {
    /// A sample landed exactly on the threshold.
    Exact(SolarPosition),
    /// The threshold lies strictly inside this bracket.
    Bracket(CrossingBracket),
}

/// Crossing search bound to one observer and one position provider.
pub struct CrossingSearch<'a, P: PositionProvider> {
    provider: &'a P,
    location: Location,
    config: SearchConfig,
}

impl<'a, P: PositionProvider> CrossingSearch<'a, P> {
    pub fn new(provider: &'a P, location: Location, config: SearchConfig) -> Self {
        Self {
            provider,
            location,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn position(&self, instant: DateTime<Utc>) -> Result<SolarPosition> {
        self.provider.position(&self.location, instant)
    }

    /// Signed distance of the sun above `threshold` at `instant`, with the position used.
    pub fn difference(
        &self,
        threshold: &Threshold<'_>,
        instant: DateTime<Utc>,
    ) -> Result<(f64, SolarPosition)> {
        let position = self.position(instant)?;
        Ok((
            position.altitude_deg - threshold.at(position.azimuth_deg),
            position,
        ))
    }

    /// Whether the sun is at or below `threshold` at `instant`.
    pub fn is_blocked(&self, threshold: &Threshold<'_>, instant: DateTime<Utc>) -> Result<bool> {
        Ok(self.difference(threshold, instant)?.0 <= 0.0)
    }

    /// Coarse scan from `window.anchor` toward `window.bound`.
    ///
    /// The last sample is clamped onto the bound, so the whole window is covered.
    pub fn scan(&self, threshold: &Threshold<'_>, window: &SearchWindow) -> Result<Option<ScanHit>> {
        if window.step <= Duration::zero() {
            anyhow::bail!("scan step must be positive (got {})", window.step);
        }

        let (mut prev_diff, position) = self.difference(threshold, window.anchor)?;
        if prev_diff == 0.0 {
            return Ok(Some(ScanHit::Exact(position)));
        }

        let mut prev_time = window.anchor;
        while prev_time != window.bound {
            let time = window.next(prev_time);
            let (diff, position) = self.difference(threshold, time)?;

            if diff == 0.0 {
                return Ok(Some(ScanHit::Exact(position)));
            }
            if prev_diff * diff < 0.0 {
                return Ok(Some(ScanHit::Bracket(CrossingBracket {
                    time_before: prev_time,
                    time_after: time,
                    before_visible: prev_diff > 0.0,
                })));
            }

            prev_time = time;
            prev_diff = diff;
        }

        Ok(None)
    }

    /// Bisect `bracket` down to the configured tolerance.
    ///
    /// Works in either time order; returns the event at the blocked end.
    pub fn refine(&self, threshold: &Threshold<'_>, bracket: &CrossingBracket) -> Result<SunEvent> {
        if self.config.tolerance <= Duration::zero() {
            anyhow::bail!(
                "bisection tolerance must be positive (got {})",
                self.config.tolerance
            );
        }

        let (mut visible, mut blocked) = if bracket.before_visible {
            (bracket.time_before, bracket.time_after)
        } else {
            (bracket.time_after, bracket.time_before)
        };

        let mut iterations = 0u32;
        while (blocked - visible).abs() > self.config.tolerance {
            let mid = visible + (blocked - visible) / 2;
            if self.difference(threshold, mid)?.0 > 0.0 {
                visible = mid;
            } else {
                blocked = mid;
            }
            iterations += 1;
        }

        let position = self.position(blocked)?;
        log_debug!(
            "Crossing refined to {} after {} bisections (altitude {:.4}°)",
            blocked.format("%Y-%m-%d %H:%M:%S UTC"),
            iterations,
            position.altitude_deg
        );
        Ok(position.into())
    }

    /// Scan and refine: the first crossing of `threshold` inside `window`.
    pub fn find(&self, threshold: &Threshold<'_>, window: &SearchWindow) -> Result<Option<SunEvent>> {
        match self.scan(threshold, window)? {
            Some(ScanHit::Exact(position)) => Ok(Some(position.into())),
            Some(ScanHit::Bracket(bracket)) => self.refine(threshold, &bracket).map(Some),
            None => Ok(None),
        }
    }

    /// Last horizon crossing before the anchor of a visible period, scanning back to `span.start`.
    pub fn sunrise(&self, anchor: DateTime<Utc>, span: &DaySpan) -> Result<Option<SunEvent>> {
        let window = SearchWindow::new(anchor, span.start, self.config.horizon_step);
        self.find(&Threshold::Altitude(HORIZON_ALTITUDE), &window)
    }

    /// First horizon crossing after the anchor, scanning forward to `span.end`.
    pub fn sunset(&self, anchor: DateTime<Utc>, span: &DaySpan) -> Result<Option<SunEvent>> {
        let window = SearchWindow::new(anchor, span.end, self.config.horizon_step);
        self.find(&Threshold::Altitude(HORIZON_ALTITUDE), &window)
    }

    /// Civil dusk: forward from the day's noon, at most `twilight_max_span` ahead.
    pub fn civil_dusk(&self, span: &DaySpan) -> Result<Option<SunEvent>> {
        let anchor = span.noon();
        let window = SearchWindow::new(
            anchor,
            anchor + self.config.twilight_max_span,
            self.config.twilight_step,
        );
        self.find(&Threshold::Altitude(self.config.civil_twilight_angle), &window)
    }

    /// Civil dawn: backward from the noon `dawn_day_offset` days from the target
    /// day, at most `twilight_max_span` back.
    pub fn civil_dawn(&self, span: &DaySpan) -> Result<Option<SunEvent>> {
        let anchor = span.shifted_days(self.config.dawn_day_offset).noon();
        let window = SearchWindow::new(
            anchor,
            anchor - self.config.twilight_max_span,
            self.config.twilight_step,
        );
        self.find(&Threshold::Altitude(self.config.civil_twilight_angle), &window)
    }
}
