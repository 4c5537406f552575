//! Whole recorded tracks.
//!
//! A [`Track`] is immutable once built. Splitting yields independent
//! [`Segment`]s, and altitude correction yields a new `Track`.

use log::{debug, info};
use time::Duration;

use crate::error::{Error, Result};
use crate::geodesic::rate;
use crate::point::GeoPoint;
use crate::segment::{Segment, TimeWindow};

/// Vertical speed in m/s above which altitude correction clamps a point
/// when the caller has no better bound.
pub const DEFAULT_MAX_VERTICAL_SPEED: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    points: Segment,
}

impl Track {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self {
            points: Segment::new(points),
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        self.points.points()
    }

    /// The whole track as a single segment.
    pub fn segment(&self) -> &Segment {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cut the track into consecutive windows of `interval`.
    ///
    /// Yields `floor(duration / interval) + 1` segments, so a track
    /// whose duration is an exact multiple of `interval` gets a trailing
    /// window that holds only the final point. Windows are closed on both
    /// ends; a point on a shared boundary lands in both neighbours.
    pub fn split(&self, interval: Duration) -> Result<Vec<Segment>> {
        let step = interval.whole_seconds();
        if step < 1 {
            return Err(Error::Configuration(format!(
                "split interval must be at least one second, got {interval}"
            )));
        }

        let total = self.points.duration()?.whole_seconds();
        let start = match self.points.first() {
            Some(p) => p.epoch_seconds(),
            None => return Err(Error::InsufficientPoints { required: 1, actual: 0 }),
        };
        let count = total.max(0) / step + 1;

        Ok((0..count)
            .map(|i| {
                // Saturate so an interval longer than any real track still
                // yields one window holding everything.
                let from = start.saturating_add(i.saturating_mul(step));
                let to = start.saturating_add((i + 1).saturating_mul(step));
                Segment::within_window(self.points(), TimeWindow::from_seconds(from, to))
            })
            .collect())
    }

    /// Highest average speed (m/s) among the `interval` splits.
    ///
    /// Splits whose speed is undefined (empty, single point, or no
    /// moving time left) are left out. Returns 0 when none is defined.
    pub fn top_speed(&self, interval: Duration, autopause: bool) -> Result<f64> {
        let mut top = 0.0_f64;
        for (i, segment) in self.split(interval)?.iter().enumerate() {
            match segment.speed(autopause) {
                Ok(speed) => top = top.max(speed),
                Err(e @ (Error::DegenerateDuration | Error::InsufficientPoints { .. })) => {
                    debug!("split {i} has no defined speed: {e}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(top)
    }

    /// Copy of this track with implausible elevation jumps flattened.
    ///
    /// Walks the points left to right. Whenever the climb or descent to
    /// the next point is faster than `max_vertical_speed` (m/s), the next
    /// point's elevation is pulled to the steepest allowed value in the
    /// same direction. Corrections cascade: each step compares against
    /// the already corrected previous point. Pairs without a positive
    /// time delta are left as they are.
    ///
    /// The bound is `max_vertical_speed * Δt`: a 100 m jump over 60 s
    /// with a 1 m/s limit becomes a 60 m climb, not 1 m.
    pub fn correct_altitude(&self, max_vertical_speed: f64) -> Result<Track> {
        if !(max_vertical_speed.is_finite() && max_vertical_speed > 0.0) {
            return Err(Error::Configuration(format!(
                "max vertical speed must be positive, got {max_vertical_speed}"
            )));
        }

        let mut points = self.points().to_vec();
        let mut clamped = 0usize;

        for i in 1..points.len() {
            let prev = points[i - 1];
            let curr = points[i];
            let prev_ele = prev.elevation().ok_or(Error::MissingElevation { index: i - 1 })?;
            let curr_ele = curr.elevation().ok_or(Error::MissingElevation { index: i })?;

            let climb = curr_ele - prev_ele;
            let elapsed = curr.timestamp() - prev.timestamp();
            let vertical_speed = match rate(climb.abs(), elapsed) {
                Ok(v) => v,
                Err(Error::DegenerateDuration) => continue,
                Err(e) => return Err(e),
            };

            if vertical_speed > max_vertical_speed {
                let limit = max_vertical_speed * elapsed.as_seconds_f64();
                let corrected = prev_ele + climb.signum() * limit;
                debug!(
                    "point {i}: elevation {curr_ele:.1} m -> {corrected:.1} m ({vertical_speed:.2} m/s)"
                );
                points[i] = curr.with_elevation(corrected);
                clamped += 1;
            }
        }

        info!("Altitude correction clamped {clamped} of {} points", points.len());
        Ok(Track::new(points))
    }

    /// Number of points whose elevation differs from the point at the
    /// same index in `other`.
    pub fn count_changed_elevations(&self, other: &Track) -> usize {
        self.points()
            .iter()
            .zip(other.points())
            .filter(|(a, b)| a.elevation() != b.elevation())
            .count()
    }
}

impl From<Vec<GeoPoint>> for Track {
    fn from(points: Vec<GeoPoint>) -> Self {
        Track::new(points)
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.points, f)
    }
}
