//! Time-bounded views of a track and their metrics.
//!
//! A [`Segment`] is a plain list of points. Metrics are recomputed on
//! every call; nothing is cached.

use std::fmt;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::error::{Error, Result};
use crate::geodesic::{self, rate};
use crate::point::GeoPoint;

/// Speed in m/s under which a pair of points counts as paused when
/// [`Segment::speed`] is asked for autopause (3.6 km/h).
pub const DEFAULT_PAUSE_SPEED: f64 = 1.0;

/// Closed time window `[start, end]` at whole-second granularity.
///
/// Both ends are inclusive, so a point stamped exactly on the shared
/// boundary of two adjacent windows belongs to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            start: start.unix_timestamp(),
            end: end.unix_timestamp(),
        }
    }

    /// Window over whole epoch seconds `[start, end]`.
    pub fn from_seconds(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        let s = point.epoch_seconds();
        self.start <= s && s <= self.end
    }

    pub fn start_seconds(&self) -> i64 {
        self.start
    }

    pub fn end_seconds(&self) -> i64 {
        self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    points: Vec<GeoPoint>,
}

impl Segment {
    /// Segment over exactly these points, unfiltered.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Segment over every point of `points` whose timestamp lies in
    /// `[start, end]`, compared in whole seconds.
    pub fn within(points: &[GeoPoint], start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self::within_window(points, TimeWindow::new(start, end))
    }

    pub fn within_window(points: &[GeoPoint], window: TimeWindow) -> Self {
        Self {
            points: points.iter().filter(|p| window.contains(p)).copied().collect(),
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&GeoPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&GeoPoint> {
        self.points.last()
    }

    /// Window spanned by the first and last point, if any.
    pub fn window(&self) -> Option<TimeWindow> {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => Some(TimeWindow::new(a.timestamp(), b.timestamp())),
            _ => None,
        }
    }

    /// Distance travelled in meters.
    pub fn distance(&self) -> f64 {
        geodesic::path_length(&self.points)
    }

    /// Time between the first and the last point.
    pub fn duration(&self) -> Result<Duration> {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => Ok(last.timestamp() - first.timestamp()),
            _ => Err(Error::InsufficientPoints {
                required: 1,
                actual: 0,
            }),
        }
    }

    /// Total time spent between consecutive points moving slower than
    /// `max_speed` (m/s).
    ///
    /// Pairs without a positive time delta are neither moving nor paused
    /// and contribute nothing.
    pub fn paused_duration(&self, max_speed: f64) -> Duration {
        self.points
            .windows(2)
            .filter_map(|w| {
                let elapsed = w[1].timestamp() - w[0].timestamp();
                let speed = rate(geodesic::distance(&w[0], &w[1]), elapsed).ok()?;
                (speed < max_speed).then_some(elapsed)
            })
            .fold(Duration::ZERO, |acc, d| acc + d)
    }

    /// Average speed in m/s.
    ///
    /// With `autopause`, time paused under [`DEFAULT_PAUSE_SPEED`] is
    /// taken out of the denominator. Fails with
    /// [`Error::DegenerateDuration`] when no time is left to divide by,
    /// including when paused time exceeds the segment's duration.
    pub fn speed(&self, autopause: bool) -> Result<f64> {
        let mut elapsed = self.duration()?;
        if autopause {
            elapsed -= self.paused_duration(DEFAULT_PAUSE_SPEED);
        }
        rate(self.distance(), elapsed)
    }

    pub fn summary(&self) -> Summary {
        let window = self.window();
        Summary {
            start_s: window.map(|w| w.start_seconds()),
            end_s: window.map(|w| w.end_seconds()),
            points: self.len(),
            distance_m: self.distance(),
            duration_s: self.duration().ok().map(|d| d.as_seconds_f64()),
            speed_mps: self.speed(false).ok(),
            speed_autopause_mps: self.speed(true).ok(),
        }
    }
}

impl<'a> IntoIterator for &'a Segment {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Serializable snapshot of a segment's metrics.
///
/// Metrics that are undefined for the segment (empty, single point,
/// fully paused) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_s: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_s: Option<i64>,
    pub points: usize,
    pub distance_m: f64,
    pub duration_s: Option<f64>,
    pub speed_mps: Option<f64>,
    pub speed_autopause_mps: Option<f64>,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "distance {:.1} m, duration ", self.distance())?;
        match self.duration() {
            Ok(d) => write_clock(f, d)?,
            Err(_) => f.write_str("n/a")?,
        }
        f.write_str(", speed ")?;
        write_speed(f, self.speed(false))?;
        f.write_str(", autopause speed ")?;
        write_speed(f, self.speed(true))
    }
}

fn write_clock(f: &mut fmt::Formatter<'_>, d: Duration) -> fmt::Result {
    let secs = d.whole_seconds();
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    write!(f, "{sign}{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn write_speed(f: &mut fmt::Formatter<'_>, speed: Result<f64>) -> fmt::Result {
    match speed {
        Ok(v) => write!(f, "{v:.2} m/s"),
        Err(_) => f.write_str("n/a"),
    }
}
