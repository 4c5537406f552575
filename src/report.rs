//! One-shot analysis of a track into a serializable report.

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::error::Result;
use crate::segment::Summary;
use crate::track::Track;

/// Default split length in seconds.
pub const DEFAULT_INTERVAL_SECS: i64 = 60;

/// Parameters of an analysis run.
///
/// Missing fields fall back to [`AnalysisParams::default`] when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Length of each split in whole seconds.
    pub interval_s: i64,
    /// Whether split and top speeds discount paused time.
    pub autopause: bool,
    /// Bound for altitude correction in m/s. `None`, the default, skips
    /// correction; tracks with points lacking elevation can only be
    /// analyzed that way.
    pub max_vertical_speed_mps: Option<f64>,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            interval_s: DEFAULT_INTERVAL_SECS,
            autopause: true,
            max_vertical_speed_mps: None,
        }
    }
}

impl AnalysisParams {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn interval(&self) -> Duration {
        Duration::seconds(self.interval_s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total: Summary,
    pub splits: Vec<Summary>,
    pub top_speed_mps: f64,
    /// Points whose elevation was clamped, 0 when correction was skipped.
    pub corrected_points: usize,
}

impl Report {
    /// Correct altitude (if requested), split, and summarize `track`.
    ///
    /// Requesting correction on a track with a point lacking elevation
    /// fails with [`Error::MissingElevation`](crate::Error::MissingElevation).
    pub fn analyze(track: &Track, params: &AnalysisParams) -> Result<Report> {
        let corrected;
        let (track, corrected_points) = match params.max_vertical_speed_mps {
            Some(bound) => {
                corrected = track.correct_altitude(bound)?;
                let changed = track.count_changed_elevations(&corrected);
                (&corrected, changed)
            }
            None => (track, 0),
        };

        let interval = params.interval();
        let splits = track
            .split(interval)?
            .iter()
            .map(|s| s.summary())
            .collect();

        Ok(Report {
            total: track.segment().summary(),
            splits,
            top_speed_mps: track.top_speed(interval, params.autopause)?,
            corrected_points,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
