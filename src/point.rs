//! Geotagged track point.

use time::OffsetDateTime;

/// A single recorded position.
///
/// Coordinates are WGS84 degrees, elevation is meters and may be absent.
/// Values are never changed in place; [`GeoPoint::with_elevation`]
/// returns a modified copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
    timestamp: OffsetDateTime,
}

impl GeoPoint {
    pub fn new(
        latitude: f64,
        longitude: f64,
        elevation: Option<f64>,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            timestamp,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// Timestamp truncated to whole seconds since the Unix epoch.
    pub fn epoch_seconds(&self) -> i64 {
        self.timestamp.unix_timestamp()
    }

    /// Copy of this point with a different elevation; position and time are kept.
    pub fn with_elevation(&self, elevation: f64) -> Self {
        Self {
            elevation: Some(elevation),
            ..*self
        }
    }
}
