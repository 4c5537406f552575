//! Distance and rate computations.
//!
//! All coordinates use WGS84 (lat/lon in degrees). Horizontal distance
//! ignores elevation.

use time::Duration;

use crate::error::{Error, Result};
use crate::point::GeoPoint;

/// Earth radius in meters (WGS84 mean).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two points in meters.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    EARTH_RADIUS_M * central_angle(a, b)
}

/// Angle in radians subtended at the Earth's centre, haversine form.
fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (phi_a, phi_b) = (a.latitude().to_radians(), b.latitude().to_radians());
    let half_dphi = (phi_b - phi_a) / 2.0;
    let half_dlambda = (b.longitude() - a.longitude()).to_radians() / 2.0;

    let hav = half_dphi.sin().powi(2)
        + phi_a.cos() * phi_b.cos() * half_dlambda.sin().powi(2);
    let hav = hav.clamp(0.0, 1.0);

    2.0 * hav.sqrt().atan2((1.0 - hav).sqrt())
}

/// Total length of a point sequence in meters, pair by pair in order.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| distance(&w[0], &w[1]))
        .sum()
}

/// `quantity` per second over `elapsed`.
///
/// Every division by a time delta goes through here so that a zero or
/// negative span becomes [`Error::DegenerateDuration`] instead of an
/// infinity or NaN.
pub fn rate(quantity: f64, elapsed: Duration) -> Result<f64> {
    if !elapsed.is_positive() {
        return Err(Error::DegenerateDuration);
    }
    Ok(quantity / elapsed.as_seconds_f64())
}
