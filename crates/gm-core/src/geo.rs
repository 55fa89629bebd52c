//! Planar projection of WGS-84 coordinates.
//!
//! The store never holds latitude/longitude.  Ingestion projects every node
//! with a spherical Mercator transform:
//!
//! ```text
//! x = R · λ
//! y = R · ln |tan(π/4 + φ/2)|
//! ```
//!
//! with λ, φ in radians and `R` the mean Earth radius in metres, so projected
//! units are metres at the equator.  Distances between projected points are
//! plain Euclidean distances; they overstate ground distance by `sec φ`, which
//! is uniform enough within a city for shortest-route comparisons.

use std::f64::consts::FRAC_PI_4;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Project `(lon, lat)` in degrees to planar `(x, y)`.
///
/// Returns `None` for non-finite input or latitudes at or beyond the poles,
/// where the Mercator `y` diverges.
pub fn project(lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
    if !lon_deg.is_finite() || !lat_deg.is_finite() || lat_deg.abs() >= 90.0 {
        return None;
    }
    let x = EARTH_RADIUS_M * lon_deg.to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan().abs().ln();
    y.is_finite().then_some((x, y))
}

/// Euclidean distance between two planar coordinates.
#[inline]
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}
