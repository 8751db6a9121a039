//! Distance and offset primitives over geodetic coordinates.
//!
//! Uses an equirectangular projection on the mean-radius sphere rather than a
//! geodesic. Error stays well under 1% at the sub-100 km ranges a session
//! covers, and every call is a handful of flops.

use skydrop_core::constants::{METERS_PER_DEGREE, MIN_LONGITUDE_SCALE};
use skydrop_core::types::{GeodeticPosition, LocalOffset};

/// Meters per degree of longitude at the given latitude (degrees).
pub fn lon_scale(latitude: f64) -> f64 {
    METERS_PER_DEGREE * latitude.to_radians().cos().max(MIN_LONGITUDE_SCALE)
}

/// `to - from` in degrees of longitude, wrapped across the antimeridian.
///
/// Only out-of-range differences are adjusted so that swapping the arguments
/// negates the result exactly.
fn delta_lon(from: f64, to: f64) -> f64 {
    let d = to - from;
    if d >= 180.0 {
        d - 360.0
    } else if d < -180.0 {
        d + 360.0
    } else {
        d
    }
}

fn normalize_lon(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Horizontal distance in meters. Symmetric, and zero for identical points.
pub fn approx_distance_m(a: &GeodeticPosition, b: &GeodeticPosition) -> f64 {
    let mean_lat = (a.latitude + b.latitude) * 0.5;
    let north = (b.latitude - a.latitude) * METERS_PER_DEGREE;
    let east = delta_lon(a.longitude, b.longitude) * lon_scale(mean_lat);
    (north * north + east * east).sqrt()
}

/// Signed east/north/up displacement from `from` to `to` (meters).
///
/// Longitude is scaled at `from`'s latitude, which makes this the exact
/// inverse of [`apply_offset`].
pub fn offset_between(from: &GeodeticPosition, to: &GeodeticPosition) -> LocalOffset {
    LocalOffset::new(
        delta_lon(from.longitude, to.longitude) * lon_scale(from.latitude),
        (to.latitude - from.latitude) * METERS_PER_DEGREE,
        to.altitude_m - from.altitude_m,
    )
}

/// Move `origin` by `offset`.
pub fn apply_offset(origin: &GeodeticPosition, offset: &LocalOffset) -> GeodeticPosition {
    GeodeticPosition::new(
        origin.latitude + offset.north / METERS_PER_DEGREE,
        normalize_lon(origin.longitude + offset.east / lon_scale(origin.latitude)),
        origin.altitude_m + offset.up,
    )
}

/// Bearing from `from` to `to` in degrees (0 = North, clockwise).
pub fn bearing_degrees(from: &GeodeticPosition, to: &GeodeticPosition) -> f64 {
    let offset = offset_between(from, to);
    offset
        .east
        .atan2(offset.north)
        .to_degrees()
        .rem_euclid(360.0)
}
