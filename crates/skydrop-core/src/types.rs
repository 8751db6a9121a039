//! Fundamental geodetic and local-frame types.

use std::ops::Add;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A real-world point. Latitude/longitude in degrees, altitude in meters MSL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
}

/// Signed displacement in the local tangent plane (meters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalOffset {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

/// Position in the session's local rendering frame (meters).
///
/// Engine axes: x = East, y = Up, z = North. After yaw alignment the z axis
/// is the virtual scene's forward axis. Always relative to the session origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Velocity in the local tangent plane (m/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

/// One reported GPS sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub position: GeodeticPosition,
    /// Instantaneous ground speed (m/s).
    pub ground_speed: f64,
    pub timestamp_millis: u64,
    pub valid: bool,
    /// Receiver-reported velocity, when the receiver provides one.
    #[serde(default)]
    pub velocity: Option<Velocity>,
}

/// Velocity estimate and the fix time it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionEstimate {
    pub velocity: Velocity,
    pub sample_time_millis: u64,
}

/// Latitude/longitude box (degrees), inclusive on all edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

/// Opaque handle to a visual asset owned by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetHandle(pub String);

/// A named, geofenced real-world location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    pub reference_point: GeodeticPosition,
    pub bounds: GeoBounds,
    pub visual_asset: AssetHandle,
}

impl GeodeticPosition {
    pub fn new(latitude: f64, longitude: f64, altitude_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m,
        }
    }
}

impl LocalOffset {
    pub fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }

    /// Length ignoring the vertical component.
    pub fn horizontal_length(&self) -> f64 {
        (self.east * self.east + self.north * self.north).sqrt()
    }
}

impl Add for LocalOffset {
    type Output = LocalOffset;

    fn add(self, rhs: LocalOffset) -> LocalOffset {
        LocalOffset::new(self.east + rhs.east, self.north + rhs.north, self.up + rhs.up)
    }
}

impl LocalPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Straight-line distance to another local position (meters).
    pub fn distance_to(&self, other: &LocalPosition) -> f64 {
        self.as_dvec3().distance(other.as_dvec3())
    }
}

impl Velocity {
    pub fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f64 {
        (self.east * self.east + self.north * self.north + self.up * self.up).sqrt()
    }

    /// Displacement after travelling at this velocity for `secs` seconds.
    pub fn displacement(&self, secs: f64) -> LocalOffset {
        LocalOffset::new(self.east * secs, self.north * secs, self.up * secs)
    }
}

impl Fix {
    /// A valid fix without a receiver-reported velocity.
    pub fn new(position: GeodeticPosition, ground_speed: f64, timestamp_millis: u64) -> Self {
        Self {
            position,
            ground_speed,
            timestamp_millis,
            valid: true,
            velocity: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = Some(velocity);
        self
    }
}

impl GeoBounds {
    pub fn new(lat_min: f64, lat_max: f64, lng_min: f64, lng_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lng_min,
            lng_max,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeodeticPosition>) -> Option<Self> {
        let mut bounds: Option<GeoBounds> = None;
        for p in points {
            bounds = Some(match bounds {
                None => GeoBounds::new(p.latitude, p.latitude, p.longitude, p.longitude),
                Some(b) => GeoBounds::new(
                    b.lat_min.min(p.latitude),
                    b.lat_max.max(p.latitude),
                    b.lng_min.min(p.longitude),
                    b.lng_max.max(p.longitude),
                ),
            });
        }
        bounds
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lng >= self.lng_min && lng <= self.lng_max
    }

    /// Edges are ordered (min <= max) and finite.
    pub fn is_well_formed(&self) -> bool {
        [self.lat_min, self.lat_max, self.lng_min, self.lng_max]
            .iter()
            .all(|v| v.is_finite())
            && self.lat_min <= self.lat_max
            && self.lng_min <= self.lng_max
    }
}

impl AssetHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
