//! Geospatial positioning for skydrop.
//!
//! Planar geodetic math, the point-of-interest registry and selection,
//! and the session-anchored geodetic-to-local transform.

pub use skydrop_core as core;

pub mod geomath;
pub mod registry;
pub mod selection;
pub mod transform;

// Re-export key types for convenience.
pub use geomath::{approx_distance_m, apply_offset, bearing_degrees, offset_between};
pub use registry::PoiRegistry;
pub use selection::PoiSelection;
pub use transform::GeoToLocal;

#[cfg(test)]
mod tests;
