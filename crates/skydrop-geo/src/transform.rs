//! Geodetic-to-local transform.
//!
//! Anchors a flat local frame at the first valid fix of the session and
//! projects geodetic positions into it, optionally dead-reckoning a target
//! forward from its last motion estimate. The origin is write-once: moving it
//! mid-session would make the whole world jump.

use glam::DVec2;
use tracing::info;

use skydrop_core::config::Adjustments;
use skydrop_core::error::TransformError;
use skydrop_core::types::{Fix, GeodeticPosition, LocalOffset, LocalPosition, MotionEstimate};

use crate::geomath::{apply_offset, offset_between};

/// Session-anchored projection into engine axes (x = East, y = Up, z = North
/// rotated by the yaw adjustment).
#[derive(Debug, Clone, Default)]
pub struct GeoToLocal {
    origin: Option<GeodeticPosition>,
    adjustments: Adjustments,
}

impl GeoToLocal {
    pub fn new(adjustments: Adjustments) -> Self {
        Self {
            origin: None,
            adjustments: adjustments.normalized(),
        }
    }

    /// Capture the origin from the first valid fix. Later calls and invalid
    /// fixes are ignored. Returns true only when the origin was captured.
    pub fn capture_origin_if_absent(&mut self, fix: &Fix) -> bool {
        if self.origin.is_some() || !fix.valid {
            return false;
        }
        let p = fix.position;
        info!(
            lat = p.latitude,
            lon = p.longitude,
            alt = p.altitude_m,
            "local origin captured"
        );
        self.origin = Some(p);
        true
    }

    pub fn origin(&self) -> Option<GeodeticPosition> {
        self.origin
    }

    pub fn has_origin(&self) -> bool {
        self.origin.is_some()
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    /// Takes effect on the next conversion.
    pub fn set_adjustments(&mut self, adjustments: Adjustments) {
        self.adjustments = adjustments.normalized();
    }

    /// Project `target` into the local frame at `at_time_millis`.
    ///
    /// With `extrapolate` set and a motion estimate available, the target is
    /// first advanced by `velocity * (at_time - sample_time)`. Queries earlier
    /// than the sample time do not move the target.
    pub fn to_local(
        &self,
        target: &GeodeticPosition,
        at_time_millis: u64,
        motion: Option<&MotionEstimate>,
        extrapolate: bool,
    ) -> Result<LocalPosition, TransformError> {
        let origin = self.origin.ok_or(TransformError::NoOrigin)?;
        let mut offset = offset_between(&origin, target);
        if extrapolate {
            if let Some(m) = motion {
                offset = offset + m.velocity.displacement(extrapolation_secs(m, at_time_millis));
            }
        }
        Ok(self.offset_to_local(offset))
    }

    /// Express a local-tangent-plane offset in engine axes with yaw applied.
    pub fn offset_to_local(&self, offset: LocalOffset) -> LocalPosition {
        let horizontal = yaw_rotation(self.adjustments.yaw_radians)
            .rotate(DVec2::new(offset.east, offset.north));
        LocalPosition::new(horizontal.x, offset.up, horizontal.y)
    }

    /// Inverse of [`GeoToLocal::to_local`] without extrapolation.
    pub fn to_geo(&self, local: &LocalPosition) -> Result<GeodeticPosition, TransformError> {
        let origin = self.origin.ok_or(TransformError::NoOrigin)?;
        let horizontal = yaw_rotation(-self.adjustments.yaw_radians)
            .rotate(DVec2::new(local.x, local.z));
        let offset = LocalOffset::new(horizontal.x, horizontal.y, local.y);
        Ok(apply_offset(&origin, &offset))
    }
}

/// Rotation that turns true north onto the scene's forward axis.
fn yaw_rotation(yaw_radians: f64) -> DVec2 {
    DVec2::from_angle(-yaw_radians)
}

/// Seconds to dead-reckon from the estimate's sample, never negative.
pub fn extrapolation_secs(motion: &MotionEstimate, at_time_millis: u64) -> f64 {
    at_time_millis.saturating_sub(motion.sample_time_millis) as f64 / 1000.0
}

/// Destination after the operator's east/north shift.
pub fn adjusted_destination(destination: &GeodeticPosition, adjustments: &Adjustments) -> GeodeticPosition {
    apply_offset(destination, &adjustments.offset())
}
