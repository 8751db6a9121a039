//! Motion estimation between sparse fixes.

use tracing::debug;

use skydrop_core::constants::VELOCITY_SMOOTHING;
use skydrop_core::types::{Fix, MotionEstimate, Velocity};
use skydrop_geo::geomath::offset_between;

/// Produces a velocity estimate for dead-reckoning from the fix stream.
pub trait MotionEstimator: Send {
    /// Feed a new fix. Invalid fixes are ignored.
    fn update(&mut self, fix: &Fix);
    /// Current estimate, `None` until enough data has arrived.
    fn estimate(&self) -> Option<MotionEstimate>;
    fn reset(&mut self);
}

/// Exponentially smoothed velocity.
///
/// Prefers the receiver-reported velocity; falls back to the finite
/// difference between consecutive fixes when the receiver omits it.
#[derive(Debug, Clone)]
pub struct SmoothedVelocityEstimator {
    /// Weight of each new sample, in (0, 1].
    smoothing: f64,
    last: Option<Fix>,
    estimate: Option<MotionEstimate>,
}

impl SmoothedVelocityEstimator {
    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing: smoothing.clamp(f64::EPSILON, 1.0),
            last: None,
            estimate: None,
        }
    }
}

impl Default for SmoothedVelocityEstimator {
    fn default() -> Self {
        Self::new(VELOCITY_SMOOTHING)
    }
}

impl MotionEstimator for SmoothedVelocityEstimator {
    fn update(&mut self, fix: &Fix) {
        if !fix.valid {
            return;
        }
        if let Some(last) = &self.last {
            if fix.timestamp_millis <= last.timestamp_millis {
                debug!(
                    t = fix.timestamp_millis,
                    last = last.timestamp_millis,
                    "ignoring out-of-order fix"
                );
                return;
            }
        }

        let sample = match (fix.velocity, &self.last) {
            (Some(v), _) => Some(v),
            (None, Some(last)) => Some(finite_difference(last, fix)),
            (None, None) => None,
        };
        self.last = Some(*fix);

        let Some(sample) = sample else {
            return;
        };
        let velocity = match self.estimate {
            Some(prev) => blend(prev.velocity, sample, self.smoothing),
            None => sample,
        };
        self.estimate = Some(MotionEstimate {
            velocity,
            sample_time_millis: fix.timestamp_millis,
        });
    }

    fn estimate(&self) -> Option<MotionEstimate> {
        self.estimate
    }

    fn reset(&mut self) {
        self.last = None;
        self.estimate = None;
    }
}

/// Average velocity between two fixes. Caller guarantees increasing time.
fn finite_difference(prev: &Fix, next: &Fix) -> Velocity {
    let dt = (next.timestamp_millis - prev.timestamp_millis) as f64 / 1000.0;
    let offset = offset_between(&prev.position, &next.position);
    Velocity::new(offset.east / dt, offset.north / dt, offset.up / dt)
}

fn blend(prev: Velocity, sample: Velocity, alpha: f64) -> Velocity {
    Velocity::new(
        prev.east + (sample.east - prev.east) * alpha,
        prev.north + (sample.north - prev.north) * alpha,
        prev.up + (sample.up - prev.up) * alpha,
    )
}
