//! Per-frame output of the session engine.

use serde::{Deserialize, Serialize};

use skydrop_core::enums::{ActivePointOfInterest, FreshnessLevel, TransitionState};
use skydrop_core::events::SceneCommand;
use skydrop_core::types::{GeodeticPosition, LocalPosition};

use crate::freshness::{ReadoutView, Rgb};

/// Everything the renderer and HUD need for one frame. Local positions are
/// `None` until the origin has been captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub now_millis: u64,
    pub origin: Option<GeodeticPosition>,
    /// Subject, dead-reckoned to `now_millis` when enabled.
    pub subject: Option<LocalPosition>,
    /// Active point of interest after operator adjustments.
    pub destination: Option<LocalPosition>,
    pub portal: Option<LocalPosition>,
    pub active_poi: Option<String>,
    pub selection: ActivePointOfInterest,
    pub transition: TransitionState,
    pub millis_since_fix: Option<u64>,
    pub freshness: FreshnessLevel,
    pub freshness_color: Rgb,
    /// Ground speed (m/s).
    pub speed: ReadoutView,
    /// Altitude above the active point of interest, or MSL without one (m).
    pub altitude: ReadoutView,
    /// Scene side effects produced this tick, in order.
    pub scene_commands: Vec<SceneCommand>,
}
