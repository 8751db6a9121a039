//! Operator commands processed at the start of a tick.

use serde::{Deserialize, Serialize};

use skydrop_core::config::Adjustments;
use skydrop_core::types::GeodeticPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    /// Auto -> catalog[0] -> ... -> catalog[n-1] -> Auto.
    CyclePointOfInterest,
    SelectPointOfInterest { name: String },
    ClearManualSelection,
    SetAdjustments { adjustments: Adjustments },
    NudgeYaw { radians: f64 },
    NudgeOffset { east_meters: f64, north_meters: f64 },
    /// Shift the destination one standard step.
    Nudge { direction: Cardinal },
    /// `None` disables the portal.
    SetPortalLocation { location: Option<GeodeticPosition> },
}
