//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Which point of interest is in effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivePointOfInterest {
    /// Nearest catalog entry within the detection radius, possibly none.
    #[default]
    Auto,
    /// Explicit user choice; persists until cleared.
    Manual(String),
}

/// Portal transition lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionState {
    /// No portal configured.
    #[default]
    Dormant,
    /// Portal shown, subject outside the preload radius.
    Armed,
    /// Alternate environment assets requested.
    Preloaded,
    /// Alternate environment on screen.
    Triggered { entered_at_millis: u64 },
    /// Hold elapsed, primary scene restored this tick.
    Returning,
}

/// Staleness of the most recent fix, ordered from best to worst.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FreshnessLevel {
    Fresh,
    Aging,
    #[default]
    Stale,
}

/// How a numeric HUD readout reacts to a stale fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadoutPolicy {
    /// Clear the value once stale.
    BlankWhenStale,
    /// Keep the last value, only the color changes.
    RecolorWhenStale,
}

/// Scene entities whose visibility the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityClass {
    Portal,
    PrimaryScene,
    AlternateEnvironment,
}

/// Environment (scene + lighting set) selectable on the scene collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvironmentId {
    #[default]
    Primary,
    Alternate,
}

impl TransitionState {
    /// Short label for HUD display.
    pub fn label(&self) -> &'static str {
        match self {
            TransitionState::Dormant => "dormant",
            TransitionState::Armed => "armed",
            TransitionState::Preloaded => "preloaded",
            TransitionState::Triggered { .. } => "triggered",
            TransitionState::Returning => "returning",
        }
    }
}

impl ActivePointOfInterest {
    pub fn is_manual(&self) -> bool {
        matches!(self, ActivePointOfInterest::Manual(_))
    }
}
