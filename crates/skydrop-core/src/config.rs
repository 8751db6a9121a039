//! Session configuration.
//!
//! Built once at startup (usually from JSON) and threaded explicitly through
//! the engine. Every field has a default, so a partial document is enough.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::builtin_catalog;
use crate::constants::*;
use crate::enums::{ActivePointOfInterest, ReadoutPolicy};
use crate::error::ConfigError;
use crate::types::{GeodeticPosition, LocalOffset, PointOfInterest};

/// Portal placement and timing. No location means the portal is disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub portal_location: Option<GeodeticPosition>,
    pub trigger_radius_m: f64,
    pub preload_radius_m: f64,
    pub hold_duration_millis: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            portal_location: None,
            trigger_radius_m: PORTAL_TRIGGER_RADIUS_M,
            preload_radius_m: PORTAL_PRELOAD_RADIUS_M,
            hold_duration_millis: PORTAL_HOLD_MS,
        }
    }
}

/// Millisecond cutoffs for fix freshness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessThresholds {
    pub aging_millis: u64,
    pub stale_millis: u64,
    pub fade_start_millis: u64,
    pub fade_end_millis: u64,
}

impl Default for FreshnessThresholds {
    fn default() -> Self {
        Self {
            aging_millis: FRESHNESS_AGING_MS,
            stale_millis: FRESHNESS_STALE_MS,
            fade_start_millis: FRESHNESS_FADE_START_MS,
            fade_end_millis: FRESHNESS_FADE_END_MS,
        }
    }
}

/// Per-readout staleness policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    pub speed_policy: ReadoutPolicy,
    pub altitude_policy: ReadoutPolicy,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            speed_policy: ReadoutPolicy::BlankWhenStale,
            altitude_policy: ReadoutPolicy::RecolorWhenStale,
        }
    }
}

/// Operator-tunable alignment corrections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Rotation about the vertical axis applied to every local position.
    pub yaw_radians: f64,
    /// Destination shift east (meters).
    pub east_meters: f64,
    /// Destination shift north (meters).
    pub north_meters: f64,
}

impl Adjustments {
    /// Same adjustments with yaw wrapped into [0, 2π).
    pub fn normalized(self) -> Self {
        Self {
            yaw_radians: self.yaw_radians.rem_euclid(std::f64::consts::TAU),
            ..self
        }
    }

    /// Horizontal destination shift.
    pub fn offset(&self) -> LocalOffset {
        LocalOffset::new(self.east_meters, self.north_meters, 0.0)
    }
}

/// Everything a session needs, constructed once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub catalog: Vec<PointOfInterest>,
    /// Fallback entry for unrecognized names.
    pub default_poi: String,
    pub auto_detect_radius_m: f64,
    /// Selection restored from the preference store.
    pub initial_selection: ActivePointOfInterest,
    pub transition: TransitionConfig,
    pub freshness: FreshnessThresholds,
    pub hud: HudConfig,
    pub adjustments: Adjustments,
    /// Dead-reckon the subject between fixes.
    pub extrapolate: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            catalog: builtin_catalog(),
            default_poi: DEFAULT_POI_NAME.to_string(),
            auto_detect_radius_m: AUTO_DETECT_RADIUS_M,
            initial_selection: ActivePointOfInterest::Auto,
            transition: TransitionConfig::default(),
            freshness: FreshnessThresholds::default(),
            hud: HudConfig::default(),
            adjustments: Adjustments::default(),
            extrapolate: true,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(invalid("catalog is empty"));
        }
        let mut names = HashSet::new();
        for poi in &self.catalog {
            if !names.insert(poi.name.as_str()) {
                return Err(invalid(format!("duplicate catalog entry {:?}", poi.name)));
            }
            if !poi.bounds.is_well_formed() {
                return Err(invalid(format!("bounds of {:?} are not ordered", poi.name)));
            }
            if !is_valid_position(&poi.reference_point) {
                return Err(invalid(format!("reference point of {:?} is out of range", poi.name)));
            }
        }
        if !names.contains(self.default_poi.as_str()) {
            return Err(invalid(format!(
                "default entry {:?} is not in the catalog",
                self.default_poi
            )));
        }
        if !(self.auto_detect_radius_m.is_finite() && self.auto_detect_radius_m >= 0.0) {
            return Err(invalid("auto_detect_radius_m must be a non-negative number"));
        }

        let t = &self.transition;
        if !(t.trigger_radius_m.is_finite() && t.trigger_radius_m > 0.0) {
            return Err(invalid("trigger_radius_m must be positive"));
        }
        if !(t.preload_radius_m.is_finite() && t.preload_radius_m >= t.trigger_radius_m) {
            return Err(invalid("preload_radius_m must be at least trigger_radius_m"));
        }
        if let Some(portal) = &t.portal_location {
            if !is_valid_position(portal) {
                return Err(invalid("portal_location is out of range"));
            }
        }

        let f = &self.freshness;
        if f.aging_millis > f.stale_millis {
            return Err(invalid("freshness aging threshold exceeds stale threshold"));
        }
        if f.fade_start_millis >= f.fade_end_millis {
            return Err(invalid("freshness fade must end after it starts"));
        }

        let a = &self.adjustments;
        if ![a.yaw_radians, a.east_meters, a.north_meters]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(invalid("adjustments must be finite"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn is_valid_position(p: &GeodeticPosition) -> bool {
    p.latitude.is_finite()
        && p.longitude.is_finite()
        && p.altitude_m.is_finite()
        && (-90.0..=90.0).contains(&p.latitude)
        && (-180.0..=180.0).contains(&p.longitude)
}
