//! Active point-of-interest selection.
//!
//! Auto mode follows the nearest catalog entry as fixes arrive. A manual
//! choice is never overridden by auto-detection and stays until cleared or
//! cycled away.

use tracing::{info, warn};

use skydrop_core::enums::ActivePointOfInterest;
use skydrop_core::types::{Fix, PointOfInterest};

use crate::registry::PoiRegistry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoiSelection {
    mode: ActivePointOfInterest,
    /// Last auto-detected catalog index.
    detected: Option<usize>,
}

impl PoiSelection {
    /// Restore a selection, resolving unknown manual names to the default entry.
    pub fn new(initial: ActivePointOfInterest, registry: &PoiRegistry) -> Self {
        Self {
            mode: sanitize(initial, registry),
            detected: None,
        }
    }

    pub fn mode(&self) -> &ActivePointOfInterest {
        &self.mode
    }

    /// Name to hand to the preference store, if the user chose one.
    pub fn persisted_name(&self) -> Option<&str> {
        match &self.mode {
            ActivePointOfInterest::Manual(name) => Some(name.as_str()),
            ActivePointOfInterest::Auto => None,
        }
    }

    /// Refresh auto-detection from a new fix. Returns true when the entry in
    /// effect changed. Detection keeps tracking during a manual selection so
    /// returning to Auto resolves against the latest fix; the manual choice
    /// itself is never touched. Invalid fixes are ignored.
    pub fn on_fix(&mut self, registry: &PoiRegistry, fix: &Fix, max_radius_m: f64) -> bool {
        if !fix.valid {
            return false;
        }
        let nearest = registry.nearest_index(
            fix.position.latitude,
            fix.position.longitude,
            max_radius_m,
        );
        if nearest == self.detected {
            return false;
        }
        self.detected = nearest;
        if self.mode.is_manual() {
            return false;
        }
        match nearest {
            Some(i) => info!(name = %registry.entries()[i].name, "auto-detected point of interest"),
            None => info!("no point of interest within detection radius"),
        }
        true
    }

    pub fn cycle(&mut self, registry: &PoiRegistry) {
        self.mode = registry.cycle(&self.mode);
    }

    pub fn select(&mut self, name: &str, registry: &PoiRegistry) {
        self.mode = sanitize(ActivePointOfInterest::Manual(name.to_string()), registry);
    }

    pub fn clear_manual(&mut self) {
        self.mode = ActivePointOfInterest::Auto;
    }

    /// Entry currently in effect, if any.
    pub fn resolve<'a>(&self, registry: &'a PoiRegistry) -> Option<&'a PointOfInterest> {
        match &self.mode {
            ActivePointOfInterest::Manual(name) => Some(registry.lookup_by_name(name)),
            ActivePointOfInterest::Auto => self.detected.and_then(|i| registry.entries().get(i)),
        }
    }
}

fn sanitize(selection: ActivePointOfInterest, registry: &PoiRegistry) -> ActivePointOfInterest {
    match selection {
        ActivePointOfInterest::Manual(name) if registry.get(&name).is_none() => {
            let fallback = registry.default_entry().name.clone();
            warn!(%name, %fallback, "unknown point of interest selection");
            ActivePointOfInterest::Manual(fallback)
        }
        other => other,
    }
}
