//! Fixed catalog of points of interest.
//!
//! The catalog is small (a handful of entries) and immutable after startup,
//! so every lookup is a linear scan that is safe to run per frame.

use tracing::warn;

use skydrop_core::catalog::builtin_catalog;
use skydrop_core::config::SessionConfig;
use skydrop_core::constants::DEFAULT_POI_NAME;
use skydrop_core::enums::ActivePointOfInterest;
use skydrop_core::error::ConfigError;
use skydrop_core::types::{GeodeticPosition, PointOfInterest};

use crate::geomath::approx_distance_m;

#[derive(Debug, Clone)]
pub struct PoiRegistry {
    catalog: Vec<PointOfInterest>,
    default_index: usize,
}

impl PoiRegistry {
    /// Build a registry. `default_name` must name a catalog entry.
    pub fn new(catalog: Vec<PointOfInterest>, default_name: &str) -> Result<Self, ConfigError> {
        let default_index = catalog
            .iter()
            .position(|poi| poi.name == default_name)
            .ok_or_else(|| {
                ConfigError::Invalid(format!("default entry {default_name:?} is not in the catalog"))
            })?;
        Ok(Self {
            catalog,
            default_index,
        })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        Self::new(config.catalog.clone(), &config.default_poi)
    }

    /// The built-in dropzone catalog.
    pub fn builtin() -> Self {
        Self {
            catalog: builtin_catalog(),
            default_index: 1,
        }
    }

    pub fn entries(&self) -> &[PointOfInterest] {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Entry used when a name cannot be resolved.
    pub fn default_entry(&self) -> &PointOfInterest {
        &self.catalog[self.default_index]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.catalog.iter().position(|poi| poi.name == name)
    }

    /// Exact-match lookup.
    pub fn get(&self, name: &str) -> Option<&PointOfInterest> {
        self.index_of(name).map(|i| &self.catalog[i])
    }

    /// Lookup that never fails: unknown names resolve to the default entry.
    ///
    /// Persisted names can be stale or corrupted, so callers that need exact
    /// membership should use [`PoiRegistry::get`] instead.
    pub fn lookup_by_name(&self, name: &str) -> &PointOfInterest {
        match self.get(name) {
            Some(poi) => poi,
            None => {
                let fallback = self.default_entry();
                warn!(name, fallback = %fallback.name, "unknown point of interest");
                fallback
            }
        }
    }

    /// Index of the nearest entry within `max_radius_m`. Ties go to the
    /// earlier catalog entry.
    pub fn nearest_index(&self, lat: f64, lng: f64, max_radius_m: f64) -> Option<usize> {
        let query = GeodeticPosition::new(lat, lng, 0.0);
        let mut best: Option<(usize, f64)> = None;
        for (i, poi) in self.catalog.iter().enumerate() {
            let d = approx_distance_m(&query, &poi.reference_point);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }
        best.filter(|&(_, d)| d <= max_radius_m).map(|(i, _)| i)
    }

    /// Nearest entry within `max_radius_m` of the query point, if any.
    pub fn find_nearest(&self, lat: f64, lng: f64, max_radius_m: f64) -> Option<&PointOfInterest> {
        self.nearest_index(lat, lng, max_radius_m)
            .map(|i| &self.catalog[i])
    }

    /// First entry whose bounding box contains the point.
    pub fn containing(&self, lat: f64, lng: f64) -> Option<&PointOfInterest> {
        self.catalog.iter().find(|poi| poi.bounds.contains(lat, lng))
    }

    /// Next selection in the loop Auto -> catalog[0] -> ... -> catalog[n-1] -> Auto.
    ///
    /// A manual name that is not in the catalog wraps back to Auto.
    pub fn cycle(&self, current: &ActivePointOfInterest) -> ActivePointOfInterest {
        let next_index = match current {
            ActivePointOfInterest::Auto => 0,
            ActivePointOfInterest::Manual(name) => match self.index_of(name) {
                Some(i) => i + 1,
                None => return ActivePointOfInterest::Auto,
            },
        };
        match self.catalog.get(next_index) {
            Some(poi) => ActivePointOfInterest::Manual(poi.name.clone()),
            None => ActivePointOfInterest::Auto,
        }
    }
}

impl Default for PoiRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
