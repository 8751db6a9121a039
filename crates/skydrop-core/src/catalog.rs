//! Built-in dropzone catalog.

use crate::types::{AssetHandle, GeoBounds, GeodeticPosition, PointOfInterest};

fn entry(name: &str, reference_point: GeodeticPosition, bounds: GeoBounds) -> PointOfInterest {
    PointOfInterest {
        name: name.to_string(),
        reference_point,
        bounds,
        visual_asset: AssetHandle::new(format!("minimap_{}", name.to_lowercase())),
    }
}

/// The four supported dropzones, in cycling order.
pub fn builtin_catalog() -> Vec<PointOfInterest> {
    vec![
        entry(
            "Kapowsin",
            GeodeticPosition::new(47.2375, -123.1458, 84.0),
            GeoBounds::new(47.214, 47.2637, -123.2033, -123.0856),
        ),
        entry(
            "Sebastian",
            GeodeticPosition::new(27.8165, -80.499, 5.0),
            GeoBounds::new(27.7957, 27.8315, -80.5334, -80.4552),
        ),
        entry(
            "Ogden",
            GeodeticPosition::new(41.1999, -112.0018, 1340.0),
            GeoBounds::new(41.186030, 41.213530, -112.020010, -111.983510),
        ),
        entry(
            "Tooele",
            GeodeticPosition::new(40.6109, -112.3481, 1378.0),
            GeoBounds::new(40.5447, 40.6771, -112.4505, -112.2456),
        ),
    ]
}
