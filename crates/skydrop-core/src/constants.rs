//! Tuning constants and defaults.

// --- Earth model ---

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude on the mean-radius sphere.
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Floor for cos(latitude) so longitude scaling stays finite at the poles.
pub const MIN_LONGITUDE_SCALE: f64 = 1e-9;

// --- Point of interest detection ---

/// Maximum distance for auto-detecting the nearest point of interest (meters).
pub const AUTO_DETECT_RADIUS_M: f64 = 50_000.0;

/// Catalog entry used when a persisted name is unrecognized.
pub const DEFAULT_POI_NAME: &str = "Sebastian";

// --- Freshness ---

/// Age at which a fix is considered aging (ms).
pub const FRESHNESS_AGING_MS: u64 = 1_000;

/// Age at which a fix is considered stale (ms).
pub const FRESHNESS_STALE_MS: u64 = 3_000;

/// Start of the white-to-red HUD fade (ms).
pub const FRESHNESS_FADE_START_MS: u64 = 1_000;

/// End of the white-to-red HUD fade; fully red afterwards (ms).
pub const FRESHNESS_FADE_END_MS: u64 = 6_000;

// --- Portal ---

/// Distance at which alternate-environment assets are preloaded (meters).
pub const PORTAL_PRELOAD_RADIUS_M: f64 = 100.0;

/// Distance at which the environment swap fires (meters).
pub const PORTAL_TRIGGER_RADIUS_M: f64 = 4.0;

/// Time spent in the alternate environment before returning (ms).
pub const PORTAL_HOLD_MS: u64 = 10_000;

// --- Motion estimation ---

/// Weight given to each new velocity sample (1.0 = take the sample as-is).
pub const VELOCITY_SMOOTHING: f64 = 0.9;

// --- Operator adjustments ---

/// Distance moved by one cardinal-direction nudge (meters).
pub const NUDGE_DISTANCE_M: f64 = 300.0;

/// Frame loop rate used by hosts without their own cadence (Hz).
pub const FRAME_RATE: u32 = 30;
