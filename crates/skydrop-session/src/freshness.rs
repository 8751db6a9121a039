//! Fix freshness classification and HUD readout policies.

use serde::{Deserialize, Serialize};

use skydrop_core::config::FreshnessThresholds;
use skydrop_core::enums::{FreshnessLevel, ReadoutPolicy};

/// RGB triple for HUD tinting.
pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const RED: Rgb = [255, 0, 0];

/// Classifies fix age against fixed thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshnessEvaluator {
    thresholds: FreshnessThresholds,
}

/// A numeric readout after its staleness policy has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadoutView {
    /// `None` when blanked or when there is nothing to show yet.
    pub value: Option<f64>,
    pub level: FreshnessLevel,
}

impl FreshnessEvaluator {
    pub fn new(thresholds: FreshnessThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &FreshnessThresholds {
        &self.thresholds
    }

    pub fn classify(&self, ms_since_last_fix: u64) -> FreshnessLevel {
        if ms_since_last_fix >= self.thresholds.stale_millis {
            FreshnessLevel::Stale
        } else if ms_since_last_fix >= self.thresholds.aging_millis {
            FreshnessLevel::Aging
        } else {
            FreshnessLevel::Fresh
        }
    }

    /// Like [`FreshnessEvaluator::classify`], with no fix at all counting as stale.
    pub fn classify_age(&self, ms_since_last_fix: Option<u64>) -> FreshnessLevel {
        ms_since_last_fix.map_or(FreshnessLevel::Stale, |ms| self.classify(ms))
    }

    /// White until the fade starts, red after it ends, linear in between.
    pub fn color(&self, ms_since_last_fix: Option<u64>) -> Rgb {
        let Some(ms) = ms_since_last_fix else {
            return RED;
        };
        let start = self.thresholds.fade_start_millis;
        let end = self.thresholds.fade_end_millis;
        if ms < start {
            WHITE
        } else if ms > end || end <= start {
            RED
        } else {
            let progress = (ms - start) as f64 / (end - start) as f64;
            let green_blue = (255.0 * (1.0 - progress)).round() as u8;
            [255, green_blue, green_blue]
        }
    }
}

/// Apply a display's staleness policy to its latest value.
pub fn present_readout(
    value: Option<f64>,
    level: FreshnessLevel,
    policy: ReadoutPolicy,
) -> ReadoutView {
    let value = match (policy, level) {
        (ReadoutPolicy::BlankWhenStale, FreshnessLevel::Stale) => None,
        _ => value,
    };
    ReadoutView { value, level }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_thresholds() {
        let f = FreshnessEvaluator::default();
        assert_eq!(f.classify(500), FreshnessLevel::Fresh);
        assert_eq!(f.classify(1500), FreshnessLevel::Aging);
        assert_eq!(f.classify(3500), FreshnessLevel::Stale);
    }

    #[test]
    fn test_classify_boundaries() {
        let f = FreshnessEvaluator::default();
        assert_eq!(f.classify(999), FreshnessLevel::Fresh);
        assert_eq!(f.classify(1000), FreshnessLevel::Aging);
        assert_eq!(f.classify(2999), FreshnessLevel::Aging);
        assert_eq!(f.classify(3000), FreshnessLevel::Stale);
        assert_eq!(f.classify_age(None), FreshnessLevel::Stale);
    }

    #[test]
    fn test_custom_thresholds() {
        let f = FreshnessEvaluator::new(FreshnessThresholds {
            aging_millis: 200,
            stale_millis: 400,
            ..Default::default()
        });
        assert_eq!(f.classify(300), FreshnessLevel::Aging);
        assert_eq!(f.classify(400), FreshnessLevel::Stale);
    }

    #[test]
    fn test_color_fade() {
        let f = FreshnessEvaluator::default();
        assert_eq!(f.color(Some(0)), WHITE);
        assert_eq!(f.color(Some(999)), WHITE);
        assert_eq!(f.color(Some(3500)), [255, 128, 128]);
        assert_eq!(f.color(Some(6000)), RED);
        assert_eq!(f.color(Some(60_000)), RED);
        assert_eq!(f.color(None), RED);
    }

    #[test]
    fn test_blank_policy_clears_when_stale() {
        let view = present_readout(Some(42.0), FreshnessLevel::Stale, ReadoutPolicy::BlankWhenStale);
        assert_eq!(view.value, None);
        let view = present_readout(Some(42.0), FreshnessLevel::Aging, ReadoutPolicy::BlankWhenStale);
        assert_eq!(view.value, Some(42.0));
    }

    #[test]
    fn test_recolor_policy_keeps_value() {
        let view = present_readout(
            Some(1234.0),
            FreshnessLevel::Stale,
            ReadoutPolicy::RecolorWhenStale,
        );
        assert_eq!(view.value, Some(1234.0));
        assert_eq!(view.level, FreshnessLevel::Stale);
    }
}
