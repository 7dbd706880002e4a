//! Trait definitions for comparison strategies.

use super::DistanceBucket;
use crate::core::config::SweepConfig;

/// Strategy trait for deciding what a hash distance means
pub trait ComparisonStrategy: Send + Sync {
    /// Bucket a Hamming distance
    fn bucket(&self, distance: u32) -> DistanceBucket;

    /// Human-readable description of the strategy
    fn description(&self) -> String;
}

/// Fixed distance bands: `0..=duplicate_max` is a duplicate,
/// `similar_min..=similar_max` is similar, anything else is unrelated.
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    duplicate_max: u32,
    similar_min: u32,
    similar_max: u32,
}

impl ThresholdStrategy {
    pub fn new(duplicate_max: u32, similar_min: u32, similar_max: u32) -> Self {
        Self {
            duplicate_max,
            similar_min,
            similar_max,
        }
    }

    /// Bands taken from the Hamming thresholds of a config
    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(
            config.duplicate_hamming_max,
            config.similar_hamming_min,
            config.similar_hamming_max,
        )
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::from_config(&SweepConfig::default())
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn bucket(&self, distance: u32) -> DistanceBucket {
        if distance <= self.duplicate_max {
            DistanceBucket::Duplicate
        } else if (self.similar_min..=self.similar_max).contains(&distance) {
            DistanceBucket::Similar
        } else {
            DistanceBucket::Unrelated
        }
    }

    fn description(&self) -> String {
        format!(
            "Threshold strategy: duplicate at distance <= {}, similar at {}-{}",
            self.duplicate_max, self.similar_min, self.similar_max
        )
    }
}
