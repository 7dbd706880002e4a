//! Detection thresholds.
//!
//! A [`SweepConfig`] is built once per run and handed by reference to every
//! component that needs a threshold; nothing reads thresholds from global
//! state.

use crate::core::features::MAX_HASH_DISTANCE;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named threshold presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Balanced defaults
    Default,
    /// Fewer false positives
    Conservative,
    /// More detections
    Aggressive,
}

/// Thresholds for grouping and useless-photo classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Maximum Hamming distance for a duplicate
    pub duplicate_hamming_max: u32,
    /// Lower edge of the similar band (inclusive)
    pub similar_hamming_min: u32,
    /// Upper edge of the similar band (inclusive)
    pub similar_hamming_max: u32,

    /// Laplacian variance below which a photo is blurred
    pub blur_threshold: f64,
    /// Histogram entropy below which a photo is a flat background
    pub flat_entropy_threshold: f64,
    /// Mean luminance below which a low-variance photo is black
    pub black_luminance_max: f64,
    /// Mean luminance above which a low-variance photo is white
    pub white_luminance_min: f64,
    /// Luminance variance ceiling for the black and white rules
    pub exposure_variance_max: f64,
    /// Skin-tone share above which a low-texture photo is a finger
    pub finger_skin_tone_min: f64,
    /// Luminance variance ceiling for the finger rule
    pub finger_texture_variance_max: f64,

    /// Maximum gap between consecutive shots of a burst, in seconds
    pub burst_time_window_secs: f64,

    /// Histogram bins used for entropy
    pub entropy_bins: usize,
    /// Longest edge images are resized to before blur/entropy/color analysis
    pub analysis_size: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            duplicate_hamming_max: 8,
            similar_hamming_min: 9,
            similar_hamming_max: 18,
            blur_threshold: 60.0,
            flat_entropy_threshold: 3.0,
            black_luminance_max: 0.1,
            white_luminance_min: 0.9,
            exposure_variance_max: 0.01,
            finger_skin_tone_min: 0.4,
            finger_texture_variance_max: 0.05,
            burst_time_window_secs: 2.0,
            entropy_bins: 8,
            analysis_size: 512,
        }
    }
}

impl SweepConfig {
    /// Stricter grouping and classification
    pub fn conservative() -> Self {
        Self {
            duplicate_hamming_max: 5,
            blur_threshold: 80.0,
            flat_entropy_threshold: 2.5,
            ..Self::default()
        }
    }

    /// Looser grouping and classification
    pub fn aggressive() -> Self {
        Self {
            duplicate_hamming_max: 10,
            similar_hamming_min: 11,
            similar_hamming_max: 20,
            blur_threshold: 50.0,
            flat_entropy_threshold: 3.5,
            ..Self::default()
        }
    }

    /// Build the config for a named preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Default => Self::default(),
            Preset::Conservative => Self::conservative(),
            Preset::Aggressive => Self::aggressive(),
        }
    }

    /// Load thresholds from a JSON file.
    ///
    /// Missing fields take their default value. The result is validated.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: SweepConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the thresholds describe a usable configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.similar_hamming_min <= self.duplicate_hamming_max {
            return Err(ConfigError::Invalid {
                field: "similar_hamming_min",
                reason: format!(
                    "{} must exceed duplicate_hamming_max ({})",
                    self.similar_hamming_min, self.duplicate_hamming_max
                ),
            });
        }
        if self.similar_hamming_max < self.similar_hamming_min {
            return Err(ConfigError::Invalid {
                field: "similar_hamming_max",
                reason: format!(
                    "{} is below similar_hamming_min ({})",
                    self.similar_hamming_max, self.similar_hamming_min
                ),
            });
        }
        // Photos without a hash sit at the sentinel distance and must stay ungrouped.
        if self.similar_hamming_max >= MAX_HASH_DISTANCE {
            return Err(ConfigError::Invalid {
                field: "similar_hamming_max",
                reason: format!("must be below {}", MAX_HASH_DISTANCE),
            });
        }

        let non_negative = [
            ("blur_threshold", self.blur_threshold),
            ("flat_entropy_threshold", self.flat_entropy_threshold),
            ("exposure_variance_max", self.exposure_variance_max),
            ("finger_texture_variance_max", self.finger_texture_variance_max),
            ("burst_time_window_secs", self.burst_time_window_secs),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} must be a finite, non-negative number", value),
                });
            }
        }

        let unit_interval = [
            ("black_luminance_max", self.black_luminance_max),
            ("white_luminance_min", self.white_luminance_min),
            ("finger_skin_tone_min", self.finger_skin_tone_min),
        ];
        for (field, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} must lie within 0.0..=1.0", value),
                });
            }
        }

        // Disjoint bounds keep BLACK and WHITE mutually exclusive.
        if self.black_luminance_max > self.white_luminance_min {
            return Err(ConfigError::Invalid {
                field: "black_luminance_max",
                reason: format!(
                    "{} exceeds white_luminance_min ({})",
                    self.black_luminance_max, self.white_luminance_min
                ),
            });
        }

        if !(1..=256).contains(&self.entropy_bins) {
            return Err(ConfigError::Invalid {
                field: "entropy_bins",
                reason: format!("{} must lie within 1..=256", self.entropy_bins),
            });
        }
        if self.analysis_size < 8 {
            return Err(ConfigError::Invalid {
                field: "analysis_size",
                reason: format!("{} is too small (minimum 8)", self.analysis_size),
            });
        }

        Ok(())
    }
}
