//! # Classifier Module
//!
//! Flags photos that are probably not worth keeping.
//!
//! ## Rules
//! Evaluated independently, always in this order:
//! - **BLUR** - sharpness below the blur threshold
//! - **FLAT** - histogram entropy below the flat threshold
//! - **BLACK** - very dark and uniform (lens cap, pocket shot)
//! - **WHITE** - very bright and uniform (blown-out exposure)
//! - **FINGER** - mostly skin tone with little texture
//!
//! Rules that need color statistics are skipped when the record has none.
//! Each rule carries a fixed weight; a classification's confidence is the
//! mean weight of the rules it triggered.

use crate::core::config::SweepConfig;
use crate::core::features::{FeatureRecord, FeatureTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Separator between the explanations of multiple triggered rules
pub const REASON_SEPARATOR: &str = " • ";

/// A reason a photo may be useless
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UselessLabel {
    Blur,
    Flat,
    Black,
    White,
    Finger,
}

impl UselessLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UselessLabel::Blur => "BLUR",
            UselessLabel::Flat => "FLAT",
            UselessLabel::Black => "BLACK",
            UselessLabel::White => "WHITE",
            UselessLabel::Finger => "FINGER",
        }
    }

    /// How reliably this rule alone marks a photo as useless
    pub fn weight(&self) -> f64 {
        match self {
            UselessLabel::Blur => 0.8,
            UselessLabel::Flat => 0.75,
            UselessLabel::Black | UselessLabel::White => 0.9,
            UselessLabel::Finger => 0.7,
        }
    }
}

impl fmt::Display for UselessLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels and explanation for one flagged photo. Never has empty `labels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub path: PathBuf,
    /// Triggered rules in rule order
    pub labels: Vec<UselessLabel>,
    /// Per-rule explanations joined by [`REASON_SEPARATOR`]
    pub reason: String,
    /// Mean weight of the triggered rules, in (0, 1]
    pub confidence: f64,
}

impl Classification {
    /// Labels as shown in the report's Type column, e.g. `"BLUR, FLAT"`
    pub fn label_list(&self) -> String {
        self.labels
            .iter()
            .map(UselessLabel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rule-based useless-photo classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    blur_threshold: f64,
    flat_entropy_threshold: f64,
    black_luminance_max: f64,
    white_luminance_min: f64,
    exposure_variance_max: f64,
    finger_skin_tone_min: f64,
    finger_texture_variance_max: f64,
}

impl Classifier {
    pub fn new(config: &SweepConfig) -> Self {
        Self {
            blur_threshold: config.blur_threshold,
            flat_entropy_threshold: config.flat_entropy_threshold,
            black_luminance_max: config.black_luminance_max,
            white_luminance_min: config.white_luminance_min,
            exposure_variance_max: config.exposure_variance_max,
            finger_skin_tone_min: config.finger_skin_tone_min,
            finger_texture_variance_max: config.finger_texture_variance_max,
        }
    }

    /// Classify one record; `None` when no rule fires
    pub fn classify(&self, record: &FeatureRecord) -> Option<Classification> {
        let mut labels = Vec::new();
        let mut reasons = Vec::new();

        if record.blur_score < self.blur_threshold {
            labels.push(UselessLabel::Blur);
            reasons.push(format!(
                "Blurry (sharpness {:.1} < {:.1})",
                record.blur_score, self.blur_threshold
            ));
        }

        if record.entropy < self.flat_entropy_threshold {
            labels.push(UselessLabel::Flat);
            reasons.push(format!(
                "Flat background (entropy {:.2} < {:.2})",
                record.entropy, self.flat_entropy_threshold
            ));
        }

        if let Some(color) = &record.color {
            let uniform = color.luminance_variance < self.exposure_variance_max;

            if uniform && color.mean_luminance < self.black_luminance_max {
                labels.push(UselessLabel::Black);
                reasons.push(format!(
                    "Black frame (luminance {:.1}% < {:.1}%)",
                    color.mean_luminance * 100.0,
                    self.black_luminance_max * 100.0
                ));
            }

            if uniform && color.mean_luminance > self.white_luminance_min {
                labels.push(UselessLabel::White);
                reasons.push(format!(
                    "White frame (luminance {:.1}% > {:.1}%)",
                    color.mean_luminance * 100.0,
                    self.white_luminance_min * 100.0
                ));
            }

            if color.skin_tone_percentage > self.finger_skin_tone_min
                && color.luminance_variance < self.finger_texture_variance_max
            {
                labels.push(UselessLabel::Finger);
                reasons.push(format!(
                    "Finger over lens ({:.0}% skin tone > {:.0}%)",
                    color.skin_tone_percentage * 100.0,
                    self.finger_skin_tone_min * 100.0
                ));
            }
        }

        if labels.is_empty() {
            return None;
        }

        let confidence =
            labels.iter().map(UselessLabel::weight).sum::<f64>() / labels.len() as f64;

        Some(Classification {
            path: record.path.clone(),
            labels,
            reason: reasons.join(REASON_SEPARATOR),
            confidence,
        })
    }

    /// Classify every record, keeping table order
    pub fn classify_all(&self, table: &FeatureTable) -> Vec<Classification> {
        table
            .records()
            .iter()
            .filter_map(|record| self.classify(record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::{ColorStats, ImageHashValue};
    use chrono::{DateTime, Utc};

    fn record(blur: f64, entropy: f64, color: Option<ColorStats>) -> FeatureRecord {
        FeatureRecord {
            path: PathBuf::from("/photos/test.jpg"),
            hash: Some(ImageHashValue::from_u64(0)),
            blur_score: blur,
            entropy,
            color,
            size_bytes: 1000,
            modified: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn color(lum: f64, var: f64, skin: f64) -> Option<ColorStats> {
        Some(ColorStats {
            mean_luminance: lum,
            luminance_variance: var,
            skin_tone_percentage: skin,
        })
    }

    fn classifier() -> Classifier {
        Classifier::new(&SweepConfig::default())
    }

    #[test]
    fn healthy_photo_is_not_flagged() {
        assert!(classifier()
            .classify(&record(250.0, 6.5, color(0.5, 0.08, 0.1)))
            .is_none());
    }

    #[test]
    fn blurry_photo_without_color_is_blur_only() {
        let result = classifier().classify(&record(30.0, 5.0, None)).unwrap();

        assert_eq!(result.labels, vec![UselessLabel::Blur]);
        assert!(result.reason.contains("60"));
        assert!(result.reason.contains("30"));
        assert!(!result.reason.contains(REASON_SEPARATOR));
    }

    #[test]
    fn black_frame_is_black_only() {
        let result = classifier()
            .classify(&record(200.0, 5.0, color(0.05, 0.005, 0.0)))
            .unwrap();

        assert_eq!(result.labels, vec![UselessLabel::Black]);
        assert!(!result.labels.contains(&UselessLabel::White));
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn white_frame_is_white_only() {
        let result = classifier()
            .classify(&record(200.0, 5.0, color(0.95, 0.003, 0.0)))
            .unwrap();

        assert_eq!(result.labels, vec![UselessLabel::White]);
        assert!(!result.labels.contains(&UselessLabel::Black));
    }

    #[test]
    fn dark_but_textured_photo_is_not_black() {
        assert!(classifier()
            .classify(&record(200.0, 5.0, color(0.05, 0.02, 0.0)))
            .is_none());
    }

    #[test]
    fn finger_requires_skin_and_low_texture() {
        let finger = classifier()
            .classify(&record(200.0, 5.0, color(0.6, 0.03, 0.7)))
            .unwrap();
        assert_eq!(finger.labels, vec![UselessLabel::Finger]);
        assert!(finger.reason.contains("70%"));

        // Portraits have skin but plenty of texture
        assert!(classifier()
            .classify(&record(200.0, 5.0, color(0.6, 0.06, 0.7)))
            .is_none());
    }

    #[test]
    fn multiple_rules_keep_rule_order() {
        let result = classifier()
            .classify(&record(10.0, 1.0, color(0.02, 0.001, 0.0)))
            .unwrap();

        assert_eq!(
            result.labels,
            vec![UselessLabel::Blur, UselessLabel::Flat, UselessLabel::Black]
        );
        assert_eq!(result.label_list(), "BLUR, FLAT, BLACK");
        assert_eq!(result.reason.matches(REASON_SEPARATOR).count(), 2);
        assert!(result.reason.starts_with("Blurry"));
    }

    #[test]
    fn confidence_is_mean_rule_weight() {
        let result = classifier()
            .classify(&record(10.0, 1.0, color(0.02, 0.001, 0.0)))
            .unwrap();

        // (0.8 + 0.75 + 0.9) / 3
        assert!((result.confidence - 0.816_666).abs() < 1e-3);

        let finger = classifier()
            .classify(&record(200.0, 5.0, color(0.6, 0.03, 0.7)))
            .unwrap();
        assert_eq!(finger.confidence, 0.7);
    }

    #[test]
    fn thresholds_are_strict() {
        // Exactly at the threshold is not below it
        assert!(classifier().classify(&record(60.0, 3.0, None)).is_none());
    }

    #[test]
    fn thresholds_come_from_config() {
        let config = SweepConfig {
            blur_threshold: 20.0,
            ..SweepConfig::default()
        };
        assert!(Classifier::new(&config)
            .classify(&record(30.0, 5.0, None))
            .is_none());
    }

    #[test]
    fn classify_all_keeps_table_order() {
        let mut a = record(10.0, 5.0, None);
        a.path = PathBuf::from("/b.jpg");
        let mut b = record(200.0, 5.0, None);
        b.path = PathBuf::from("/ok.jpg");
        let mut c = record(200.0, 1.0, None);
        c.path = PathBuf::from("/a.jpg");

        let results = classifier().classify_all(&FeatureTable::from_records(vec![a, b, c]));

        let paths: Vec<_> = results.iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("/b.jpg"), PathBuf::from("/a.jpg")]);
    }
}
