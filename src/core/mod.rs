//! # Core Module
//!
//! The UI-agnostic sweep engine.
//!
//! ## Modules
//! - `scanner` - Discovers photos in a directory
//! - `features` - Computes per-photo features (hash, blur, entropy, color)
//! - `classifier` - Flags blurry, flat, black, white and finger photos
//! - `comparator` - Groups duplicates and similar photos by hash distance
//! - `burst` - Groups photos taken in rapid succession
//! - `reporter` - Assembles and exports the report
//! - `pipeline` - Orchestrates the full workflow
//! - `config` - Thresholds and presets

pub mod burst;
pub mod classifier;
pub mod comparator;
pub mod config;
pub mod features;
pub mod group;
pub mod pipeline;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use classifier::{Classification, Classifier, UselessLabel};
pub use comparator::DistanceGroups;
pub use config::{Preset, SweepConfig};
pub use features::{FeatureExtractor, FeatureRecord, FeatureTable};
pub use group::{GroupKind, PhotoGroup};
pub use reporter::{Recommendation, ReportRow, ReportSummary, SweepReport};
pub use scanner::PhotoFile;
