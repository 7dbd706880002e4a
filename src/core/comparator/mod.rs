//! # Comparator Module
//!
//! Groups photos by perceptual-hash distance.
//!
//! ## How It Works
//! 1. Walk the feature table in order; each unprocessed photo becomes an anchor
//! 2. Bucket every later unprocessed photo by its Hamming distance to the anchor
//! 3. Emit a duplicate group if the anchor has duplicate matches, otherwise a
//!    similar group if it has similar matches
//!
//! ## Default Bands
//! | Distance | Bucket    |
//! |----------|-----------|
//! | 0-8      | Duplicate |
//! | 9-18     | Similar   |
//! | 19+      | Unrelated |
//!
//! A photo without a hash is at distance 64 from everything and never groups.

mod grouper;
mod traits;

pub use grouper::DistanceGrouper;
pub use traits::{ComparisonStrategy, ThresholdStrategy};

use crate::core::group::PhotoGroup;
use serde::{Deserialize, Serialize};

/// What a hash distance says about two photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceBucket {
    Duplicate,
    Similar,
    Unrelated,
}

/// Output of the distance grouper. No path appears in more than one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceGroups {
    pub duplicates: Vec<PhotoGroup>,
    pub similars: Vec<PhotoGroup>,
}

impl DistanceGroups {
    /// Total number of groups of either kind
    pub fn len(&self) -> usize {
        self.duplicates.len() + self.similars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty() && self.similars.is_empty()
    }
}
