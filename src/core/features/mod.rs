//! # Features Module
//!
//! The per-photo feature vector every decision is made from.
//!
//! ## Contents
//! - [`FeatureRecord`] - hash, blur score, entropy, color stats, size, mtime
//! - [`FeatureTable`] - the ordered, read-only table for one run
//! - [`FeatureExtractor`] - the seam between the decision layer and pixels
//! - [`ImageFeatureExtractor`] - the `image`-backed extractor
//!
//! `hash` and `color` are `Option`s: "could not be computed" is never
//! encoded as a zero.

mod decode;
mod extractor;

pub use decode::{DecodeFormat, FastDecoder};
pub use extractor::ImageFeatureExtractor;

use crate::core::scanner::PhotoFile;
use crate::error::ExtractError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Distance reported when either side of a comparison has no hash
pub const MAX_HASH_DISTANCE: u32 = 64;

/// A fixed-width perceptual hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHashValue {
    bytes: Vec<u8>,
}

impl ImageHashValue {
    /// Create a hash from raw bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Create a 64-bit hash, most significant byte first
    pub fn from_u64(value: u64) -> Self {
        Self {
            bytes: value.to_be_bytes().to_vec(),
        }
    }

    /// Get the raw hash bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hamming distance: the number of differing bits.
    ///
    /// Bytes present in only one of the hashes count as fully different.
    pub fn distance(&self, other: &Self) -> u32 {
        let common: u32 = self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        let extra = self.bytes.len().abs_diff(other.bytes.len()) as u32 * 8;
        common + extra
    }

    /// Hash as a lowercase hexadecimal string
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// Distance between two optional hashes.
///
/// A missing hash on either side yields [`MAX_HASH_DISTANCE`], which lies
/// outside every duplicate and similar band.
pub fn hash_distance(a: Option<&ImageHashValue>, b: Option<&ImageHashValue>) -> u32 {
    match (a, b) {
        (Some(a), Some(b)) => a.distance(b),
        _ => MAX_HASH_DISTANCE,
    }
}

/// Luminance and skin-tone statistics, all in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStats {
    pub mean_luminance: f64,
    pub luminance_variance: f64,
    pub skin_tone_percentage: f64,
}

/// Features of one photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Path to the photo (unique key)
    pub path: PathBuf,
    /// Perceptual hash, `None` if it could not be computed
    pub hash: Option<ImageHashValue>,
    /// Laplacian variance (higher = sharper)
    pub blur_score: f64,
    /// Histogram entropy in bits
    pub entropy: f64,
    /// Color statistics, `None` if they could not be computed
    pub color: Option<ColorStats>,
    /// File size in bytes
    pub size_bytes: u64,
    /// Last modified time
    pub modified: DateTime<Utc>,
}

impl FeatureRecord {
    /// Record for a photo whose extraction failed.
    ///
    /// Hash and color are absent and the numeric features are zero, so the
    /// photo never joins a duplicate or similar group but does trip the
    /// blur and flat rules.
    pub fn degraded(photo: &PhotoFile) -> Self {
        Self {
            path: photo.path.clone(),
            hash: None,
            blur_score: 0.0,
            entropy: 0.0,
            color: None,
            size_bytes: photo.size,
            modified: photo.modified,
        }
    }
}

/// The read-only feature table for one run, in scan order
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    records: Vec<FeatureRecord>,
    index: HashMap<PathBuf, usize>,
}

impl FeatureTable {
    /// Build a table, keeping the first record for any repeated path
    pub fn from_records(records: Vec<FeatureRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            if table.index.contains_key(&record.path) {
                tracing::warn!(path = %record.path.display(), "duplicate feature record ignored");
                continue;
            }
            table.index.insert(record.path.clone(), table.records.len());
            table.records.push(record);
        }
        table
    }

    /// All records in table order
    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    /// Look up a record by path
    pub fn get(&self, path: &Path) -> Option<&FeatureRecord> {
        self.index.get(path).map(|&i| &self.records[i])
    }

    /// File size for a path, or 0 if the path is not in the table
    pub fn size_of(&self, path: &Path) -> u64 {
        self.get(path).map(|r| r.size_bytes).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (path, modified) pairs in table order, the input of burst grouping
    pub fn timestamps(&self) -> Vec<(PathBuf, DateTime<Utc>)> {
        self.records
            .iter()
            .map(|r| (r.path.clone(), r.modified))
            .collect()
    }
}

/// Computes the features of one photo
///
/// Implement this trait to plug in another image backend (or a fixed table
/// in tests). Callers turn an `Err` into [`FeatureRecord::degraded`].
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, photo: &PhotoFile) -> Result<FeatureRecord, ExtractError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::ImageFormat;

    fn record(path: &str, size: u64) -> FeatureRecord {
        FeatureRecord {
            path: PathBuf::from(path),
            hash: Some(ImageHashValue::from_u64(0)),
            blur_score: 100.0,
            entropy: 5.0,
            color: None,
            size_bytes: size,
            modified: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let hash = ImageHashValue::from_u64(0xDEAD_BEEF_0123_4567);
        assert_eq!(hash.distance(&hash), 0);
    }

    #[test]
    fn distance_counts_differing_bits() {
        let a = ImageHashValue::from_u64(0);
        let b = ImageHashValue::from_u64(0b1011);
        assert_eq!(a.distance(&b), 3);
        assert_eq!(b.distance(&a), 3);
    }

    #[test]
    fn distance_counts_missing_bytes() {
        let short = ImageHashValue::new(vec![0xFF]);
        let long = ImageHashValue::new(vec![0xFF, 0x00]);
        assert_eq!(short.distance(&long), 8);
    }

    #[test]
    fn missing_hash_yields_sentinel() {
        let hash = ImageHashValue::from_u64(0);
        assert_eq!(hash_distance(Some(&hash), None), MAX_HASH_DISTANCE);
        assert_eq!(hash_distance(None, Some(&hash)), MAX_HASH_DISTANCE);
        assert_eq!(hash_distance(None, None), MAX_HASH_DISTANCE);
        assert_eq!(hash_distance(Some(&hash), Some(&hash)), 0);
    }

    #[test]
    fn to_hex_produces_correct_string() {
        let hash = ImageHashValue::new(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(hash.to_hex(), "deadbeef");
    }

    #[test]
    fn degraded_record_has_no_hash_or_color() {
        let photo = PhotoFile {
            path: PathBuf::from("/photos/broken.jpg"),
            size: 1234,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            format: ImageFormat::Jpeg,
        };
        let record = FeatureRecord::degraded(&photo);

        assert!(record.hash.is_none());
        assert!(record.color.is_none());
        assert_eq!(record.blur_score, 0.0);
        assert_eq!(record.entropy, 0.0);
        assert_eq!(record.size_bytes, 1234);
    }

    #[test]
    fn table_keeps_order_and_first_duplicate() {
        let table = FeatureTable::from_records(vec![
            record("/b.jpg", 1),
            record("/a.jpg", 2),
            record("/b.jpg", 3),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].path, PathBuf::from("/b.jpg"));
        assert_eq!(table.size_of(Path::new("/b.jpg")), 1);
        assert_eq!(table.size_of(Path::new("/missing.jpg")), 0);
    }
}
