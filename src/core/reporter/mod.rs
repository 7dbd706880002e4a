//! # Reporter Module
//!
//! Turns groups and classifications into the final report: one row per
//! photo with a recommendation the user can act on.
//!
//! ## Precedence
//! A photo is reported once, under the first category that claims it:
//! 1. **Duplicate** - anchor KEEP, others DELETE
//! 2. **Similar** - anchor KEEP, others REVIEW
//! 3. **Burst** - anchor KEEP, others DELETE
//! 4. **Useless** - always DELETE

mod assembler;
mod export;

pub use assembler::ReportAssembler;
pub use export::{export_csv, export_json, export_to_file, report_json, ExportFormat};

use crate::core::classifier::UselessLabel;
use crate::core::group::GroupKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What the user should do with a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Keep,
    Delete,
    Review,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Keep => write!(f, "KEEP"),
            Recommendation::Delete => write!(f, "DELETE"),
            Recommendation::Review => write!(f, "REVIEW"),
        }
    }
}

/// The category a row was reported under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowType {
    Group(GroupKind),
    Useless(Vec<UselessLabel>),
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowType::Group(kind) => f.write_str(kind.label()),
            RowType::Useless(labels) => {
                let labels: Vec<_> = labels.iter().map(UselessLabel::as_str).collect();
                f.write_str(&labels.join(", "))
            }
        }
    }
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// 1-based, gap-free across the whole report
    pub id: usize,
    pub path: PathBuf,
    /// Group id (`DUP-1`, `SIM-2`, `BURST-3`); `None` for standalone useless rows
    pub group: Option<String>,
    pub row_type: RowType,
    pub reason: String,
    pub size_bytes: u64,
    pub recommendation: Recommendation,
    /// Classifier confidence; only set on standalone useless rows
    pub confidence: Option<f64>,
}

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_images: usize,
    pub duplicate_groups: usize,
    pub similar_groups: usize,
    pub burst_groups: usize,
    /// Photos with at least one useless label, whether or not they were grouped
    pub useless_photos: usize,
    /// Bytes freed by acting on every DELETE row
    pub reclaimable_bytes: u64,
}

/// The assembled report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

impl SweepReport {
    /// Rows carrying the given recommendation
    pub fn rows_with(&self, recommendation: Recommendation) -> impl Iterator<Item = &ReportRow> {
        self.rows
            .iter()
            .filter(move |row| row.recommendation == recommendation)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_type_display() {
        assert_eq!(RowType::Group(GroupKind::Duplicate).to_string(), "Duplicate");
        assert_eq!(RowType::Group(GroupKind::Burst).to_string(), "Burst");
        assert_eq!(
            RowType::Useless(vec![UselessLabel::Blur, UselessLabel::Flat]).to_string(),
            "BLUR, FLAT"
        );
    }

    #[test]
    fn recommendation_display_is_uppercase() {
        assert_eq!(Recommendation::Keep.to_string(), "KEEP");
        assert_eq!(Recommendation::Delete.to_string(), "DELETE");
        assert_eq!(Recommendation::Review.to_string(), "REVIEW");
    }

    #[test]
    fn format_bytes_handles_all_sizes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024), "2.0 GB");
    }
}
