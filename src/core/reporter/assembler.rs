//! Report assembly with cross-category de-duplication.

use super::{Recommendation, ReportRow, ReportSummary, RowType, SweepReport};
use crate::core::classifier::Classification;
use crate::core::comparator::DistanceGroups;
use crate::core::config::SweepConfig;
use crate::core::features::FeatureTable;
use crate::core::group::{GroupKind, PhotoGroup};
use std::collections::HashMap;
use std::path::PathBuf;

/// Builds the report rows and summary
pub struct ReportAssembler {
    duplicate_reason: String,
    similar_reason: String,
    burst_reason: String,
}

impl ReportAssembler {
    pub fn new(config: &SweepConfig) -> Self {
        Self {
            duplicate_reason: format!("Hamming ≤ {}", config.duplicate_hamming_max),
            similar_reason: format!(
                "Hamming {}-{}",
                config.similar_hamming_min, config.similar_hamming_max
            ),
            burst_reason: format!("Timestamps ±{}s", config.burst_time_window_secs),
        }
    }

    /// Assemble the report.
    ///
    /// Rows are emitted duplicates first, then similars, bursts and finally
    /// standalone useless photos in the order of `classifications`. A path
    /// claimed by an earlier category is skipped by every later one.
    pub fn assemble(
        &self,
        table: &FeatureTable,
        classifications: &[Classification],
        distance_groups: &DistanceGroups,
        bursts: &[PhotoGroup],
    ) -> SweepReport {
        let mut owner: HashMap<PathBuf, GroupKind> = HashMap::new();
        let mut rows = Vec::new();

        self.push_groups(
            &distance_groups.duplicates,
            &self.duplicate_reason,
            Recommendation::Delete,
            table,
            &mut owner,
            &mut rows,
        );
        self.push_groups(
            &distance_groups.similars,
            &self.similar_reason,
            Recommendation::Review,
            table,
            &mut owner,
            &mut rows,
        );
        self.push_groups(
            bursts,
            &self.burst_reason,
            Recommendation::Delete,
            table,
            &mut owner,
            &mut rows,
        );

        for classification in classifications {
            if owner.contains_key(&classification.path) {
                continue;
            }
            rows.push(ReportRow {
                id: rows.len() + 1,
                path: classification.path.clone(),
                group: None,
                row_type: RowType::Useless(classification.labels.clone()),
                reason: classification.reason.clone(),
                size_bytes: table.size_of(&classification.path),
                recommendation: Recommendation::Delete,
                confidence: Some(classification.confidence),
            });
        }

        let reclaimable_bytes = rows
            .iter()
            .filter(|row| row.recommendation == Recommendation::Delete)
            .map(|row| row.size_bytes)
            .sum();

        let summary = ReportSummary {
            total_images: table.len(),
            duplicate_groups: distance_groups.duplicates.len(),
            similar_groups: distance_groups.similars.len(),
            burst_groups: bursts.len(),
            useless_photos: classifications.len(),
            reclaimable_bytes,
        };

        SweepReport { rows, summary }
    }

    /// Rows for one category of groups. The anchor is KEEP even when it is
    /// the only member not claimed earlier.
    fn push_groups(
        &self,
        groups: &[PhotoGroup],
        reason: &str,
        others: Recommendation,
        table: &FeatureTable,
        owner: &mut HashMap<PathBuf, GroupKind>,
        rows: &mut Vec<ReportRow>,
    ) {
        for group in groups {
            let group_id = group.id();
            for (position, path) in group.members.iter().enumerate() {
                if owner.contains_key(path) {
                    continue;
                }
                owner.insert(path.clone(), group.kind);

                let recommendation = if position == 0 {
                    Recommendation::Keep
                } else {
                    others
                };
                rows.push(ReportRow {
                    id: rows.len() + 1,
                    path: path.clone(),
                    group: Some(group_id.clone()),
                    row_type: RowType::Group(group.kind),
                    reason: reason.to_string(),
                    size_bytes: table.size_of(path),
                    recommendation,
                    confidence: None,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::UselessLabel;
    use crate::core::features::FeatureRecord;
    use chrono::{DateTime, Utc};

    fn table(entries: &[(&str, u64)]) -> FeatureTable {
        FeatureTable::from_records(
            entries
                .iter()
                .map(|(path, size)| FeatureRecord {
                    path: PathBuf::from(path),
                    hash: None,
                    blur_score: 100.0,
                    entropy: 5.0,
                    color: None,
                    size_bytes: *size,
                    modified: DateTime::<Utc>::UNIX_EPOCH,
                })
                .collect(),
        )
    }

    fn group(kind: GroupKind, number: usize, members: &[&str]) -> PhotoGroup {
        PhotoGroup::new(kind, number, members.iter().map(PathBuf::from).collect())
    }

    fn useless(path: &str, labels: Vec<UselessLabel>) -> Classification {
        Classification {
            path: PathBuf::from(path),
            labels,
            reason: "Blurry (sharpness 10.0 < 60.0)".to_string(),
            confidence: 0.8,
        }
    }

    fn assembler() -> ReportAssembler {
        ReportAssembler::new(&SweepConfig::default())
    }

    fn row<'a>(report: &'a SweepReport, path: &str) -> Vec<&'a ReportRow> {
        report
            .rows
            .iter()
            .filter(|r| r.path == PathBuf::from(path))
            .collect()
    }

    #[test]
    fn empty_inputs_yield_empty_report() {
        let report = assembler().assemble(&table(&[]), &[], &DistanceGroups::default(), &[]);

        assert!(report.is_empty());
        assert_eq!(report.summary, ReportSummary::default());
    }

    #[test]
    fn duplicate_group_recommendations() {
        let groups = DistanceGroups {
            duplicates: vec![group(GroupKind::Duplicate, 1, &["/a.jpg", "/b.jpg", "/c.jpg"])],
            similars: vec![],
        };
        let report = assembler().assemble(
            &table(&[("/a.jpg", 10), ("/b.jpg", 20), ("/c.jpg", 30)]),
            &[],
            &groups,
            &[],
        );

        let recommendations: Vec<_> = report.rows.iter().map(|r| r.recommendation).collect();
        assert_eq!(
            recommendations,
            vec![Recommendation::Keep, Recommendation::Delete, Recommendation::Delete]
        );
        assert_eq!(report.rows[0].group.as_deref(), Some("DUP-1"));
        assert_eq!(report.rows[0].reason, "Hamming ≤ 8");
        assert_eq!(report.rows[1].size_bytes, 20);
        assert_eq!(report.summary.reclaimable_bytes, 50);
    }

    #[test]
    fn similar_others_are_reviewed() {
        let groups = DistanceGroups {
            duplicates: vec![],
            similars: vec![group(GroupKind::Similar, 1, &["/a.jpg", "/b.jpg"])],
        };
        let report =
            assembler().assemble(&table(&[("/a.jpg", 1), ("/b.jpg", 1)]), &[], &groups, &[]);

        assert_eq!(report.rows[0].recommendation, Recommendation::Keep);
        assert_eq!(report.rows[1].recommendation, Recommendation::Review);
        assert_eq!(report.rows[1].reason, "Hamming 9-18");
        assert_eq!(report.rows[1].row_type.to_string(), "Similar");
        assert_eq!(report.summary.reclaimable_bytes, 0);
    }

    #[test]
    fn duplicate_member_is_not_reported_as_useless() {
        let groups = DistanceGroups {
            duplicates: vec![group(GroupKind::Duplicate, 1, &["/a.jpg", "/b.jpg"])],
            similars: vec![],
        };
        let classifications = vec![useless("/b.jpg", vec![UselessLabel::Blur])];
        let report = assembler().assemble(
            &table(&[("/a.jpg", 1), ("/b.jpg", 1)]),
            &classifications,
            &groups,
            &[],
        );

        assert_eq!(report.rows.len(), 2);
        assert_eq!(row(&report, "/b.jpg").len(), 1);
        assert_eq!(row(&report, "/b.jpg")[0].group.as_deref(), Some("DUP-1"));
        // Still counted as a useless photo in the summary
        assert_eq!(report.summary.useless_photos, 1);
    }

    #[test]
    fn burst_skips_photos_already_grouped() {
        let groups = DistanceGroups {
            duplicates: vec![group(GroupKind::Duplicate, 1, &["/a.jpg", "/b.jpg"])],
            similars: vec![],
        };
        let bursts = vec![group(GroupKind::Burst, 1, &["/b.jpg", "/c.jpg", "/d.jpg"])];
        let report = assembler().assemble(
            &table(&[("/a.jpg", 1), ("/b.jpg", 1), ("/c.jpg", 1), ("/d.jpg", 1)]),
            &[],
            &groups,
            &bursts,
        );

        assert_eq!(report.rows.len(), 4);
        assert_eq!(row(&report, "/b.jpg").len(), 1);
        let c = row(&report, "/c.jpg")[0];
        assert_eq!(c.group.as_deref(), Some("BURST-1"));
        assert_eq!(c.reason, "Timestamps ±2s");
        // Position in the burst decides, not position among emitted rows
        assert_eq!(c.recommendation, Recommendation::Delete);
        assert_eq!(c.confidence, None);
        assert_eq!(report.summary.burst_groups, 1);
    }

    #[test]
    fn standalone_useless_rows_are_deleted() {
        let classifications = vec![
            useless("/x.jpg", vec![UselessLabel::Blur, UselessLabel::Flat]),
            useless("/y.jpg", vec![UselessLabel::Black]),
        ];
        let report = assembler().assemble(
            &table(&[("/x.jpg", 100), ("/y.jpg", 200)]),
            &classifications,
            &DistanceGroups::default(),
            &[],
        );

        assert_eq!(report.rows.len(), 2);
        assert!(report.rows.iter().all(|r| r.recommendation == Recommendation::Delete));
        assert!(report.rows.iter().all(|r| r.group.is_none()));
        assert_eq!(report.rows[0].row_type.to_string(), "BLUR, FLAT");
        assert_eq!(report.rows[0].confidence, Some(0.8));
        assert_eq!(report.summary.reclaimable_bytes, 300);
    }

    #[test]
    fn row_ids_are_sequential_across_sections() {
        let groups = DistanceGroups {
            duplicates: vec![group(GroupKind::Duplicate, 1, &["/a.jpg", "/b.jpg"])],
            similars: vec![group(GroupKind::Similar, 1, &["/c.jpg", "/d.jpg"])],
        };
        let bursts = vec![
            group(GroupKind::Burst, 1, &["/a.jpg", "/e.jpg"]),
            group(GroupKind::Burst, 2, &["/f.jpg", "/g.jpg"]),
        ];
        let classifications = vec![
            useless("/c.jpg", vec![UselessLabel::Blur]),
            useless("/h.jpg", vec![UselessLabel::White]),
        ];
        let report = assembler().assemble(
            &table(&[
                ("/a.jpg", 1),
                ("/b.jpg", 1),
                ("/c.jpg", 1),
                ("/d.jpg", 1),
                ("/e.jpg", 1),
                ("/f.jpg", 1),
                ("/g.jpg", 1),
                ("/h.jpg", 1),
            ]),
            &classifications,
            &groups,
            &bursts,
        );

        let ids: Vec<_> = report.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());

        let order: Vec<_> = report
            .rows
            .iter()
            .map(|r| r.path.to_str().unwrap())
            .collect();
        assert_eq!(
            order,
            vec!["/a.jpg", "/b.jpg", "/c.jpg", "/d.jpg", "/e.jpg", "/f.jpg", "/g.jpg", "/h.jpg"]
        );
    }

    #[test]
    fn summary_counts_groups() {
        let groups = DistanceGroups {
            duplicates: vec![
                group(GroupKind::Duplicate, 1, &["/a.jpg", "/b.jpg"]),
                group(GroupKind::Duplicate, 2, &["/c.jpg", "/d.jpg"]),
            ],
            similars: vec![group(GroupKind::Similar, 1, &["/e.jpg", "/f.jpg"])],
        };
        let report = assembler().assemble(
            &table(&[("/a.jpg", 1), ("/b.jpg", 1), ("/z.jpg", 1)]),
            &[],
            &groups,
            &[],
        );

        assert_eq!(report.summary.total_images, 3);
        assert_eq!(report.summary.duplicate_groups, 2);
        assert_eq!(report.summary.similar_groups, 1);
        assert_eq!(report.summary.burst_groups, 0);
    }

    #[test]
    fn reasons_follow_config() {
        let report = ReportAssembler::new(&SweepConfig::aggressive()).assemble(
            &table(&[("/a.jpg", 1), ("/b.jpg", 1)]),
            &[],
            &DistanceGroups {
                duplicates: vec![],
                similars: vec![group(GroupKind::Similar, 1, &["/a.jpg", "/b.jpg"])],
            },
            &[],
        );
        assert_eq!(report.rows[0].reason, "Hamming 11-20");
    }
}
