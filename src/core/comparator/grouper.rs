//! Greedy anchor-based grouping over the feature table.
//!
//! Each group is the anchor plus its direct matches; membership is not
//! transitive. If A matches B and B matches C but A does not match C, C is
//! left for a later anchor.

use super::{ComparisonStrategy, DistanceBucket, DistanceGroups, ThresholdStrategy};
use crate::core::config::SweepConfig;
use crate::core::features::{hash_distance, FeatureTable};
use crate::core::group::{GroupKind, PhotoGroup};
use crate::events::{null_sender, Event, EventSender, GroupEvent};

/// Groups photos into duplicate and similar clusters
pub struct DistanceGrouper {
    strategy: Box<dyn ComparisonStrategy>,
}

impl DistanceGrouper {
    /// Grouper using the Hamming bands of `config`
    pub fn new(config: &SweepConfig) -> Self {
        Self::with_strategy(Box::new(ThresholdStrategy::from_config(config)))
    }

    /// Grouper with a custom distance policy
    pub fn with_strategy(strategy: Box<dyn ComparisonStrategy>) -> Self {
        Self { strategy }
    }

    pub fn group(&self, table: &FeatureTable) -> DistanceGroups {
        self.group_with_events(table, &null_sender())
    }

    /// Group with progress events
    ///
    /// Emits a progress event per anchor, at most ~50 times per run.
    pub fn group_with_events(&self, table: &FeatureTable, events: &EventSender) -> DistanceGroups {
        let records = table.records();
        let n = records.len();

        events.send(Event::Group(GroupEvent::Started { total_photos: n }));
        tracing::debug!(photos = n, strategy = %self.strategy.description(), "distance grouping");

        let mut processed = vec![false; n];
        let mut groups = DistanceGroups::default();
        let update_interval = std::cmp::max(1, n / 50);

        for i in 0..n {
            if processed[i] {
                continue;
            }

            let anchor = &records[i];
            let mut duplicates = vec![anchor.path.clone()];
            let mut similars = vec![anchor.path.clone()];
            let mut duplicate_indices = Vec::new();
            let mut similar_indices = Vec::new();

            for (j, other) in records.iter().enumerate().skip(i + 1) {
                if processed[j] {
                    continue;
                }

                let distance = hash_distance(anchor.hash.as_ref(), other.hash.as_ref());
                match self.strategy.bucket(distance) {
                    DistanceBucket::Duplicate => {
                        duplicates.push(other.path.clone());
                        duplicate_indices.push(j);
                    }
                    DistanceBucket::Similar => {
                        similars.push(other.path.clone());
                        similar_indices.push(j);
                    }
                    DistanceBucket::Unrelated => {}
                }
            }

            let emitted = if duplicates.len() >= 2 {
                let group =
                    PhotoGroup::new(GroupKind::Duplicate, groups.duplicates.len() + 1, duplicates);
                processed[i] = true;
                for j in duplicate_indices {
                    processed[j] = true;
                }
                groups.duplicates.push(group);
                groups.duplicates.last()
            } else if similars.len() >= 2 {
                let group =
                    PhotoGroup::new(GroupKind::Similar, groups.similars.len() + 1, similars);
                processed[i] = true;
                for j in similar_indices {
                    processed[j] = true;
                }
                groups.similars.push(group);
                groups.similars.last()
            } else {
                None
            };

            if let Some(group) = emitted {
                tracing::debug!(group = %group.id(), members = group.len(), anchor = %group.anchor().display(), "group found");
                events.send(Event::Group(GroupEvent::GroupFound {
                    group_id: group.id(),
                    photo_count: group.len(),
                }));
            }

            if (i + 1) % update_interval == 0 || i + 1 == n {
                events.send(Event::Group(GroupEvent::Progress {
                    anchors_processed: i + 1,
                    total: n,
                }));
            }
        }

        groups
    }
}
