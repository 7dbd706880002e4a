//! Pipeline execution implementation.

use crate::core::burst::BurstGrouper;
use crate::core::classifier::Classifier;
use crate::core::comparator::DistanceGrouper;
use crate::core::config::SweepConfig;
use crate::core::features::{FeatureExtractor, FeatureRecord, FeatureTable, ImageFeatureExtractor};
use crate::core::reporter::{ReportAssembler, SweepReport};
use crate::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
use crate::error::SweepError;
use crate::events::{
    null_sender, Event, EventSender, ExtractEvent, ExtractProgress, GroupEvent, PipelineEvent,
    PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// The assembled report
    pub report: SweepReport,
    /// Features of every scanned photo, in scan order
    pub table: FeatureTable,
    /// Non-fatal errors (unreadable entries, degraded extractions)
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    /// Summary in the form carried by [`PipelineEvent::Completed`]
    pub fn summary(&self) -> PipelineSummary {
        let summary = &self.report.summary;
        PipelineSummary {
            total_images: summary.total_images,
            duplicate_groups: summary.duplicate_groups,
            similar_groups: summary.similar_groups,
            burst_groups: summary.burst_groups,
            useless_photos: summary.useless_photos,
            duration_ms: self.duration_ms,
        }
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Directory to sweep
    pub root: PathBuf,
    /// Decision thresholds
    pub sweep: SweepConfig,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    extractor: Option<Box<dyn FeatureExtractor>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            extractor: None,
        }
    }

    /// Set the directory to sweep
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the thresholds
    pub fn config(mut self, config: SweepConfig) -> Self {
        self.config.sweep = config;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Replace the image-backed feature extractor
    pub fn extractor(mut self, extractor: Box<dyn FeatureExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let extractor = self
            .extractor
            .unwrap_or_else(|| Box::new(ImageFeatureExtractor::new(&self.config.sweep)));
        Pipeline {
            config: self.config,
            extractor,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The sweep pipeline: scan, extract, classify and group, report
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Box<dyn FeatureExtractor>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, SweepError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    ///
    /// Fails only on an invalid config or an unusable root directory.
    /// Photos whose features cannot be extracted continue as degraded
    /// records and are listed in [`PipelineResult::errors`].
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, SweepError> {
        let start_time = Instant::now();
        let sweep = &self.config.sweep;
        let mut errors = Vec::new();

        events.send(Event::Pipeline(PipelineEvent::Started));

        if let Err(e) = sweep.validate() {
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: e.to_string(),
            }));
            return Err(e.into());
        }

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(self.config.scan_config.clone());
        let scan_result = match scanner.scan_with_events(&self.config.root, events) {
            Ok(result) => result,
            Err(e) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
                return Err(e.into());
            }
        };

        errors.extend(scan_result.errors.iter().map(|e| e.to_string()));
        let photos = scan_result.photos;
        let total_photos = photos.len();

        // Phase 2: Extracting
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Extracting,
        }));
        events.send(Event::Extract(ExtractEvent::Started { total_photos }));

        let completed = AtomicUsize::new(0);
        let extractor = self.extractor.as_ref();

        // Indexed collect keeps scan order
        let extracted: Vec<(FeatureRecord, Option<String>)> = photos
            .par_iter()
            .map(|photo| {
                let outcome = match extractor.extract(photo) {
                    Ok(record) => (record, None),
                    Err(e) => {
                        let message = e.to_string();
                        tracing::warn!(path = %photo.path.display(), error = %message, "feature extraction failed, using degraded record");
                        events.send(Event::Extract(ExtractEvent::Degraded {
                            path: photo.path.clone(),
                            message: message.clone(),
                        }));
                        (FeatureRecord::degraded(photo), Some(message))
                    }
                };

                let current_completed = completed.fetch_add(1, Ordering::SeqCst) + 1;
                events.send(Event::Extract(ExtractEvent::Progress(ExtractProgress {
                    completed: current_completed,
                    total: total_photos,
                    current_path: photo.path.clone(),
                })));

                outcome
            })
            .collect();

        let mut records = Vec::with_capacity(extracted.len());
        let mut degraded = 0;
        for (record, error) in extracted {
            if let Some(message) = error {
                degraded += 1;
                errors.push(message);
            }
            records.push(record);
        }
        let table = FeatureTable::from_records(records);

        events.send(Event::Extract(ExtractEvent::Completed {
            total_extracted: total_photos.saturating_sub(degraded),
            degraded,
        }));

        // Phase 3: Grouping
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Grouping,
        }));

        let classifications = Classifier::new(sweep).classify_all(&table);
        let distance_groups = DistanceGrouper::new(sweep).group_with_events(&table, events);
        let bursts = BurstGrouper::new(sweep).group(&table.timestamps());

        for burst in &bursts {
            events.send(Event::Group(GroupEvent::GroupFound {
                group_id: burst.id(),
                photo_count: burst.len(),
            }));
        }
        events.send(Event::Group(GroupEvent::Completed {
            duplicate_groups: distance_groups.duplicates.len(),
            similar_groups: distance_groups.similars.len(),
            burst_groups: bursts.len(),
        }));

        // Phase 4: Reporting
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Reporting,
        }));

        let report =
            ReportAssembler::new(sweep).assemble(&table, &classifications, &distance_groups, &bursts);

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let summary = &report.summary;
        tracing::info!(
            total_images = summary.total_images,
            duplicate_groups = summary.duplicate_groups,
            similar_groups = summary.similar_groups,
            burst_groups = summary.burst_groups,
            useless_photos = summary.useless_photos,
            reclaimable_bytes = summary.reclaimable_bytes,
            errors = errors.len(),
            duration_ms,
            "sweep complete"
        );

        let result = PipelineResult {
            report,
            table,
            errors,
            duration_ms,
        };

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: result.summary(),
        }));

        Ok(result)
    }
}
