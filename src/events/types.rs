//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the sweep pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Feature extraction phase events
    Extract(ExtractEvent),
    /// Grouping phase events
    Group(GroupEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// A photo was found
    PhotoFound { path: PathBuf },
    /// An entry could not be read but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_photos: usize },
}

/// Events during feature extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractEvent {
    /// Extraction has started
    Started { total_photos: usize },
    /// Progress update during extraction
    Progress(ExtractProgress),
    /// Extraction failed; the photo continues with a degraded record
    Degraded { path: PathBuf, message: String },
    /// Extraction completed
    Completed { total_extracted: usize, degraded: usize },
}

/// Progress information during extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractProgress {
    /// Number of photos processed so far
    pub completed: usize,
    /// Total number of photos to process
    pub total: usize,
    /// Photo just processed
    pub current_path: PathBuf,
}

/// Events during grouping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupEvent {
    /// Pairwise distance scan has started
    Started { total_photos: usize },
    /// Progress through the anchors of the distance scan
    Progress { anchors_processed: usize, total: usize },
    /// A group was emitted
    GroupFound { group_id: String, photo_count: usize },
    /// Grouping completed
    Completed {
        duplicate_groups: usize,
        similar_groups: usize,
        burst_groups: usize,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Extracting,
    Grouping,
    Reporting,
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub total_images: usize,
    pub duplicate_groups: usize,
    pub similar_groups: usize,
    pub burst_groups: usize,
    pub useless_photos: usize,
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Extracting => write!(f, "Extracting features"),
            PipelinePhase::Grouping => write!(f, "Grouping"),
            PipelinePhase::Reporting => write!(f, "Reporting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Extract(ExtractEvent::Progress(ExtractProgress {
            completed: 10,
            total: 50,
            current_path: PathBuf::from("/photos/a.jpg"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Extract(ExtractEvent::Progress(p)) => {
                assert_eq!(p.completed, 10);
                assert_eq!(p.total, 50);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn phase_display_is_readable() {
        assert_eq!(PipelinePhase::Extracting.to_string(), "Extracting features");
        assert_eq!(PipelinePhase::Grouping.to_string(), "Grouping");
    }
}
