//! # Burst Module
//!
//! Groups photos taken in rapid succession, judged by modification time.
//!
//! Photos are sorted by time (stable, so ties keep their input order) and a
//! run is extended while the gap to the previous photo is within the window.
//! Runs of two or more photos become `BURST-n` groups; the earliest photo is
//! the anchor.

use crate::core::config::SweepConfig;
use crate::core::group::{GroupKind, PhotoGroup};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub struct BurstGrouper {
    window_secs: f64,
}

impl BurstGrouper {
    pub fn new(config: &SweepConfig) -> Self {
        Self::with_window(config.burst_time_window_secs)
    }

    /// Grouper with an explicit window in seconds
    pub fn with_window(window_secs: f64) -> Self {
        Self { window_secs }
    }

    pub fn group(&self, timestamps: &[(PathBuf, DateTime<Utc>)]) -> Vec<PhotoGroup> {
        let mut sorted: Vec<&(PathBuf, DateTime<Utc>)> = timestamps.iter().collect();
        sorted.sort_by_key(|(_, time)| *time);

        let mut bursts = Vec::new();
        let mut run: Vec<PathBuf> = Vec::new();
        let mut previous: Option<DateTime<Utc>> = None;

        for (path, time) in sorted {
            if let Some(prev) = previous {
                if seconds_between(prev, *time) > self.window_secs {
                    self.close_run(&mut run, &mut bursts);
                }
            }
            run.push(path.clone());
            previous = Some(*time);
        }
        self.close_run(&mut run, &mut bursts);

        tracing::debug!(
            photos = timestamps.len(),
            bursts = bursts.len(),
            window_secs = self.window_secs,
            "burst grouping"
        );
        bursts
    }

    fn close_run(&self, run: &mut Vec<PathBuf>, bursts: &mut Vec<PhotoGroup>) {
        let members = std::mem::take(run);
        if members.len() >= 2 {
            bursts.push(PhotoGroup::new(GroupKind::Burst, bursts.len() + 1, members));
        }
    }
}

fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}
