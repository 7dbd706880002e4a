//! # Pipeline Module
//!
//! Orchestrates a full sweep.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover all photos under the root directory
//! 2. **Extract** - Compute the feature record of every photo
//! 3. **Group** - Classify useless photos, group by hash distance and by time
//! 4. **Report** - Assemble one row per photo with a recommendation
//!
//! ## Parallelism
//! Uses rayon for parallel feature extraction across multiple CPU cores.
//! Everything after extraction is single-threaded and deterministic.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
