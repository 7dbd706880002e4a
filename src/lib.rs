//! # Photo Sweeper
//!
//! Sorts a folder of photos into things a person can act on: duplicates,
//! near-identical shots, bursts, and individually useless frames (blurred,
//! flat, black, white, finger over the lens).
//!
//! ## Core Philosophy
//! - **Never auto-delete** - every photo gets a KEEP / DELETE / REVIEW call,
//!   the user decides
//! - **Show WHY** - every row carries a human-readable reason
//! - **Deterministic** - the same folder always produces the same report
//!
//! ## Architecture
//! - `core` - feature extraction, grouping, classification and report assembly
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SweepError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG` takes
/// precedence; otherwise logs at `info`, or `debug` when `verbose` is set.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
