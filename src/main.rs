//! # photo-sweep CLI
//!
//! Command-line interface for the photo sweeper.
//!
//! ## Usage
//! ```bash
//! photo-sweep scan ~/Photos
//! photo-sweep scan ~/Photos --output report.json --format json --preset aggressive
//! ```

mod cli;

use photo_sweeper::Result;

fn main() -> Result<()> {
    cli::run()
}
