//! # CLI Module
//!
//! Command-line interface for the photo sweeper.
//!
//! ## Usage
//! ```bash
//! # Sweep a directory, writing results.csv
//! photo-sweep scan ~/Photos
//!
//! # Stricter thresholds, JSON report
//! photo-sweep scan ~/Photos --preset conservative --format json -o report.json
//!
//! # Thresholds from a file, debug logging
//! photo-sweep scan ~/Photos --config thresholds.json --verbose
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_sweeper::core::config::{Preset, SweepConfig};
use photo_sweeper::core::pipeline::{Pipeline, PipelineResult};
use photo_sweeper::core::reporter::{export_to_file, format_bytes, ExportFormat, Recommendation};
use photo_sweeper::error::{ReportError, Result};
use photo_sweeper::events::{Event, EventChannel, ExtractEvent, PipelineEvent, ScanEvent};
use std::path::{Path, PathBuf};
use std::thread;

/// Photo Sweeper - find duplicates, bursts and throwaway shots
#[derive(Parser, Debug)]
#[command(name = "photo-sweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sweep a directory and write a report
    Scan {
        /// Directory to sweep
        path: PathBuf,

        /// Report file (default: results.csv, or results.json with --format json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, default_value = "csv")]
        format: ReportFormat,

        /// Threshold preset
        #[arg(short, long, default_value = "default")]
        preset: PresetArg,

        /// JSON thresholds file (overrides --preset)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Debug logging and per-file progress
        #[arg(short, long)]
        verbose: bool,

        /// Console summary style
        #[arg(long, default_value = "pretty")]
        summary: SummaryStyle,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// One line per photo
    Csv,
    /// Summary plus rows
    Json,
}

impl From<ReportFormat> for ExportFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Csv => ExportFormat::Csv,
            ReportFormat::Json => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    /// Balanced thresholds
    Default,
    /// Fewer false positives
    Conservative,
    /// Catches more, needs more review
    Aggressive,
}

impl From<PresetArg> for Preset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => Preset::Default,
            PresetArg::Conservative => Preset::Conservative,
            PresetArg::Aggressive => Preset::Aggressive,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SummaryStyle {
    /// Human-readable output with colors
    Pretty,
    /// JSON summary on stdout for scripting
    Json,
    /// No summary
    None,
}

struct ScanArgs {
    path: PathBuf,
    output: PathBuf,
    format: ExportFormat,
    config: SweepConfig,
    include_hidden: bool,
    verbose: bool,
    summary: SummaryStyle,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            output,
            format,
            preset,
            config,
            include_hidden,
            verbose,
            summary,
        } => {
            photo_sweeper::init_tracing(verbose);

            let config = match config {
                Some(file) => SweepConfig::from_json_file(&file)?,
                None => SweepConfig::from_preset(preset.into()),
            };
            let output = output.unwrap_or_else(|| match format {
                ReportFormat::Csv => PathBuf::from("results.csv"),
                ReportFormat::Json => PathBuf::from("results.json"),
            });

            run_scan(ScanArgs {
                path,
                output,
                format: format.into(),
                config,
                include_hidden,
                verbose,
                summary,
            })
        }
    }
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(args.summary, SummaryStyle::Pretty);

    // Print header
    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Photo Sweeper").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .root(args.path.clone())
        .config(args.config)
        .include_hidden(args.include_hidden)
        .build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if pretty {
        let pb = ProgressBar::new(0);
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(bar_style);
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = args.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_photos }) => {
                    pb.set_length(total_photos as u64);
                }
                Event::Extract(ExtractEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(
                            p.current_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let outcome = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = outcome?;
    export_to_file(&result.report, &args.output, args.format)?;

    match args.summary {
        SummaryStyle::Pretty => print_pretty_results(&term, &result, &args.output, args.verbose),
        SummaryStyle::Json => print_json_results(&result, &args.output)?,
        SummaryStyle::None => {}
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, output: &Path, verbose: bool) {
    let summary = &result.report.summary;

    term.write_line(&format!("{} Sweep Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} photos analyzed in {:.1}s",
        style(summary.total_images).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    for (count, label) in [
        (summary.duplicate_groups, "duplicate groups"),
        (summary.similar_groups, "similar groups"),
        (summary.burst_groups, "burst groups"),
        (summary.useless_photos, "useless photos"),
    ] {
        term.write_line(&format!("  {} {}", style(count).cyan(), label))
            .ok();
    }

    term.write_line(&format!(
        "  {} marked DELETE, {} marked REVIEW",
        style(result.report.rows_with(Recommendation::Delete).count()).cyan(),
        style(result.report.rows_with(Recommendation::Review).count()).cyan()
    ))
    .ok();

    term.write_line(&format!(
        "  {} potential space savings",
        style(format_bytes(summary.reclaimable_bytes)).yellow()
    ))
    .ok();

    if !result.errors.is_empty() {
        term.write_line(&format!(
            "  {} files could not be fully analyzed",
            style(result.errors.len()).red()
        ))
        .ok();
        if verbose {
            for error in &result.errors {
                term.write_line(&format!("    {} {}", style("!").red(), style(error).dim()))
                    .ok();
            }
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  Report written to {}",
        style(output.display()).bold()
    ))
    .ok();
    term.write_line("").ok();

    // Footer
    term.write_line(&format!(
        "{}",
        style("Remember: No files were deleted. Review carefully before taking action.").dim()
    ))
    .ok();
}

fn print_json_results(result: &PipelineResult, output: &Path) -> Result<()> {
    let summary = &result.report.summary;
    let value = serde_json::json!({
        "total_images": summary.total_images,
        "duplicate_groups": summary.duplicate_groups,
        "similar_groups": summary.similar_groups,
        "burst_groups": summary.burst_groups,
        "useless_photos": summary.useless_photos,
        "reclaimable_bytes": summary.reclaimable_bytes,
        "errors": result.errors,
        "duration_ms": result.duration_ms,
        "report": output.to_string_lossy(),
    });

    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| ReportError::Serialize(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
