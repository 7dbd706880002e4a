//! Export functionality for sweep reports.
//!
//! Supports CSV (one line per row) and JSON (summary plus rows).

use super::SweepReport;
use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// CSV header, in column order
pub const CSV_HEADER: &str = "ID,Path,Group,Type,Reason,SizeBytes,Recommendation";

/// Export the report to CSV format
///
/// Fields containing commas, quotes or line breaks are quoted, with inner
/// quotes doubled.
pub fn export_csv<W: Write>(report: &SweepReport, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;

    for row in &report.rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            row.id,
            csv_field(&row.path.display().to_string()),
            csv_field(row.group.as_deref().unwrap_or("")),
            csv_field(&row.row_type.to_string()),
            csv_field(&row.reason),
            row.size_bytes,
            row.recommendation
        )?;
    }

    writer.flush()
}

/// JSON document for a report: `{ "summary": {...}, "rows": [...] }`
///
/// Paths are written lossily; non-UTF-8 bytes become U+FFFD.
pub fn report_json(report: &SweepReport) -> serde_json::Value {
    let summary = &report.summary;
    serde_json::json!({
        "summary": {
            "total_images": summary.total_images,
            "duplicate_groups": summary.duplicate_groups,
            "similar_groups": summary.similar_groups,
            "burst_groups": summary.burst_groups,
            "useless_photos": summary.useless_photos,
            "reclaimable_bytes": summary.reclaimable_bytes,
        },
        "rows": report.rows.iter().map(|row| {
            serde_json::json!({
                "id": row.id,
                "path": row.path.to_string_lossy(),
                "group": row.group,
                "type": row.row_type.to_string(),
                "reason": row.reason,
                "size_bytes": row.size_bytes,
                "recommendation": row.recommendation.to_string(),
                "confidence": row.confidence,
            })
        }).collect::<Vec<_>>()
    })
}

/// Export the report as pretty-printed JSON
pub fn export_json<W: Write>(report: &SweepReport, mut writer: W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, &report_json(report))?;
    writeln!(writer)?;
    writer.flush()
}

/// Export the report to a file
pub fn export_to_file(
    report: &SweepReport,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ReportError> {
    let io_error = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(io_error)?;
    let writer = std::io::BufWriter::new(file);

    match format {
        ExportFormat::Csv => export_csv(report, writer),
        ExportFormat::Json => export_json(report, writer),
    }
    .map_err(io_error)?;

    tracing::info!(path = %path.display(), rows = report.rows.len(), "report written");
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
