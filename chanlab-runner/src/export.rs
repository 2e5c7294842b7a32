//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for analysis reports:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: one file per derived sequence (standard candles, fractals, strokes)
//! - **Markdown**: human-readable run summary with a stroke table
//!
//! Persisted reports include a `schema_version` field. Newer versions are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use chanlab_core::{Candle, Fractal, StandardCandle, Stroke};

use crate::runner::{AnalysisReport, SCHEMA_VERSION};

/// Artifact formats selectable from config or CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisReport` to pretty JSON.
pub fn export_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize AnalysisReport to JSON")
}

/// Deserialize an `AnalysisReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export raw candles in the same layout the loader reads.
pub fn export_candles_csv(candles: &[Candle]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["datetime", "open", "high", "low", "close", "volume"])?;
    for c in candles {
        wtr.write_record([
            &c.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.2}", c.open),
            &format!("{:.2}", c.high),
            &format!("{:.2}", c.low),
            &format!("{:.2}", c.close),
            &format!("{:.0}", c.volume),
        ])?;
    }
    finish(wtr)
}

/// Export standard candles with their raw-index provenance.
///
/// Columns: index, datetime, open, high, low, close, volume, first_raw,
/// last_raw, raw_count, center
pub fn export_standard_csv(standard: &[StandardCandle]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "index",
        "datetime",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "first_raw",
        "last_raw",
        "raw_count",
        "center",
    ])?;
    for (i, c) in standard.iter().enumerate() {
        wtr.write_record([
            &i.to_string(),
            &c.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.6}", c.open),
            &format!("{:.6}", c.high),
            &format!("{:.6}", c.low),
            &format!("{:.6}", c.close),
            &format!("{:.2}", c.volume),
            &c.first.to_string(),
            &c.last.to_string(),
            &c.raw_count().to_string(),
            &format!("{:.1}", c.center()),
        ])?;
    }
    finish(wtr)
}

/// Export fractals. Columns: kind, apex_index, datetime, high, low
pub fn export_fractals_csv(fractals: &[Fractal]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["kind", "apex_index", "datetime", "high", "low"])?;
    for f in fractals {
        wtr.write_record([
            &f.kind.to_string(),
            &f.index.to_string(),
            &f.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.6}", f.high),
            &format!("{:.6}", f.low),
        ])?;
    }
    finish(wtr)
}

/// Export strokes with the line endpoints a chart would draw.
///
/// Columns: direction, start_index, start_datetime, start_price, end_index,
/// end_datetime, end_price, high, low, span
pub fn export_strokes_csv(strokes: &[Stroke]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "direction",
        "start_index",
        "start_datetime",
        "start_price",
        "end_index",
        "end_datetime",
        "end_price",
        "high",
        "low",
        "span",
    ])?;
    for s in strokes {
        wtr.write_record([
            &s.direction.to_string(),
            &s.start.index.to_string(),
            &s.start.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.6}", s.start_price()),
            &s.end.index.to_string(),
            &s.end.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.6}", s.end_price()),
            &format!("{:.6}", s.high),
            &format!("{:.6}", s.low),
            &s.span().to_string(),
        ])?;
    }
    finish(wtr)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report for a single run.
pub fn generate_report(report: &AnalysisReport) -> String {
    let a = &report.analysis;
    let mut md = String::with_capacity(2048);

    md.push_str("# Structure Report\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Label | {} |\n", report.label));
    md.push_str(&format!("| Source | {:?} |\n", report.source));
    md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
    md.push_str(&format!(
        "| Min Stroke Span | {} |\n",
        report.engine.min_stroke_span
    ));
    md.push_str(&format!("| Dropped Rows | {} |\n", report.dropped.total()));
    md.push_str(&format!("| Outcome | {} |\n", report.outcome));
    md.push('\n');

    md.push_str("## Counts\n\n");
    md.push_str("| Sequence | Count |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Raw candles | {} |\n", a.raw_count));
    md.push_str(&format!("| Standard candles | {} |\n", a.standard.len()));
    md.push_str(&format!("| Fractals | {} |\n", a.fractals.len()));
    md.push_str(&format!("| Strokes | {} |\n", a.strokes.len()));
    md.push('\n');

    if !a.strokes.is_empty() {
        md.push_str("## Strokes\n\n");
        md.push_str("| # | Direction | From | To | Start | End | Span |\n");
        md.push_str("| --- | --- | --- | --- | --- | --- | --- |\n");
        for (i, s) in a.strokes.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} | {:.2} | {} |\n",
                i,
                s.direction,
                s.start.timestamp.format(TIMESTAMP_FORMAT),
                s.end.timestamp.format(TIMESTAMP_FORMAT),
                s.start_price(),
                s.end_price(),
                s.span()
            ));
        }
        md.push('\n');
    }

    md
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the selected artifacts for a single run.
///
/// Creates a directory named `{label}_{timestamp}/` under `output_dir`
/// containing, per format:
/// - `report.json`: the full `AnalysisReport`
/// - `standard.csv`, `fractals.csv`, `strokes.csv`
/// - `report.md`
///
/// Returns the path to the created directory.
pub fn save_artifacts(
    report: &AnalysisReport,
    output_dir: &Path,
    formats: &[ExportFormat],
) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        report.label,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    for format in formats {
        match format {
            ExportFormat::Json => {
                std::fs::write(run_dir.join("report.json"), export_json(report)?)?;
            }
            ExportFormat::Csv => {
                let a = &report.analysis;
                std::fs::write(run_dir.join("standard.csv"), export_standard_csv(&a.standard)?)?;
                std::fs::write(run_dir.join("fractals.csv"), export_fractals_csv(&a.fractals)?)?;
                std::fs::write(run_dir.join("strokes.csv"), export_strokes_csv(&a.strokes)?)?;
            }
            ExportFormat::Markdown => {
                std::fs::write(run_dir.join("report.md"), generate_report(report))?;
            }
        }
    }

    Ok(run_dir)
}

/// Load an `AnalysisReport` from an artifact directory's report.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<AnalysisReport> {
    let report_path = dir.join("report.json");
    let json = std::fs::read_to_string(&report_path)
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    import_json(&json)
}
