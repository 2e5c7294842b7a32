//! ChanLab CLI: structure analysis from the command line.
//!
//! Commands:
//! - `analyze`: merge, detect fractals and build strokes for one or more CSV files
//! - `synthetic`: write a seeded synthetic candle CSV
//! - `run`: execute an analysis from a TOML config file

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};

use chanlab_core::EngineConfig;
use chanlab_runner::{
    export_candles_csv, generate_candles, run_batch, run_from_config, save_artifacts,
    AnalysisReport, ExportFormat, RunConfig, SyntheticConfig,
};

/// Strokes printed per report before truncating.
const PREVIEW_STROKES: usize = 10;

#[derive(Parser)]
#[command(
    name = "chanlab",
    about = "ChanLab CLI: inclusion merge, fractals and strokes over OHLC candles"
)]
struct Cli {
    /// Log debug output.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more candle CSV files.
    Analyze {
        /// CSV files with datetime,open,high,low,close,volume columns.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Minimum index distance between stroke endpoints.
        #[arg(long, default_value_t = EngineConfig::default().min_stroke_span)]
        min_span: usize,

        /// Write artifacts here. Without it, results are only printed.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Artifact formats to write.
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,

        /// Re-verify every structural invariant and fail on a violation.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
    /// Write a synthetic candle CSV.
    Synthetic {
        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of candles.
        #[arg(long, default_value_t = 480)]
        bars: usize,

        /// Bar interval in minutes. Must divide 120.
        #[arg(long, default_value_t = 15)]
        interval: u32,

        /// First session date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,
    },
    /// Execute an analysis from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Re-verify every structural invariant and fail on a violation.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
    Markdown,
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Json => vec![ExportFormat::Json],
            FormatArg::Csv => vec![ExportFormat::Csv],
            FormatArg::Markdown => vec![ExportFormat::Markdown],
            FormatArg::All => vec![ExportFormat::Json, ExportFormat::Csv, ExportFormat::Markdown],
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            files,
            min_span,
            output_dir,
            format,
            check,
        } => run_analyze(&files, min_span, output_dir.as_deref(), format, check),
        Commands::Synthetic {
            seed,
            bars,
            interval,
            start,
            output,
        } => run_synthetic(seed, bars, interval, start.as_deref(), &output),
        Commands::Run { config, check } => run_config_cmd(&config, check),
    }
}

fn init_logging(verbose: bool) {
    let own_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .filter(Some("chanlab_core"), own_level)
        .filter(Some("chanlab_runner"), own_level)
        .filter(Some("chanlab"), own_level)
        .parse_default_env()
        .init();
}

fn run_analyze(
    files: &[PathBuf],
    min_span: usize,
    output_dir: Option<&Path>,
    format: FormatArg,
    check: bool,
) -> Result<()> {
    let config = EngineConfig::with_min_stroke_span(min_span);
    config.validate()?;

    let mut failures = 0;
    for (path, result) in files.iter().zip(run_batch(files, &config)) {
        match result {
            Ok(report) => {
                print_summary(&report);
                if check {
                    report
                        .verify()
                        .with_context(|| format!("{}: invariant check failed", path.display()))?;
                    println!("Invariants:     ok");
                }
                if let Some(dir) = output_dir {
                    let run_dir = save_artifacts(&report, dir, &format.formats())?;
                    println!("Artifacts saved to: {}", run_dir.display());
                }
            }
            Err(e) => {
                error!("{}: {e}", path.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} file(s) failed", files.len());
    }
    Ok(())
}

fn run_synthetic(
    seed: u64,
    bars: usize,
    interval: u32,
    start: Option<&str>,
    output: &Path,
) -> Result<()> {
    let mut config = SyntheticConfig {
        seed,
        bars,
        interval_minutes: interval,
        ..SyntheticConfig::default()
    };
    if let Some(start) = start {
        config.start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .with_context(|| format!("invalid --start date '{start}'"))?;
    }
    config.validate()?;

    let candles = generate_candles(&config);
    std::fs::write(output, export_candles_csv(&candles)?)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {} candles to {}", candles.len(), output.display());
    Ok(())
}

fn run_config_cmd(path: &Path, check: bool) -> Result<()> {
    let config = RunConfig::from_file(path)?;
    let report = run_from_config(&config)?;
    print_summary(&report);

    if check {
        report.verify()?;
        println!("Invariants:     ok");
    }
    if let Some(dir) = &config.output.dir {
        let run_dir = save_artifacts(&report, dir, &config.output.formats)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let a = &report.analysis;
    println!();
    println!("=== {} ===", report.label);
    println!("Outcome:        {}", report.outcome);
    println!(
        "Raw candles:    {} ({} dropped)",
        a.raw_count,
        report.dropped.total()
    );
    println!("Standard:       {}", a.standard.len());
    println!("Fractals:       {}", a.fractals.len());
    println!("Strokes:        {}", a.strokes.len());

    if a.strokes.is_empty() {
        return;
    }
    println!();
    println!("--- Strokes ---");
    for s in a.strokes.iter().take(PREVIEW_STROKES) {
        println!(
            "{:<4} {} {:>10.2} -> {} {:>10.2}  (span {})",
            s.direction.to_string(),
            s.start.timestamp.format("%Y-%m-%d %H:%M"),
            s.start_price(),
            s.end.timestamp.format("%Y-%m-%d %H:%M"),
            s.end_price(),
            s.span()
        );
    }
    if a.strokes.len() > PREVIEW_STROKES {
        println!("... {} more", a.strokes.len() - PREVIEW_STROKES);
    }
}
