//! Candle loading and sanitization for the runner.
//!
//! The pipeline assumes clean input, so everything a raw CSV can get wrong
//! is dealt with here before a run:
//! 1. Parse `datetime, open, high, low, close, volume` rows
//! 2. Drop rows with non-finite or non-positive prices, inverted high/low,
//!    or negative volume (counted per reason)
//! 3. Stable-sort by timestamp; rows sharing a timestamp keep file order
//! 4. Fingerprint the result with a BLAKE3 dataset hash

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chanlab_core::Candle;

use crate::synthetic::{generate_candles, SyntheticConfig};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed CSV record {row}: {source}")]
    Record {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("record {row}: unrecognised datetime '{value}'")]
    Timestamp { row: usize, value: String },
}

/// Where the candles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    CsvImport,
    Synthetic,
}

/// Rows removed by sanitization, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRows {
    pub non_finite: usize,
    pub non_positive: usize,
    pub inverted: usize,
    pub negative_volume: usize,
}

impl DroppedRows {
    pub fn total(&self) -> usize {
        self.non_finite
            + self.non_positive
            + self.inverted
            + self.negative_volume
    }
}

/// Sanitized candles ready for the pipeline, with provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub candles: Vec<Candle>,
    pub dropped: DroppedRows,
    pub source: DataSource,
    /// BLAKE3 over all candle fields, for fingerprinting reports.
    pub dataset_hash: String,
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    datetime: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a timestamp in any of the accepted layouts. A bare date is taken
/// as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Read candles from any CSV source, unsanitized and in file order.
pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candles = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRecord>().enumerate() {
        let row = i + 1;
        let record = record.map_err(|source| LoadError::Record { row, source })?;
        let timestamp = parse_timestamp(&record.datetime).ok_or_else(|| LoadError::Timestamp {
            row,
            value: record.datetime.clone(),
        })?;
        candles.push(Candle {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        });
    }
    Ok(candles)
}

/// Drop unusable rows and order by timestamp. Equal timestamps are valid
/// input and keep their file order.
pub fn sanitize(candles: Vec<Candle>) -> (Vec<Candle>, DroppedRows) {
    let mut dropped = DroppedRows::default();
    let mut kept: Vec<Candle> = candles
        .into_iter()
        .filter(|c| {
            if c.is_void() {
                dropped.non_finite += 1;
                false
            } else if c.open <= 0.0 || c.high <= 0.0 || c.low <= 0.0 || c.close <= 0.0 {
                dropped.non_positive += 1;
                false
            } else if c.high < c.low {
                dropped.inverted += 1;
                false
            } else if c.volume < 0.0 {
                dropped.negative_volume += 1;
                false
            } else {
                true
            }
        })
        .collect();

    kept.sort_by_key(|c| c.timestamp);

    (kept, dropped)
}

/// Load and sanitize a CSV file.
pub fn load_csv(path: &Path) -> Result<LoadedData, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Open {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    let raw = read_candles(file)?;
    let read = raw.len();
    let (candles, dropped) = sanitize(raw);

    if dropped.total() > 0 {
        warn!(
            "{}: dropped {} of {} rows ({:?})",
            path.display(),
            dropped.total(),
            read,
            dropped
        );
    }
    info!("{}: loaded {} candles", path.display(), candles.len());

    Ok(LoadedData {
        dataset_hash: compute_dataset_hash(&candles),
        candles,
        dropped,
        source: DataSource::CsvImport,
    })
}

/// Generate synthetic candles; they are clean by construction.
pub fn load_synthetic(config: &SyntheticConfig) -> LoadedData {
    let candles = generate_candles(config);
    LoadedData {
        dataset_hash: compute_dataset_hash(&candles),
        candles,
        dropped: DroppedRows::default(),
        source: DataSource::Synthetic,
    }
}

/// Compute a deterministic BLAKE3 hash over all candle data.
pub fn compute_dataset_hash(candles: &[Candle]) -> String {
    let mut hasher = blake3::Hasher::new();
    for candle in candles {
        hasher.update(candle.timestamp.to_string().as_bytes());
        hasher.update(&candle.open.to_le_bytes());
        hasher.update(&candle.high.to_le_bytes());
        hasher.update(&candle.low.to_le_bytes());
        hasher.update(&candle.close.to_le_bytes());
        hasher.update(&candle.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
