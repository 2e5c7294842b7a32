//! Deterministic synthetic candles for development and demos.
//!
//! A seeded random walk laid on an exchange session calendar: weekdays
//! only, sessions 09:30-11:30 and 13:00-15:00. The same config always
//! yields the same candles.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use chanlab_core::Candle;

use crate::config::ConfigError;

/// Trading sessions as `[open, close)` minutes after midnight.
const SESSIONS: [(u32, u32); 2] = [(9 * 60 + 30, 11 * 60 + 30), (13 * 60, 15 * 60)];

/// Per-bar move as a fraction of the starting price.
const VOLATILITY: f64 = 0.0015;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub bars: usize,
    /// First calendar day; weekends are skipped.
    pub start: NaiveDate,
    pub start_price: f64,
    pub interval_minutes: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            bars: 480,
            start: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default(),
            start_price: 4000.0,
            interval_minutes: 15,
        }
    }
}

impl SyntheticConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bars == 0 {
            return Err(ConfigError::EmptySynthetic);
        }
        if self.interval_minutes == 0 || 120 % self.interval_minutes != 0 {
            return Err(ConfigError::InvalidInterval(self.interval_minutes));
        }
        if !self.start_price.is_finite() || self.start_price <= 0.0 {
            return Err(ConfigError::InvalidStartPrice(self.start_price));
        }
        Ok(())
    }
}

/// Bar open times from `start` onward, session by session.
pub fn session_timestamps(
    start: NaiveDate,
    interval_minutes: u32,
) -> impl Iterator<Item = NaiveDateTime> {
    let step = interval_minutes.max(1) as usize;
    start
        .iter_days()
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .flat_map(move |day| {
            SESSIONS.into_iter().flat_map(move |(open, close)| {
                (open..close)
                    .step_by(step)
                    .filter_map(move |m| day.and_hms_opt(m / 60, m % 60, 0))
            })
        })
}

/// Generate `config.bars` candles. Prices are rounded to cents and the
/// wicks always extend beyond open and close.
pub fn generate_candles(config: &SyntheticConfig) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let step = config.start_price * VOLATILITY * 4.0;
    let wick = config.start_price * VOLATILITY;
    let floor = config.start_price * 0.01;
    let mut price = config.start_price;

    session_timestamps(config.start, config.interval_minutes)
        .take(config.bars)
        .map(|timestamp| {
            let open = price;
            let close = (price + rng.gen_range(-step..step)).max(floor);
            let high = open.max(close) + rng.gen_range(0.0..wick);
            let low = (open.min(close) - rng.gen_range(0.0..wick)).max(floor * 0.5);
            let volume = rng.gen_range(10_000u64..400_000) as f64;
            price = close;

            Candle {
                timestamp,
                open: round_cents(open),
                high: round_cents(high),
                low: round_cents(low),
                close: round_cents(close),
                volume,
            }
        })
        .collect()
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
