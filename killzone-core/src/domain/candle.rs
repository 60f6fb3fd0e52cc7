//! Candle — a single OHLC bar, produced externally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC candle for one interval. Immutable once supplied by the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A candle the engine refuses to reason about. Rejected at the boundary;
/// the single computation fails, never the batch.
#[derive(Debug, thiserror::Error)]
pub enum CandleError {
    #[error("candle at {time} has a non-finite price")]
    NonFinite { time: DateTime<Utc> },

    #[error("candle at {time} has a non-positive price")]
    NonPositive { time: DateTime<Utc> },

    #[error("candle at {time} has high {high} below low {low}")]
    HighBelowLow {
        time: DateTime<Utc>,
        high: f64,
        low: f64,
    },
}

impl Candle {
    /// Length of the wick above the candle body.
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Length of the wick below the candle body.
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// OHLC sanity: finite positive prices, high >= body top, low <= body bottom.
    pub fn is_sane(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), CandleError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(CandleError::NonFinite { time: self.time });
        }
        if prices.iter().any(|p| *p <= 0.0) {
            return Err(CandleError::NonPositive { time: self.time });
        }
        if self.high < self.low
            || self.high < self.open.max(self.close)
            || self.low > self.open.min(self.close)
        {
            return Err(CandleError::HighBelowLow {
                time: self.time,
                high: self.high,
                low: self.low,
            });
        }
        Ok(())
    }
}
