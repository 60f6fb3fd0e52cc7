//! TradeSample — one journaled trade, read-only to the core.

use super::direction::Direction;
use super::level::LevelKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A persisted journal row. The journal collaborator supplies these already
/// parsed; the core derives feature vectors from them and writes nothing back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSample {
    pub trade_id: String,
    pub symbol: String,
    pub timeframe_min: u32,
    /// Wall-clock time of the trade in the journal's local timezone.
    pub executed_at_local: NaiveDateTime,
    pub direction: Direction,

    // Optional psychological-level annotations.
    #[serde(default)]
    pub psych_step: Option<f64>,
    #[serde(default)]
    pub psych_level: Option<f64>,
    #[serde(default)]
    pub level_kind: Option<LevelKind>,
    #[serde(default)]
    pub touched_level: Option<bool>,
    #[serde(default)]
    pub rejection: Option<bool>,
    #[serde(default)]
    pub confirmation: Option<bool>,

    pub entry: f64,
    pub sl: f64,
    pub tp: f64,

    /// Realized ATR(14) at trade time, when recorded.
    #[serde(default)]
    pub atr14: Option<f64>,
    /// Realized result in risk units (R multiples), once the trade closed.
    #[serde(default)]
    pub result_r: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TradeSample {
    /// |entry - sl| in price units.
    pub fn risk(&self) -> f64 {
        (self.entry - self.sl).abs()
    }

    /// |tp - entry| in price units.
    pub fn reward(&self) -> f64 {
        (self.tp - self.entry).abs()
    }

    /// Reward:risk ratio; 0 when the risk distance is zero.
    pub fn rr(&self) -> f64 {
        let risk = self.risk();
        if risk > 0.0 {
            self.reward() / risk
        } else {
            0.0
        }
    }

    /// Required price fields must be positive for feature extraction.
    pub fn has_valid_prices(&self) -> bool {
        self.entry > 0.0 && self.sl > 0.0 && self.tp > 0.0
    }
}
