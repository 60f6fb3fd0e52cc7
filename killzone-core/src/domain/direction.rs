//! Closed direction tags. String labels exist only at the serde boundary.

use serde::{Deserialize, Serialize};

/// Trade direction of an issued signal or journaled trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "BUY", alias = "LONG")]
    Buy,
    #[serde(rename = "SELL", alias = "SHORT")]
    Sell,
}

impl Direction {
    /// +1 for buy, -1 for sell. Used as a numeric feature.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Buy => 1.0,
            Direction::Sell => -1.0,
        }
    }
}

/// Expected directional behavior of a trading window, or a caller override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionBias {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "BOTH")]
    Both,
}

impl DirectionBias {
    /// Candidate directions in scan order. `Both` expands to buy-then-sell;
    /// the engine's first-match policy depends on this order.
    pub fn candidates(self) -> &'static [Direction] {
        match self {
            DirectionBias::Buy => &[Direction::Buy],
            DirectionBias::Sell => &[Direction::Sell],
            DirectionBias::Both => &[Direction::Buy, Direction::Sell],
        }
    }
}

/// Direction of a heuristic entry plan. Unlike [`Direction`], a plan may
/// decline to pick a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanDirection {
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
    #[serde(rename = "NEUTRAL")]
    Neutral,
}
