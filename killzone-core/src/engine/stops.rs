//! Structural stop placement.

use super::round2;
use crate::domain::Direction;

/// Stop behind the recent extreme with a 2-point buffer, never closer to the
/// tested level than `stop_min`. A missing extreme falls back to the level
/// itself offset by `stop_min`.
pub fn structural_stop(
    direction: Direction,
    tested_level: f64,
    recent_low: Option<f64>,
    recent_high: Option<f64>,
    stop_min: f64,
) -> f64 {
    let stop = match direction {
        Direction::Buy => {
            let low = recent_low.unwrap_or(tested_level - stop_min);
            (low - 2.0).min(tested_level - stop_min)
        }
        Direction::Sell => {
            let high = recent_high.unwrap_or(tested_level + stop_min);
            (high + 2.0).max(tested_level + stop_min)
        }
    };
    round2(stop)
}

/// Risk in price units between entry and stop.
pub fn risk_points(entry: f64, stop: f64) -> f64 {
    (entry - stop).abs()
}
