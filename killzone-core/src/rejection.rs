//! Wick-based rejection detection against a single level.

use crate::config::RejectionParams;
use crate::domain::{Candle, Direction};

/// Outcome of testing one candle against one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rejection {
    pub rejected: bool,
    /// Wick length relative to the minimum, capped at 3.0. Zero when not rejected.
    pub strength: f64,
}

impl Rejection {
    const NONE: Rejection = Rejection {
        rejected: false,
        strength: 0.0,
    };
}

/// Stateless detector; thresholds fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct RejectionDetector {
    min_wick: f64,
    touch_tolerance: f64,
}

impl RejectionDetector {
    pub fn new(min_wick: f64, touch_tolerance: f64) -> Self {
        Self {
            min_wick,
            touch_tolerance,
        }
    }

    pub fn from_params(params: &RejectionParams) -> Self {
        Self::new(params.min_wick, params.touch_tolerance)
    }

    /// Test `candle` for a rejection of `level` in the expected direction.
    ///
    /// Buy: the low must touch within tolerance above the level and the lower
    /// wick must reach the minimum size. Sell is the mirror on the upper wick.
    pub fn detect(&self, candle: &Candle, level: f64, direction: Direction) -> Rejection {
        match direction {
            Direction::Buy => {
                let touched = candle.low <= level + self.touch_tolerance;
                let wick = candle.lower_wick();
                if touched && wick >= self.min_wick {
                    return Rejection {
                        rejected: true,
                        strength: (wick / self.min_wick).min(3.0),
                    };
                }
            }
            Direction::Sell => {
                let touched = candle.high >= level - self.touch_tolerance;
                let wick = candle.upper_wick();
                if touched && wick >= self.min_wick {
                    return Rejection {
                        rejected: true,
                        strength: (wick / self.min_wick).min(3.0),
                    };
                }
            }
        }
        Rejection::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            time: Utc.with_ymd_and_hms(2024, 1, 2, 23, 30, 0).unwrap(),
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn buy_rejection_worked_example() {
        // Lower wick = min(100, 101) - 95 = 5; touch: 95 <= 96 + 0.5.
        let detector = RejectionDetector::new(2.0, 0.5);
        let r = detector.detect(&candle(100.0, 103.0, 95.0, 101.0), 96.0, Direction::Buy);
        assert!(r.rejected);
        assert_eq!(r.strength, 2.5); // min(5/2, 3.0)
    }

    #[test]
    fn strength_caps_at_three() {
        let detector = RejectionDetector::new(2.0, 0.5);
        let r = detector.detect(&candle(100.0, 101.0, 85.0, 100.5), 86.0, Direction::Buy);
        assert!(r.rejected);
        assert_eq!(r.strength, 3.0);
    }

    #[test]
    fn sell_rejection_mirrors_buy() {
        // Upper wick = 104 - max(100, 99) = 4; touch: 104 >= 103.5 - 0.5.
        let detector = RejectionDetector::new(2.0, 0.5);
        let r = detector.detect(&candle(100.0, 104.0, 98.5, 99.0), 103.5, Direction::Sell);
        assert!(r.rejected);
        assert_eq!(r.strength, 2.0);
    }

    #[test]
    fn no_touch_means_no_rejection() {
        let detector = RejectionDetector::new(2.0, 0.5);
        // Low 98 stays above level 96 + 0.5.
        let r = detector.detect(&candle(100.0, 103.0, 98.0, 101.0), 96.0, Direction::Buy);
        assert!(!r.rejected);
        assert_eq!(r.strength, 0.0);
    }

    #[test]
    fn short_wick_means_no_rejection() {
        let detector = RejectionDetector::new(2.0, 0.5);
        // Lower wick = 1 < 2, even though the level was touched.
        let r = detector.detect(&candle(100.0, 103.0, 99.0, 101.0), 99.0, Direction::Buy);
        assert!(!r.rejected);
    }
}
