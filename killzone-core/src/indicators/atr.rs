//! Average True Range (ATR) keyed by calendar date.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! Day 0 has no previous close, so its TR is just high-low.
//! ATR uses Wilder smoothing seeded with the arithmetic mean of the first
//! `period` true ranges.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Wilder period matching the snapshot schema's `atr14` column.
pub const ATR_PERIOD: usize = 14;

/// One day of aggregated OHLC, in ascending chronological order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayOhlc {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Compute the True Range series.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(days: &[DayOhlc]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(days.len());
    let mut prev_close: Option<f64> = None;
    for day in days {
        let range = day.high - day.low;
        tr.push(match prev_close {
            Some(pc) => range.max((day.high - pc).abs()).max((day.low - pc).abs()),
            None => range,
        });
        prev_close = Some(day.close);
    }
    tr
}

/// ATR(14) per date, present only once `ATR_PERIOD` days of true-range
/// history exist. Fewer days yields an empty map — a normal outcome, not
/// an error.
pub fn atr14_by_date(days: &[DayOhlc]) -> BTreeMap<NaiveDate, f64> {
    wilder_atr_by_date(days, ATR_PERIOD)
}

fn wilder_atr_by_date(days: &[DayOhlc], period: usize) -> BTreeMap<NaiveDate, f64> {
    let mut out = BTreeMap::new();
    if period == 0 || days.len() < period {
        return out;
    }

    let tr = true_range(days);

    // Seed at index period-1 with the mean of the first `period` true ranges.
    let seed: f64 = tr[..period].iter().sum::<f64>() / period as f64;
    out.insert(days[period - 1].date, seed);

    let mut prev = seed;
    for i in period..tr.len() {
        let atr = (prev * (period as f64 - 1.0) + tr[i]) / period as f64;
        out.insert(days[i].date, atr);
        prev = atr;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn make_days(data: &[(f64, f64, f64)]) -> Vec<DayOhlc> {
        let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| DayOhlc {
                date: base_date + chrono::Duration::days(i as i64),
                high,
                low,
                close,
            })
            .collect()
    }

    #[test]
    fn true_range_basic() {
        let days = make_days(&[
            (105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&days);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 115-108.
        let days = make_days(&[(102.0, 97.0, 100.0), (115.0, 108.0, 112.0)]);
        let tr = true_range(&days);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn under_fourteen_days_is_empty() {
        let days = make_days(&vec![(105.0, 95.0, 100.0); 13]);
        assert!(atr14_by_date(&days).is_empty());
    }

    #[test]
    fn seed_and_smoothing() {
        // 13 days of TR=10 (high-low, flat closes keep TR at high-low),
        // then wider days.
        let mut data = vec![(105.0, 95.0, 100.0); 14]; // every TR = 10
        data.push((110.0, 96.0, 100.0)); // TR = max(14, 10, 4) = 14
        let days = make_days(&data);
        let atr = atr14_by_date(&days);

        // Seed at index 13 = mean of fourteen 10s.
        assert_approx(atr[&days[13].date], 10.0, DEFAULT_EPSILON);
        // Wilder: (10*13 + 14) / 14
        assert_approx(atr[&days[14].date], 144.0 / 14.0, DEFAULT_EPSILON);
        // No entries before the seed index.
        assert!(!atr.contains_key(&days[12].date));
    }

    #[test]
    fn constant_series_atr_is_zero() {
        // high == low == close for 20 days -> every TR is 0, so ATR is 0
        // from the seed onward.
        let days = make_days(&vec![(100.0, 100.0, 100.0); 20]);
        let atr = atr14_by_date(&days);
        assert_eq!(atr.len(), 7); // indices 13..=19
        for value in atr.values() {
            assert_approx(*value, 0.0, DEFAULT_EPSILON);
        }
    }
}
