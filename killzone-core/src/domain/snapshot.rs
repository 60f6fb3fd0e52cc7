//! DailySnapshot — one row of day-opening history, keyed by trade date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opening price plus optional post-open aggregates for one calendar day.
///
/// Upserted by external ingestion; the core only reads. The H1/H3 triples
/// are the high/low/close of the first one and three hours after the anchor
/// open, present only when the source history covered the full window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub trade_date: NaiveDate,
    #[serde(default)]
    pub open_ts_utc: Option<DateTime<Utc>>,
    pub open: f64,
    #[serde(default)]
    pub h1_high: Option<f64>,
    #[serde(default)]
    pub h1_low: Option<f64>,
    #[serde(default)]
    pub h1_close: Option<f64>,
    #[serde(default)]
    pub h3_high: Option<f64>,
    #[serde(default)]
    pub h3_low: Option<f64>,
    #[serde(default)]
    pub h3_close: Option<f64>,
    #[serde(default)]
    pub atr14: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
}

impl DailySnapshot {
    /// The (high, low, close) of the first post-open hour, if all three exist.
    pub fn h1(&self) -> Option<(f64, f64, f64)> {
        match (self.h1_high, self.h1_low, self.h1_close) {
            (Some(h), Some(l), Some(c)) => Some((h, l, c)),
            _ => None,
        }
    }

    /// ATR(14) for this day when present and positive.
    pub fn positive_atr(&self) -> Option<f64> {
        self.atr14.filter(|a| *a > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> DailySnapshot {
        DailySnapshot {
            trade_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open_ts_utc: None,
            open: 2045.0,
            h1_high: Some(2052.0),
            h1_low: Some(2041.0),
            h1_close: Some(2050.0),
            h3_high: None,
            h3_low: None,
            h3_close: None,
            atr14: Some(18.5),
            source: Some("csv".into()),
        }
    }

    #[test]
    fn h1_requires_all_three() {
        let mut s = sample_snapshot();
        assert_eq!(s.h1(), Some((2052.0, 2041.0, 2050.0)));
        s.h1_low = None;
        assert_eq!(s.h1(), None);
    }

    #[test]
    fn positive_atr_filters_zero() {
        let mut s = sample_snapshot();
        assert_eq!(s.positive_atr(), Some(18.5));
        s.atr14 = Some(0.0);
        assert_eq!(s.positive_atr(), None);
        s.atr14 = None;
        assert_eq!(s.positive_atr(), None);
    }

    #[test]
    fn snapshot_deserializes_with_missing_optionals() {
        let json = r#"{"trade_date":"2024-01-02","open":2045.0}"#;
        let s: DailySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(s.open, 2045.0);
        assert!(s.h1().is_none());
        assert!(s.atr14.is_none());
    }
}
