//! Daily-snapshot aggregation from already-fetched intraday candles.
//!
//! The pure half of the ingestion pipeline: candle retrieval is an external
//! concern; this module folds an ordered intraday series into per-day rows
//! with H1/H3 post-open aggregates and ATR(14).

use crate::domain::{Candle, DailySnapshot};
use crate::indicators::{atr14_by_date, DayOhlc};
use chrono::{NaiveTime, Timelike};

/// Aggregation options. `candles_per_hour` matches the feed granularity
/// (12 for 5-minute candles).
#[derive(Debug, Clone)]
pub struct SnapshotBuildOptions {
    /// UTC time-of-day of the anchor open.
    pub anchor: NaiveTime,
    pub candles_per_hour: usize,
    pub source: Option<String>,
}

impl Default for SnapshotBuildOptions {
    fn default() -> Self {
        Self {
            anchor: NaiveTime::default(), // midnight UTC
            candles_per_hour: 12,
            source: None,
        }
    }
}

/// Aggregation result with advisory notes — dropped or skipped rows are
/// reported, not silently truncated.
#[derive(Debug, Clone)]
pub struct SnapshotBuild {
    pub snapshots: Vec<DailySnapshot>,
    pub notes: Vec<String>,
}

/// Build one snapshot per UTC date from time-ordered intraday candles.
///
/// Insane candles are skipped (and counted in the notes); a date's snapshot
/// is emitted only when a full H1 and H3 window follows its anchor candle.
pub fn build_daily_snapshots(candles: &[Candle], opts: &SnapshotBuildOptions) -> SnapshotBuild {
    let mut notes: Vec<String> = Vec::new();
    if candles.is_empty() {
        return SnapshotBuild {
            snapshots: Vec::new(),
            notes: vec!["No candles supplied.".into()],
        };
    }

    let insane = candles.iter().filter(|c| !c.is_sane()).count();
    if insane > 0 {
        notes.push(format!("{insane} malformed candles skipped."));
    }
    let clean: Vec<&Candle> = candles.iter().filter(|c| c.is_sane()).collect();
    if clean.is_empty() {
        notes.push("No usable candles after validation.".into());
        return SnapshotBuild {
            snapshots: Vec::new(),
            notes,
        };
    }

    // Fold per-UTC-date day OHLC for ATR.
    let mut days: Vec<DayOhlc> = Vec::new();
    for candle in &clean {
        let date = candle.time.date_naive();
        match days.last_mut() {
            Some(day) if day.date == date => {
                day.high = day.high.max(candle.high);
                day.low = day.low.min(candle.low);
                day.close = candle.close;
            }
            _ => days.push(DayOhlc {
                date,
                high: candle.high,
                low: candle.low,
                close: candle.close,
            }),
        }
    }

    let atr = atr14_by_date(&days);
    if atr.is_empty() {
        notes.push("ATR14: insufficient history (need at least 14 days).".into());
    }

    // Anchor candles: first occurrence per date at the anchor time-of-day.
    let h1_len = opts.candles_per_hour;
    let h3_len = opts.candles_per_hour * 3;
    let mut snapshots: Vec<DailySnapshot> = Vec::new();
    let mut dropped_tail = 0usize;
    let mut last_anchor_date = None;

    for (i, candle) in clean.iter().enumerate() {
        let t = candle.time.time();
        if t.hour() != opts.anchor.hour() || t.minute() != opts.anchor.minute() {
            continue;
        }
        let trade_date = candle.time.date_naive();
        if last_anchor_date == Some(trade_date) {
            continue;
        }
        last_anchor_date = Some(trade_date);

        if i + h3_len > clean.len() {
            dropped_tail += 1;
            continue;
        }
        let window_h1 = &clean[i..i + h1_len];
        let window_h3 = &clean[i..i + h3_len];

        let max_high = |w: &[&Candle]| w.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let min_low = |w: &[&Candle]| w.iter().map(|c| c.low).fold(f64::MAX, f64::min);

        snapshots.push(DailySnapshot {
            trade_date,
            open_ts_utc: Some(candle.time),
            open: candle.open,
            h1_high: Some(max_high(window_h1)),
            h1_low: Some(min_low(window_h1)),
            h1_close: window_h1.last().map(|c| c.close),
            h3_high: Some(max_high(window_h3)),
            h3_low: Some(min_low(window_h3)),
            h3_close: window_h3.last().map(|c| c.close),
            atr14: atr.get(&trade_date).copied(),
            source: opts.source.clone(),
        });
    }

    if snapshots.is_empty() {
        notes.push(format!(
            "No candles found at anchor {} (UTC); check the feed granularity.",
            opts.anchor.format("%H:%M")
        ));
    }
    if dropped_tail > 0 {
        notes.push(format!(
            "{dropped_tail} days dropped: not enough candles after the anchor for a full H3 window."
        ));
    }

    SnapshotBuild { snapshots, notes }
}
