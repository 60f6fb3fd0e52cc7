//! Fixed-length numeric features from journaled trades.
//!
//! Optional inputs stay optional on the feature row — absence matters to the
//! ranker, which penalizes presence mismatches instead of letting a defaulted
//! zero masquerade as similarity.

use crate::domain::{LevelKind, TradeSample};
use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Dimensionality of the ranking vector.
pub const FEATURE_DIMS: usize = 12;

/// Derived features for one trade. Ephemeral, recomputed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeFeatures {
    pub trade_id: String,
    pub hour: u32,
    pub timeframe_min: u32,
    pub direction_sign: f64,
    pub level_kind: Option<LevelKind>,
    pub touched_level: Option<bool>,
    pub rejection: Option<bool>,
    pub confirmation: Option<bool>,
    pub rr: f64,
    pub risk: f64,
    pub reward: f64,
    pub atr14: Option<f64>,
    pub risk_atr: Option<f64>,
    pub reward_atr: Option<f64>,
    pub entry_round_dist: Option<f64>,
    pub entry_level_dist: Option<f64>,
    pub entry_level_dist_atr: Option<f64>,
    pub result_r: Option<f64>,
}

/// Extraction result: features plus the count of rows excluded for invalid
/// required prices. Skips are surfaced, never silent.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureExtraction {
    pub features: Vec<TradeFeatures>,
    pub skipped: usize,
}

/// Extract features for every valid trade, in input order.
///
/// Rows with non-positive entry/sl/tp are counted in `skipped`. A trade's own
/// psychological step drives the round-distance feature, falling back to
/// `default_round_step`.
pub fn extract_features(trades: &[TradeSample], default_round_step: f64) -> FeatureExtraction {
    let mut features = Vec::with_capacity(trades.len());
    let mut skipped = 0usize;

    for trade in trades {
        if !trade.has_valid_prices() {
            skipped += 1;
            continue;
        }

        let risk = trade.risk();
        let reward = trade.reward();
        let atr = trade.atr14.filter(|a| *a > 0.0);
        let risk_atr = atr.map(|a| risk / a);
        let reward_atr = atr.map(|a| reward / a);

        let step = trade
            .psych_step
            .filter(|s| *s > 0.0)
            .unwrap_or(default_round_step);
        let entry_round_dist = if step > 0.0 {
            let nearest = (trade.entry / step).round() * step;
            Some((trade.entry - nearest).abs())
        } else {
            None
        };

        let entry_level_dist = trade
            .psych_level
            .filter(|l| *l > 0.0)
            .map(|level| (trade.entry - level).abs());
        let entry_level_dist_atr = match (entry_level_dist, atr) {
            (Some(dist), Some(a)) => Some(dist / a),
            _ => None,
        };

        features.push(TradeFeatures {
            trade_id: trade.trade_id.clone(),
            hour: trade.executed_at_local.hour(),
            timeframe_min: trade.timeframe_min,
            direction_sign: trade.direction.sign(),
            level_kind: trade.level_kind,
            touched_level: trade.touched_level,
            rejection: trade.rejection,
            confirmation: trade.confirmation,
            rr: trade.rr(),
            risk,
            reward,
            atr14: atr,
            risk_atr,
            reward_atr,
            entry_round_dist,
            entry_level_dist,
            entry_level_dist_atr,
            result_r: trade.result_r,
        });
    }

    FeatureExtraction { features, skipped }
}

fn flag(value: Option<bool>) -> f64 {
    if value == Some(true) {
        1.0
    } else {
        0.0
    }
}

/// The fixed 12-dimensional ranking vector. Absent ATR-dependent values
/// become 0 here; the ranker adds presence penalties on top.
pub fn vector(f: &TradeFeatures) -> [f64; FEATURE_DIMS] {
    [
        f.hour as f64,
        f.timeframe_min as f64,
        f.direction_sign,
        f.level_kind.map(LevelKind::sign).unwrap_or(0.0),
        flag(f.touched_level),
        flag(f.rejection),
        flag(f.confirmation),
        f.rr,
        f.risk_atr.unwrap_or(0.0),
        f.reward_atr.unwrap_or(0.0),
        f.entry_round_dist.unwrap_or(0.0),
        f.entry_level_dist_atr.unwrap_or(0.0),
    ]
}

/// Aggregate journal statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalSummary {
    pub n: usize,
    pub rr_median: Option<f64>,
    pub risk_atr_median: Option<f64>,
    pub reward_atr_median: Option<f64>,
    pub wins: usize,
    pub losses: usize,
    pub winrate: Option<f64>,
    pub result_r_mean: Option<f64>,
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Summarize extracted features: medians of the positive ratios, win/loss
/// split over realized results.
pub fn summarize(features: &[TradeFeatures]) -> JournalSummary {
    let rr_median = median(features.iter().map(|f| f.rr).filter(|rr| *rr > 0.0).collect());
    let risk_atr_median = median(features.iter().filter_map(|f| f.risk_atr).collect());
    let reward_atr_median = median(features.iter().filter_map(|f| f.reward_atr).collect());

    let results: Vec<f64> = features.iter().filter_map(|f| f.result_r).collect();
    let wins = results.iter().filter(|r| **r > 0.0).count();
    let losses = results.len() - wins;
    let winrate = if results.is_empty() {
        None
    } else {
        Some(wins as f64 / results.len() as f64)
    };
    let result_r_mean = if results.is_empty() {
        None
    } else {
        Some(results.iter().sum::<f64>() / results.len() as f64)
    };

    JournalSummary {
        n: features.len(),
        rr_median,
        risk_atr_median,
        reward_atr_median,
        wins,
        losses,
        winrate,
        result_r_mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use chrono::{NaiveDate, NaiveTime};

    fn trade(id: &str, entry: f64, sl: f64, tp: f64, atr: Option<f64>) -> TradeSample {
        TradeSample {
            trade_id: id.into(),
            symbol: "XAUUSD".into(),
            timeframe_min: 5,
            executed_at_local: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_time(NaiveTime::from_hms_opt(23, 40, 0).unwrap()),
            direction: Direction::Buy,
            psych_step: Some(10.0),
            psych_level: Some(2040.0),
            level_kind: Some(LevelKind::Support),
            touched_level: Some(true),
            rejection: Some(true),
            confirmation: None,
            entry,
            sl,
            tp,
            atr14: atr,
            result_r: Some(1.0),
            notes: None,
        }
    }

    #[test]
    fn extracts_expected_vector() {
        let extraction = extract_features(&[trade("t1", 2042.0, 2030.0, 2066.0, Some(16.0))], 10.0);
        assert_eq!(extraction.skipped, 0);
        let f = &extraction.features[0];
        let v = vector(f);
        assert_eq!(v[0], 23.0); // hour
        assert_eq!(v[1], 5.0); // timeframe
        assert_eq!(v[2], 1.0); // buy
        assert_eq!(v[3], 1.0); // support
        assert_eq!(v[4], 1.0); // touched
        assert_eq!(v[5], 1.0); // rejection
        assert_eq!(v[6], 0.0); // confirmation unknown -> 0
        assert_eq!(v[7], 2.0); // rr = 24/12
        assert_eq!(v[8], 12.0 / 16.0); // risk_atr
        assert_eq!(v[9], 24.0 / 16.0); // reward_atr
        assert_eq!(v[10], 2.0); // |2042 - 2040|
        assert_eq!(v[11], 2.0 / 16.0); // level dist / atr
    }

    #[test]
    fn missing_atr_zeroes_normalized_slots() {
        let extraction = extract_features(&[trade("t1", 2042.0, 2030.0, 2066.0, None)], 10.0);
        let f = &extraction.features[0];
        assert_eq!(f.risk_atr, None);
        assert_eq!(f.reward_atr, None);
        assert_eq!(f.entry_level_dist_atr, None);
        let v = vector(f);
        assert_eq!(v[8], 0.0);
        assert_eq!(v[9], 0.0);
        assert_eq!(v[11], 0.0);
    }

    #[test]
    fn invalid_prices_are_counted_not_dropped_silently() {
        let trades = vec![
            trade("good", 2042.0, 2030.0, 2066.0, None),
            trade("bad-sl", 2042.0, 0.0, 2066.0, None),
            trade("bad-tp", 2042.0, 2030.0, -1.0, None),
        ];
        let extraction = extract_features(&trades, 10.0);
        assert_eq!(extraction.features.len(), 1);
        assert_eq!(extraction.skipped, 2);
        assert_eq!(extraction.features[0].trade_id, "good");
    }

    #[test]
    fn default_step_used_when_annotation_missing() {
        let mut t = trade("t1", 2042.0, 2030.0, 2066.0, None);
        t.psych_step = None;
        let extraction = extract_features(&[t], 25.0);
        // Nearest multiple of 25 to 2042 is 2050.
        assert_eq!(extraction.features[0].entry_round_dist, Some(8.0));
    }

    #[test]
    fn summary_over_mixed_results() {
        let mut t1 = trade("t1", 2042.0, 2030.0, 2066.0, Some(16.0));
        t1.result_r = Some(2.0);
        let mut t2 = trade("t2", 2042.0, 2030.0, 2054.0, None);
        t2.result_r = Some(-1.0);
        let mut t3 = trade("t3", 2042.0, 2030.0, 2054.0, None);
        t3.result_r = None;

        let extraction = extract_features(&[t1, t2, t3], 10.0);
        let summary = summarize(&extraction.features);
        assert_eq!(summary.n, 3);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.winrate, Some(0.5));
        assert_eq!(summary.result_r_mean, Some(0.5));
        // rr values: 2.0, 1.0, 1.0 -> median 1.0
        assert_eq!(summary.rr_median, Some(1.0));
        assert_eq!(summary.risk_atr_median, Some(0.75));
    }
}
