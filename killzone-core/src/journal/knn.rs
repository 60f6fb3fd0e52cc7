//! Weighted nearest-neighbor ranking over trade feature vectors.

use super::features::{vector, TradeFeatures, FEATURE_DIMS};
use serde::{Deserialize, Serialize};

/// Default dimension weights. RR and the ATR-normalized ratios dominate;
/// categorical flags contribute less.
pub const DEFAULT_WEIGHTS: [f64; FEATURE_DIMS] =
    [0.6, 0.2, 0.6, 0.5, 0.3, 0.3, 0.3, 0.8, 1.2, 1.2, 0.4, 1.0];

/// Presence penalties: added when exactly one of target/candidate carries the
/// ATR-normalized value. Keeps "no data" from masquerading as similarity.
const RISK_ATR_PENALTY: f64 = 2.0;
const REWARD_ATR_PENALTY: f64 = 2.0;
const LEVEL_DIST_ATR_PENALTY: f64 = 1.0;

/// One ranked neighbor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub trade_id: String,
    pub distance: f64,
}

fn presence_mismatch(a: Option<f64>, b: Option<f64>) -> bool {
    a.is_some() != b.is_some()
}

/// Rank every other trade by weighted distance to `target_id`, ascending.
///
/// Distance is the square root of the weighted squared Euclidean distance
/// over the 12 feature dimensions plus the presence penalties. Ties keep the
/// candidates' original iteration order (stable sort). Unknown target yields
/// an empty ranking.
pub fn nearest_neighbors(
    features: &[TradeFeatures],
    target_id: &str,
    k: usize,
    weights: Option<&[f64; FEATURE_DIMS]>,
) -> Vec<Neighbor> {
    let weights = weights.unwrap_or(&DEFAULT_WEIGHTS);
    let Some(target) = features.iter().find(|f| f.trade_id == target_id) else {
        return Vec::new();
    };
    let target_vec = vector(target);

    let mut out: Vec<Neighbor> = Vec::with_capacity(features.len().saturating_sub(1));
    for candidate in features {
        if candidate.trade_id == target_id {
            continue;
        }
        let candidate_vec = vector(candidate);
        let mut d2 = 0.0;
        for i in 0..FEATURE_DIMS {
            let delta = target_vec[i] - candidate_vec[i];
            d2 += weights[i] * delta * delta;
        }

        if presence_mismatch(target.risk_atr, candidate.risk_atr) {
            d2 += RISK_ATR_PENALTY;
        }
        if presence_mismatch(target.reward_atr, candidate.reward_atr) {
            d2 += REWARD_ATR_PENALTY;
        }
        if presence_mismatch(target.entry_level_dist_atr, candidate.entry_level_dist_atr) {
            d2 += LEVEL_DIST_ATR_PENALTY;
        }

        out.push(Neighbor {
            trade_id: candidate.trade_id.clone(),
            distance: d2.sqrt(),
        });
    }

    out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    out.truncate(k);
    out
}
