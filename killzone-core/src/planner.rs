//! Heuristic entry plan from day-opening history.
//!
//! A deterministic suggestion layer over the snapshot table: median H1
//! excursions (raw and ATR-normalized), a round-number-open cohort win rate,
//! and a risk-normalized bracket. Not financial advice — a checklist input.

use crate::domain::{DailySnapshot, PlanDirection};
use serde::{Deserialize, Serialize};

/// Tunables for one plan request. Defaults carry the validated policy values.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanParams {
    pub reference_price: f64,
    /// Round-number grid for entry/target snapping.
    pub round_step: f64,
    /// How close an open must sit to a grid point to join the cohort.
    pub round_proximity: f64,
    pub min_rr: f64,
    pub account_balance: Option<f64>,
    pub risk_percent: Option<f64>,
    /// Units per lot for sizing (broker-dependent).
    pub contract_size: f64,
}

impl PlanParams {
    pub fn new(reference_price: f64) -> Self {
        Self {
            reference_price,
            round_step: 10.0,
            round_proximity: 1.5,
            min_rr: 1.0,
            account_balance: None,
            risk_percent: None,
            contract_size: 100.0,
        }
    }
}

/// Cohort size below which the round-number win rate is not trusted.
pub const MIN_COHORT: usize = 80;
/// Win-rate bands for the cohort decision.
pub const COHORT_LONG_WINRATE: f64 = 0.55;
pub const COHORT_SHORT_WINRATE: f64 = 0.45;
/// Mean close-direction band for the fallback decision. Intentionally
/// asymmetric from the cohort bands.
pub const FALLBACK_DIRECTION_BAND: f64 = 0.05;

/// Audit statistics attached to every non-degenerate plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStats {
    pub history_rows: usize,
    pub h1_rows: usize,
    pub near_round_rows: usize,
    pub near_round_long_winrate: Option<f64>,
    pub median_up_h1: Option<f64>,
    pub median_down_h1: Option<f64>,
    pub median_up_h1_atr: Option<f64>,
    pub median_down_h1_atr: Option<f64>,
    pub current_atr14: Option<f64>,
    pub reference_price: f64,
    pub nearest_round: f64,
    pub reference_near_round: bool,
}

/// The plan: direction, bracket, sizing, advisory notes, audit stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPlan {
    pub direction: PlanDirection,
    pub entry: f64,
    pub stop: f64,
    pub take_profit: f64,
    pub rr: f64,
    pub lots: Option<f64>,
    pub risk_amount: Option<f64>,
    pub stop_distance: f64,
    pub notes: Vec<String>,
    pub stats: Option<PlanStats>,
}

fn nearest_round(price: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return price;
    }
    (price / step).round() * step
}

fn snap_up(price: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return price;
    }
    (price / step).ceil() * step
}

fn snap_down(price: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return price;
    }
    (price / step).floor() * step
}

/// Median with even-length averaging. None for an empty slice.
fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

fn degenerate_plan(reference_price: f64) -> EntryPlan {
    EntryPlan {
        direction: PlanDirection::Neutral,
        entry: reference_price,
        stop: reference_price,
        take_profit: reference_price,
        rr: 0.0,
        lots: None,
        risk_amount: None,
        stop_distance: 0.0,
        notes: vec!["No historical snapshots available to derive a plan.".into()],
        stats: None,
    }
}

/// Build one plan from daily snapshots. Empty history yields the neutral
/// degenerate plan; everything else is a single deterministic pass.
pub fn build_entry_plan(history: &[DailySnapshot], params: &PlanParams) -> EntryPlan {
    let mut notes: Vec<String> = Vec::new();
    if history.is_empty() {
        return degenerate_plan(params.reference_price);
    }

    // The core sorts internally; callers may hand rows in any order.
    let mut sorted: Vec<&DailySnapshot> = history.iter().collect();
    sorted.sort_by_key(|s| s.trade_date);

    let rows_h1: Vec<&DailySnapshot> = sorted.iter().copied().filter(|s| s.h1().is_some()).collect();
    if rows_h1.len() < 50 {
        notes.push(
            "Fewer than 50 snapshots with H1 aggregates; statistics may be unstable.".into(),
        );
    }

    let mut up_moves = Vec::with_capacity(rows_h1.len());
    let mut down_moves = Vec::with_capacity(rows_h1.len());
    let mut up_moves_atr = Vec::new();
    let mut down_moves_atr = Vec::new();
    let mut close_dir = Vec::with_capacity(rows_h1.len());

    for row in &rows_h1 {
        let (h1_high, h1_low, h1_close) = match row.h1() {
            Some(triple) => triple,
            None => continue,
        };
        let up = h1_high - row.open;
        let down = row.open - h1_low;
        up_moves.push(up);
        down_moves.push(down);
        if let Some(atr) = row.positive_atr() {
            up_moves_atr.push(up / atr);
            down_moves_atr.push(down / atr);
        }
        close_dir.push(if h1_close > row.open { 1.0 } else { -1.0 });
    }

    let med_up = median(&up_moves);
    let med_down = median(&down_moves);
    let med_up_atr = median(&up_moves_atr);
    let med_down_atr = median(&down_moves_atr);

    // Most recent ATR as the current volatility regime reference.
    let mut current_atr = sorted.iter().rev().find_map(|s| s.positive_atr());
    if current_atr.is_none() && !rows_h1.is_empty() {
        current_atr = match (med_up, med_down) {
            (Some(u), Some(d)) => Some(u.max(d) * 2.0),
            (Some(u), None) => Some(u * 2.0),
            (None, Some(d)) => Some(d * 2.0),
            (None, None) => None,
        };
    }

    let nearest = nearest_round(params.reference_price, params.round_step);
    let near_round = (params.reference_price - nearest).abs() <= params.round_proximity;

    // Round-number bias cohort: days whose open sat near a grid point.
    let near_rows: Vec<&DailySnapshot> = rows_h1
        .iter()
        .copied()
        .filter(|s| {
            let open_nearest = nearest_round(s.open, params.round_step);
            (s.open - open_nearest).abs() <= params.round_proximity
        })
        .collect();

    let long_winrate = if near_rows.is_empty() {
        None
    } else {
        let wins = near_rows
            .iter()
            .filter(|s| matches!(s.h1(), Some((_, _, c)) if c > s.open))
            .count();
        Some(wins as f64 / near_rows.len() as f64)
    };

    let direction = match long_winrate {
        Some(wr) if near_rows.len() >= MIN_COHORT => {
            if wr >= COHORT_LONG_WINRATE {
                PlanDirection::Long
            } else if wr <= COHORT_SHORT_WINRATE {
                PlanDirection::Short
            } else {
                PlanDirection::Neutral
            }
        }
        _ if !rows_h1.is_empty() => {
            let overall = close_dir.iter().sum::<f64>() / close_dir.len() as f64;
            if overall >= FALLBACK_DIRECTION_BAND {
                PlanDirection::Long
            } else if overall <= -FALLBACK_DIRECTION_BAND {
                PlanDirection::Short
            } else {
                PlanDirection::Neutral
            }
        }
        _ => PlanDirection::Neutral,
    };

    // Entry anchored to the grid only when the reference itself is near it.
    let entry = if near_round {
        nearest
    } else {
        params.reference_price
    };
    if params.round_step > 0.0 && near_round {
        notes.push(format!("Entry anchored to round number: {nearest:.2}"));
    }

    // Stop distance preference chain: ATR-normalized median adverse move,
    // then raw medians, then a conservative default.
    let base_stop = match (current_atr, med_up_atr, med_down_atr) {
        (Some(atr), Some(up_atr), Some(down_atr)) => {
            let base_norm = match direction {
                PlanDirection::Long => down_atr,
                PlanDirection::Short => up_atr,
                PlanDirection::Neutral => up_atr.max(down_atr),
            };
            notes.push("Stop derived from median adverse move normalized by ATR14.".into());
            base_norm * atr
        }
        _ => match (med_up, med_down) {
            (Some(up), Some(down)) => match direction {
                PlanDirection::Long => down,
                PlanDirection::Short => up,
                PlanDirection::Neutral => up.max(down),
            },
            (Some(up), None) => up,
            (None, Some(down)) => down,
            (None, None) => {
                notes.push("Default stop (insufficient H1 history).".into());
                if params.round_step > 0.0 {
                    1.0_f64.max(params.round_step * 0.1)
                } else {
                    1.0
                }
            }
        },
    };

    let stop_distance = base_stop.max(0.5);

    let (stop, mut take_profit) = match direction {
        PlanDirection::Long => (entry - stop_distance, entry + stop_distance * params.min_rr),
        PlanDirection::Short => (entry + stop_distance, entry - stop_distance * params.min_rr),
        // Neutral: symmetric bracket, long-shaped.
        PlanDirection::Neutral => (entry - stop_distance, entry + stop_distance * params.min_rr),
    };
    let pre_snap_tp = take_profit;

    // Snap the target to a favorable grid point, then re-verify the RR floor.
    if params.round_step > 0.0 {
        match direction {
            PlanDirection::Long => take_profit = snap_up(take_profit, params.round_step),
            PlanDirection::Short => take_profit = snap_down(take_profit, params.round_step),
            PlanDirection::Neutral => {}
        }
    }

    let risk = (entry - stop).abs();
    let mut effective_rr = if risk > 0.0 {
        (take_profit - entry).abs() / risk
    } else {
        0.0
    };
    if effective_rr + 1e-9 < params.min_rr {
        // Snapping violated the floor; discard it.
        take_profit = pre_snap_tp;
        effective_rr = params.min_rr;
    }

    let (lots, risk_amount) = match (params.account_balance, params.risk_percent) {
        (Some(balance), Some(risk_pct)) => {
            let amount = balance * risk_pct / 100.0;
            let denom = stop_distance * params.contract_size;
            let lots = if denom > 0.0 { Some(amount / denom) } else { None };
            (lots, Some(amount))
        }
        _ => (None, None),
    };

    let stats = PlanStats {
        history_rows: history.len(),
        h1_rows: rows_h1.len(),
        near_round_rows: near_rows.len(),
        near_round_long_winrate: long_winrate,
        median_up_h1: med_up,
        median_down_h1: med_down,
        median_up_h1_atr: med_up_atr,
        median_down_h1_atr: med_down_atr,
        current_atr14: current_atr,
        reference_price: params.reference_price,
        nearest_round: nearest,
        reference_near_round: near_round,
    };

    if direction == PlanDirection::Neutral {
        notes.push("Neutral bias (no strong signal). Use as a checklist, not a trigger.".into());
    } else {
        notes.push("Plan generated heuristically from imported history.".into());
    }
    if let Some(atr) = current_atr {
        if atr > 0.0 {
            notes.push(format!("ATR14 context: stop distance = {:.2} ATR.", stop_distance / atr));
        }
    }

    EntryPlan {
        direction,
        entry,
        stop,
        take_profit,
        rr: effective_rr,
        lots,
        risk_amount,
        stop_distance,
        notes,
        stats: Some(stats),
    }
}
