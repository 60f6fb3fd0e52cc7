//! Psychological level generation around a reference price.
//!
//! Steps come from fixed price bands tuned on the instrument's history; the
//! bands are part of the playbook, not derived at runtime.

use crate::domain::{LevelKind, PsychLevel};

/// Offsets scanned on each side of the rounded base price.
pub const GENERATION_SPAN: i64 = 40;
/// Levels kept after sorting by proximity.
pub const MAX_LEVELS: usize = 20;

const DIVISIBILITY_EPSILON: f64 = 1e-6;

/// Rounding step for a given price regime.
pub fn infer_step(price: f64) -> f64 {
    if price < 4800.0 {
        50.0
    } else if price < 5000.0 {
        10.0
    } else {
        20.0
    }
}

fn is_multiple_of(value: f64, divisor: f64) -> bool {
    let k = (value / divisor).round();
    (value - k * divisor).abs() < DIVISIBILITY_EPSILON
}

/// Divisibility strength 1-5: 100 -> 5, 50 -> 4, 20 -> 3, 10 -> 2, else 1.
pub fn level_strength(value: f64) -> u8 {
    if is_multiple_of(value, 100.0) {
        5
    } else if is_multiple_of(value, 50.0) {
        4
    } else if is_multiple_of(value, 20.0) {
        3
    } else if is_multiple_of(value, 10.0) {
        2
    } else {
        1
    }
}

fn classify(value: f64, reference: f64) -> LevelKind {
    if value < reference {
        LevelKind::Support
    } else if value > reference {
        LevelKind::Resistance
    } else {
        LevelKind::Both
    }
}

/// Generate candidate levels around `reference`, nearest first.
///
/// The base is `reference` rounded to the step grid; candidates span
/// `GENERATION_SPAN` step multiples on each side, non-positive values are
/// discarded, and the `MAX_LEVELS` nearest survive. A non-positive
/// `step_override` falls back to the inferred step.
pub fn generate(reference: f64, step_override: Option<f64>) -> Vec<PsychLevel> {
    let step = step_override
        .filter(|s| *s > 0.0)
        .unwrap_or_else(|| infer_step(reference));
    let base = (reference / step).round() * step;

    let mut levels: Vec<PsychLevel> = Vec::with_capacity((GENERATION_SPAN as usize) * 2 + 1);
    for offset in -GENERATION_SPAN..=GENERATION_SPAN {
        let value = base + offset as f64 * step;
        if value <= 0.0 {
            continue;
        }
        levels.push(PsychLevel {
            value,
            step,
            kind: classify(value, reference),
            strength: level_strength(value),
        });
    }

    // Stable: equidistant levels keep ascending-value generation order.
    levels.sort_by(|a, b| {
        (a.value - reference)
            .abs()
            .total_cmp(&(b.value - reference).abs())
    });
    levels.truncate(MAX_LEVELS);
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_bands() {
        assert_eq!(infer_step(2000.0), 50.0);
        assert_eq!(infer_step(4799.9), 50.0);
        assert_eq!(infer_step(4800.0), 10.0);
        assert_eq!(infer_step(4999.9), 10.0);
        assert_eq!(infer_step(5000.0), 20.0);
        assert_eq!(infer_step(5300.0), 20.0);
    }

    #[test]
    fn strength_by_divisibility() {
        assert_eq!(level_strength(2000.0), 5);
        assert_eq!(level_strength(2050.0), 4);
        assert_eq!(level_strength(2040.0), 3);
        assert_eq!(level_strength(2010.0), 2);
        assert_eq!(level_strength(2013.0), 1);
    }

    #[test]
    fn reference_2005_step_10() {
        let levels = generate(2005.0, Some(10.0));
        assert_eq!(levels.len(), MAX_LEVELS);

        // Sorted strictly ascending by distance to the reference.
        for pair in levels.windows(2) {
            assert!(
                (pair[0].value - 2005.0).abs() <= (pair[1].value - 2005.0).abs(),
                "levels out of proximity order: {} then {}",
                pair[0].value,
                pair[1].value
            );
        }

        // Base 2000 is present with full strength; 2010 is a weak multiple of 10.
        let base = levels.iter().find(|l| l.value == 2000.0).expect("base level");
        assert_eq!(base.strength, 5);
        assert_eq!(base.kind, LevelKind::Support);
        let ten = levels.iter().find(|l| l.value == 2010.0).expect("2010 level");
        assert_eq!(ten.strength, 2);
        assert_eq!(ten.kind, LevelKind::Resistance);
    }

    #[test]
    fn reference_on_grid_is_both() {
        let levels = generate(2000.0, Some(10.0));
        assert_eq!(levels[0].value, 2000.0);
        assert_eq!(levels[0].kind, LevelKind::Both);
    }

    #[test]
    fn non_positive_values_discarded() {
        // Base 100 with step 50 spans down to negative territory; only
        // positive levels survive.
        let levels = generate(100.0, Some(50.0));
        assert!(levels.iter().all(|l| l.value > 0.0));
    }

    #[test]
    fn zero_step_override_falls_back() {
        let levels = generate(2005.0, Some(0.0));
        assert_eq!(levels[0].step, 50.0); // inferred band for < 4800
    }
}
