//! Round-number target ladder.

use super::round2;
use crate::domain::Direction;

/// Step multiples on the favorable side of `entry`, nearest first.
///
/// The ladder starts from entry rounded to the step grid; rungs landing on
/// the wrong side of entry are discarded, and at most `count` survive. An
/// empty ladder disqualifies the candidate upstream.
pub fn target_ladder(entry: f64, direction: Direction, step: f64, count: usize) -> Vec<f64> {
    if step <= 0.0 || count == 0 {
        return Vec::new();
    }
    let base = (entry / step).round() * step;
    let mut targets = Vec::with_capacity(count);

    for i in 1..=count {
        let target = match direction {
            Direction::Buy => base + i as f64 * step,
            Direction::Sell => base - i as f64 * step,
        };
        let favorable = match direction {
            Direction::Buy => target > entry,
            Direction::Sell => target < entry,
        };
        if favorable {
            targets.push(round2(target));
        }
    }

    targets.truncate(count);
    targets
}
