//! Per-tick signal decision: session gate, level scan, rejection test,
//! stop/target construction, quota accounting.

pub mod stops;
pub mod targets;

pub use stops::{risk_points, structural_stop};
pub use targets::target_ladder;

use crate::config::SessionConfig;
use crate::domain::{Candle, CandleError, Direction, DirectionBias, Signal};
use crate::levels;
use crate::rejection::RejectionDetector;
use crate::session::SessionState;
use chrono::{NaiveDate, NaiveTime};

/// Levels scanned per tick, nearest first.
pub const SCANNED_LEVELS: usize = 5;

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Everything the engine needs for one tick, supplied by the caller.
/// The engine reads no clock: `at`/`day` are the observed local time and
/// day key.
#[derive(Debug, Clone)]
pub struct TickContext<'a> {
    pub price: f64,
    /// Representative candle for rejection testing (usually the last closed one).
    pub candle: &'a Candle,
    pub recent_high: Option<f64>,
    pub recent_low: Option<f64>,
    pub at: NaiveTime,
    pub day: NaiveDate,
    /// Overrides the window's expected direction when set.
    pub forced_bias: Option<DirectionBias>,
    /// Overrides the inferred psychological step when set and positive.
    pub step_override: Option<f64>,
}

/// The kill-zone signal engine.
///
/// Owns the per-day window counters. `analyze` takes `&mut self`, so the
/// quota check and increment are atomic per instance; sharing one engine
/// across threads requires an external lock (or one engine per logical
/// trading session).
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: SessionConfig,
    state: SessionState,
}

impl SignalEngine {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SessionConfig::default())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Evaluate one tick. At most one signal per call.
    ///
    /// `Ok(None)` is the normal quiet outcome: outside the session, quota
    /// exhausted, or no qualifying rejection. `Err` only for a malformed
    /// candle — callers batching ticks skip the one computation and continue.
    ///
    /// Scan policy is first-match, not best-match: levels by proximity, then
    /// directions in declaration order. Re-sorting by rejection strength
    /// would change which trades fire.
    pub fn analyze(&mut self, tick: &TickContext<'_>) -> Result<Option<Signal>, CandleError> {
        tick.candle.validate()?;

        let Some(window) = self.config.active_window(tick.at) else {
            return Ok(None);
        };

        self.state.roll_day(tick.day);
        if !self
            .state
            .can_issue(&window.label, self.config.max_signals_per_window)
        {
            return Ok(None);
        }

        let bias = tick.forced_bias.unwrap_or(window.bias);
        let levels = levels::generate(tick.price, tick.step_override);
        let Some(first) = levels.first() else {
            return Ok(None);
        };
        let step = tick.step_override.filter(|s| *s > 0.0).unwrap_or(first.step);
        let detector = RejectionDetector::from_params(&self.config.rejection);

        for level in levels.iter().take(SCANNED_LEVELS) {
            for &direction in bias.candidates() {
                let rejection = detector.detect(tick.candle, level.value, direction);
                if !rejection.rejected || rejection.strength < self.config.rejection.min_strength {
                    continue;
                }

                let mut stop = structural_stop(
                    direction,
                    level.value,
                    tick.recent_low,
                    tick.recent_high,
                    self.config.stop.min,
                );
                let mut risk = risk_points(tick.price, stop);

                if risk < self.config.stop.tight_limit {
                    continue;
                }
                if risk > self.config.stop.max {
                    stop = round2(match direction {
                        Direction::Buy => tick.price - self.config.stop.max,
                        Direction::Sell => tick.price + self.config.stop.max,
                    });
                    risk = risk_points(tick.price, stop);
                }

                let targets =
                    target_ladder(tick.price, direction, step, self.config.target_count);
                if targets.is_empty() {
                    continue;
                }

                self.state.record_issue(&window.label);
                return Ok(Some(Signal {
                    direction,
                    entry: round2(tick.price),
                    stop,
                    targets,
                    tested_level: level.value,
                    rejection_strength: rejection.strength,
                    risk_points: risk,
                    window: window.label.clone(),
                    issued_at: tick.day.and_time(tick.at),
                }));
            }
        }

        Ok(None)
    }
}
