//! Session configuration — named policy constants, TOML-loadable.
//!
//! Every threshold the engine applies is a named field with the validated
//! default. Callers tune them through a config file or struct literal, never
//! by editing the engine.

use crate::domain::DirectionBias;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A fixed local-time trading window with an expected direction bias.
/// May wrap past midnight. Declaration order is load-bearing: the engine
/// resolves the first matching window, not the best one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub bias: DirectionBias,
}

impl PriorityWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, bias: DirectionBias) -> Self {
        Self { start, end, bias }
    }

    /// Window label as rendered into signals: "HH:MM-HH:MM".
    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Structural stop band, in price units of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopBand {
    /// Minimum structural distance from the tested level.
    pub min: f64,
    /// Risk above this is clamped by widening the stop to exactly this distance.
    pub max: f64,
    /// Risk below this rejects the candidate outright — never clamped up.
    pub tight_limit: f64,
}

impl Default for StopBand {
    fn default() -> Self {
        Self {
            min: 35.0,
            max: 65.0,
            tight_limit: 10.0,
        }
    }
}

/// Wick-rejection thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RejectionParams {
    pub min_wick: f64,
    pub touch_tolerance: f64,
    /// Candidates below this rejection strength are skipped.
    pub min_strength: f64,
}

impl Default for RejectionParams {
    fn default() -> Self {
        Self {
            min_wick: 2.0,
            touch_tolerance: 0.5,
            min_strength: 1.5,
        }
    }
}

/// Full kill-zone session configuration.
///
/// The defaults encode the validated Asia-session policy: a 23:00-06:00
/// session (local time, wrapping midnight) with four priority windows and
/// at most two signals per window per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub session_start: NaiveTime,
    pub session_end: NaiveTime,
    pub windows: Vec<PriorityWindow>,
    pub max_signals_per_window: u32,
    pub stop: StopBand,
    pub target_count: usize,
    pub rejection: RejectionParams,
    /// Informational only — historical win rate of the validated playbook.
    pub expected_win_rate: f64,
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    // Hardcoded constants below are all in range.
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or_default()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_start: hm(23, 0),
            session_end: hm(6, 0),
            windows: vec![
                PriorityWindow::new(hm(23, 20), hm(0, 30), DirectionBias::Sell),
                PriorityWindow::new(hm(0, 30), hm(1, 30), DirectionBias::Both),
                PriorityWindow::new(hm(3, 0), hm(4, 0), DirectionBias::Buy),
                PriorityWindow::new(hm(5, 0), hm(6, 0), DirectionBias::Sell),
            ],
            max_signals_per_window: 2,
            stop: StopBand::default(),
            target_count: 4,
            rejection: RejectionParams::default(),
            expected_win_rate: 0.87,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse session config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SessionConfig {
    /// Load a config from TOML text. Missing fields fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}
