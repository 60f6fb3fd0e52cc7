//! Kill-zone session gating: time windows and per-day issuance quotas.
//!
//! The session state is the only mutable resource in the core. It belongs to
//! whichever long-lived service owns the engine; resetting on a new day is an
//! explicit contract (`roll_day`), not a side effect hidden in each call.

use crate::config::SessionConfig;
use crate::domain::DirectionBias;
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;

/// Catch-all window label for times inside the session but outside every
/// declared priority window.
pub const OBSERVATION_LABEL: &str = "OBSERVATION";

/// True iff `t` lies in [start, end], honoring midnight wraparound:
/// when start > end the window spans midnight and matches t >= start OR
/// t <= end. Both ends are inclusive.
pub fn time_in_window(t: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start <= end {
        start <= t && t <= end
    } else {
        t >= start || t <= end
    }
}

/// The window resolved for a given wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveWindow {
    pub label: String,
    pub bias: DirectionBias,
}

impl SessionConfig {
    /// True iff `t` falls inside the overall session range.
    pub fn is_within_session(&self, t: NaiveTime) -> bool {
        time_in_window(t, self.session_start, self.session_end)
    }

    /// Resolve the active window at `t`: `None` outside the session, the
    /// first declared window containing `t`, or the OBSERVATION catch-all.
    ///
    /// Declaration order is the tie-break — windows are never re-sorted.
    pub fn active_window(&self, t: NaiveTime) -> Option<ActiveWindow> {
        if !self.is_within_session(t) {
            return None;
        }
        for window in &self.windows {
            if time_in_window(t, window.start, window.end) {
                return Some(ActiveWindow {
                    label: window.label(),
                    bias: window.bias,
                });
            }
        }
        Some(ActiveWindow {
            label: OBSERVATION_LABEL.to_string(),
            bias: DirectionBias::Both,
        })
    }
}

/// Per-day, per-window issuance counters.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    day: Option<NaiveDate>,
    issued: HashMap<String, u32>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The day the counters currently apply to.
    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    /// Reset counters iff the day key changed. Returns true when a reset
    /// happened. Calling again with the same key is a no-op — counts reset
    /// exactly once per distinct day.
    pub fn roll_day(&mut self, day: NaiveDate) -> bool {
        if self.day != Some(day) {
            self.day = Some(day);
            self.issued.clear();
            return true;
        }
        false
    }

    /// Signals already issued for `label` today.
    pub fn issued(&self, label: &str) -> u32 {
        self.issued.get(label).copied().unwrap_or(0)
    }

    /// Whether another signal may be issued for `label`. Never mutates.
    pub fn can_issue(&self, label: &str, quota: u32) -> bool {
        self.issued(label) < quota
    }

    /// Record a confirmed signal. Called only after signal creation succeeds.
    pub fn record_issue(&mut self, label: &str) {
        *self.issued.entry(label.to_string()).or_insert(0) += 1;
    }
}
