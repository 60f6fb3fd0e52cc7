//! Signal — the engine's bounded trade suggestion. Immutable once returned.

use super::direction::Direction;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One trade signal issued inside a kill-zone window.
///
/// Targets are ordered nearest-first. `issued_at` is the local date-time the
/// caller supplied with the tick — the core never reads a clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Direction,
    pub entry: f64,
    pub stop: f64,
    pub targets: Vec<f64>,
    pub tested_level: f64,
    pub rejection_strength: f64,
    /// |entry - stop| in price units.
    pub risk_points: f64,
    /// Label of the window that issued this signal ("HH:MM-HH:MM" or "OBSERVATION").
    pub window: String,
    pub issued_at: NaiveDateTime,
}
