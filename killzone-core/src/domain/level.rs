//! PsychLevel — a round-number price level with a divisibility strength.

use serde::{Deserialize, Serialize};

/// Side of a psychological level relative to the reference price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    #[serde(rename = "SUPPORT")]
    Support,
    #[serde(rename = "RESISTANCE")]
    Resistance,
    #[serde(rename = "BOTH")]
    Both,
}

impl LevelKind {
    /// +1 support, -1 resistance, 0 both. Used as a numeric feature.
    pub fn sign(self) -> f64 {
        match self {
            LevelKind::Support => 1.0,
            LevelKind::Resistance => -1.0,
            LevelKind::Both => 0.0,
        }
    }
}

/// A generated round-number level. Ephemeral — recomputed per request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychLevel {
    pub value: f64,
    /// Rounding granularity that generated this level.
    pub step: f64,
    pub kind: LevelKind,
    /// 1-5, from divisibility of `value` (100 -> 5, 50 -> 4, 20 -> 3, 10 -> 2).
    pub strength: u8,
}
