//! Roll outcomes and per-die results.

use serde::{Deserialize, Serialize};

/// One die as it appears in the displayed result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// Face shown (for a pseudo-die, the maximum face).
    pub value: u32,
    /// True for the always-succeeds stand-ins that replace exploded dice.
    pub pseudo: bool,
}

/// The realized result of one dice-pool evaluation.
///
/// `raw_total` is derived strictly from the die results with deduction and
/// explosion applied; after evaluation it is adjusted only by the explicit,
/// one-time willpower spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Displayed die results: one pseudo-die per explosion, then active dice.
    pub results: Vec<DieResult>,
    /// How many dice exploded (recursively).
    pub explosion_count: u32,
    /// Signed success count of the dice term alone, before success modifiers.
    pub raw_total: i32,
    /// Whether deduct-failures was active for this evaluation.
    pub deducted_failures: bool,
    willpower_spent: bool,
}

impl RollOutcome {
    /// Assemble an outcome from evaluated parts.
    pub fn new(
        results: Vec<DieResult>,
        explosion_count: u32,
        raw_total: i32,
        deducted_failures: bool,
    ) -> Self {
        Self {
            results,
            explosion_count,
            raw_total,
            deducted_failures,
            willpower_spent: false,
        }
    }

    /// Spend willpower for a one-time +1 success.
    ///
    /// Returns false (and changes nothing) if willpower was already spent
    /// on this outcome. Each call represents a distinct player decision, so
    /// the engine does not deduplicate beyond this single-outcome latch.
    pub fn spend_willpower(&mut self) -> bool {
        if self.willpower_spent {
            return false;
        }
        self.willpower_spent = true;
        self.raw_total += 1;
        tracing::info!(raw_total = self.raw_total, "willpower spent for +1 success");
        true
    }

    /// Whether the willpower bonus has been applied.
    pub fn willpower_spent(&self) -> bool {
        self.willpower_spent
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces: Vec<String> = self
            .results
            .iter()
            .map(|d| {
                if d.pseudo {
                    format!("({})", d.value)
                } else {
                    d.value.to_string()
                }
            })
            .collect();
        write!(f, "[{}] = {}", faces.join(", "), self.raw_total)
    }
}
