//! Dice evaluation: the evaluator protocol, throw modes, and pool results.
//!
//! The engine never touches a randomness source directly. A committed throw
//! is handed to a [`DiceEvaluator`] collaborator as a [`RollRequest`]; the
//! evaluator realizes the pool (including the ten-explosion chain) and hands
//! back a [`RollOutcome`](roll::RollOutcome).

pub mod evaluator;
pub mod roll;

pub use evaluator::PoolEvaluator;
pub use roll::{DieResult, RollOutcome};

use serde::{Deserialize, Serialize};

/// Number of faces on the system die.
pub const DIE_FACES: u32 = 10;

bitflags::bitflags! {
    /// Per-throw mode flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ThrowMode: u8 {
        /// Dice below the threshold subtract a success instead of being ignored.
        const DEDUCT_FAILURES = 1 << 0;
        /// Dice showing the maximum face credit an extra success and chain.
        const EXPLODE_SUCCESS = 1 << 1;
        /// Critical failures require deduct-failures to have been active,
        /// not just a negative total.
        const STRICT_CRITICALS = 1 << 2;
    }
}

impl Default for ThrowMode {
    fn default() -> Self {
        Self::STRICT_CRITICALS
    }
}

/// Everything an evaluator needs to realize one pool of dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    /// Number of dice in the pool.
    pub dice: u32,
    /// Faces per die (always [`DIE_FACES`] in this system).
    pub faces: u32,
    /// A die at or above this value counts as a success.
    pub threshold: u32,
    /// Whether maximum faces explode.
    pub explode: bool,
    /// Whether sub-threshold dice subtract from the total.
    pub deduct_failures: bool,
}

impl std::fmt::Display for RollRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{} \u{2265} {}", self.dice, self.faces, self.threshold)?;
        if self.explode {
            write!(f, " x{}", self.faces)?;
        }
        if self.deduct_failures {
            write!(f, " -f")?;
        }
        Ok(())
    }
}

/// The contract the engine uses to realize a pool of dice.
///
/// The evaluator owns the randomness source; evaluation is bounded pure
/// computation over a self-limiting explosion chain, so it completes in
/// negligible time and needs no cancellation.
pub trait DiceEvaluator {
    /// Roll the requested pool and return the outcome.
    fn evaluate(&mut self, request: &RollRequest) -> RollOutcome;
}
