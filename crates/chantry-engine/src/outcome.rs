//! Classification of a resolved roll into failure, success, or botch.

use serde::{Deserialize, Serialize};

use crate::dice::{RollOutcome, ThrowMode};

/// How the final total reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalKind {
    /// Negative dice term under deduct-failures: the throw botched.
    CriticalFailure,
    /// No net successes.
    Failure,
    /// That many degrees of success.
    Success(
        /// Net success count.
        u32,
    ),
}

impl std::fmt::Display for TotalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalFailure => write!(f, "Critical Failure"),
            Self::Failure => write!(f, "Failure"),
            Self::Success(n) => write!(f, "Success ({n})"),
        }
    }
}

/// A roll outcome with success modifiers folded in and classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretedRoll {
    /// Signed dice term before success modifiers (willpower included).
    pub dice_term: i32,
    /// Final total: dice term plus success bonus and malus.
    pub total: i32,
    /// Classification of the total.
    pub kind: TotalKind,
}

/// Fold success modifiers into a roll outcome and classify the total.
///
/// A total of exactly 0 is a plain failure. A negative total is a critical
/// failure only if deduct-failures was active and the unmodified dice term
/// was itself negative; without [`ThrowMode::STRICT_CRITICALS`] any negative
/// total reads as critical.
pub fn interpret(
    outcome: &RollOutcome,
    success_bonus: i32,
    success_malus: i32,
    mode: ThrowMode,
) -> InterpretedRoll {
    let dice_term = outcome.raw_total;
    let total = dice_term + success_bonus + success_malus;

    let kind = if total > 0 {
        TotalKind::Success(total as u32)
    } else if total < 0 {
        let critical = if mode.contains(ThrowMode::STRICT_CRITICALS) {
            outcome.deducted_failures && dice_term < 0
        } else {
            true
        };
        if critical {
            TotalKind::CriticalFailure
        } else {
            TotalKind::Failure
        }
    } else {
        TotalKind::Failure
    };

    InterpretedRoll {
        dice_term,
        total,
        kind,
    }
}
