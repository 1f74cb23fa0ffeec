//! Backlash ("paradox") accounting for magical-effect throws.
//!
//! Reality pushes back against obvious magic. After an effect throw resolves,
//! the proposed backlash gain is computed from the outcome, the player's
//! declared risk category, and the effect's power level. Points are applied
//! to the character only on explicit confirmation, through the
//! [`CharacterRecord`] collaborator, never automatically. An optional
//! follow-up feedback roll can bleed accumulated backlash off again.

use serde::{Deserialize, Serialize};

use crate::dice::{DIE_FACES, DiceEvaluator, RollOutcome, RollRequest};
use crate::outcome::TotalKind;

/// The player's declared concealment level for a magical effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    /// Disguised as a mundane occurrence.
    Coincidental,
    /// Openly impossible.
    Vulgar,
    /// Openly impossible, with unenlightened witnesses.
    VulgarWithWitness,
}

impl RiskCategory {
    /// Multiplier used in the critical-failure rule (0 / 1 / 2).
    pub fn risk_value(self) -> u32 {
        match self {
            Self::Coincidental => 0,
            Self::Vulgar => 1,
            Self::VulgarWithWitness => 2,
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coincidental => write!(f, "coincidental"),
            Self::Vulgar => write!(f, "vulgar"),
            Self::VulgarWithWitness => write!(f, "vulgar (witnessed)"),
        }
    }
}

/// Backlash points proposed by one effect throw.
///
/// On a critical failure, coincidental magic earns the effect level and
/// vulgar magic earns `effect_level * risk_value + risk_value`. On any other
/// outcome coincidental magic is free and vulgar magic earns exactly 1.
pub fn backlash_gain(kind: TotalKind, effect_level: u32, risk: RiskCategory) -> u32 {
    match (kind, risk) {
        (TotalKind::CriticalFailure, RiskCategory::Coincidental) => effect_level,
        (TotalKind::CriticalFailure, _) => effect_level * risk.risk_value() + risk.risk_value(),
        (_, RiskCategory::Coincidental) => 0,
        (_, _) => 1,
    }
}

/// Mutable interface to the character record owning the backlash total.
///
/// The record, not the engine, owns clamping of the running total to
/// `[0, max_backlash]`. Calls are additive; the engine does not deduplicate
/// repeated calls, since each one represents a distinct player or GM
/// decision.
pub trait CharacterRecord {
    /// The character's current accumulated backlash points.
    fn backlash_total(&self) -> u32;

    /// Add `delta` (possibly negative) to the backlash total, clamped by the
    /// record. Returns the new total.
    fn apply_backlash(&mut self, delta: i32) -> u32;

    /// Spend a willpower point for the one-time +1 success bonus. Returns
    /// false if no willpower remains.
    fn spend_willpower_for_bonus(&mut self) -> bool;
}

/// Apply a confirmed backlash gain to the character.
///
/// Returns the record's new total. This is the only path through which the
/// engine mutates backlash state.
pub fn confirm_backlash(record: &mut dyn CharacterRecord, gain: u32) -> u32 {
    let total = record.apply_backlash(gain as i32);
    tracing::info!(gain, total, "backlash confirmed");
    total
}

/// Result of a feedback mitigation roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackOutcome {
    /// The feedback roll botched: all accumulated backlash is expunged.
    Expunged,
    /// Net change to apply instead of the proposed gain (may be negative).
    Net(
        /// Proposed gain minus the feedback roll's total.
        i32,
    ),
}

/// Run a feedback mitigation roll against a proposed gain.
///
/// The pool equals the currently accumulated backlash, the threshold is
/// fixed at 6 with deduct-failures active. A critical-failure feedback
/// result expunges everything; otherwise the net change is the proposed
/// gain minus the feedback total.
pub fn feedback_roll(
    evaluator: &mut dyn DiceEvaluator,
    accumulated: u32,
    proposed_gain: u32,
) -> (RollOutcome, FeedbackOutcome) {
    let request = RollRequest {
        dice: accumulated,
        faces: DIE_FACES,
        threshold: 6,
        explode: false,
        deduct_failures: true,
    };
    let outcome = evaluator.evaluate(&request);
    let verdict = if outcome.raw_total < 0 {
        FeedbackOutcome::Expunged
    } else {
        FeedbackOutcome::Net(proposed_gain as i32 - outcome.raw_total)
    };
    tracing::debug!(accumulated, proposed_gain, ?verdict, "feedback roll resolved");
    (outcome, verdict)
}

/// Apply a feedback verdict to the character record. Returns the new total.
pub fn apply_feedback(record: &mut dyn CharacterRecord, verdict: FeedbackOutcome) -> u32 {
    let delta = match verdict {
        FeedbackOutcome::Expunged => -(record.backlash_total() as i32),
        FeedbackOutcome::Net(delta) => delta,
    };
    let total = record.apply_backlash(delta);
    tracing::info!(delta, total, "feedback applied");
    total
}
