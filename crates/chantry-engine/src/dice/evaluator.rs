//! The standard rng-backed pool evaluator.
//!
//! The counting core is a pure function over a stream of die faces, so the
//! explosion and deduction rules can be exercised with scripted sequences;
//! [`PoolEvaluator`] feeds it from an owned [`Rng`].

use rand::Rng;
use rand::rngs::StdRng;

use super::roll::{DieResult, RollOutcome};
use super::{DiceEvaluator, RollRequest};

/// Safety bound on chained explosions per evaluation. Face-10 probability
/// makes long chains vanishingly rare; this only guards degenerate inputs.
const MAX_EXPLOSIONS: u32 = 1_000;

/// Realize a pool from a stream of die faces.
///
/// Each face at or above the threshold scores one success. With `explode`
/// set, a maximum face additionally credits one extra success, leaves the
/// display list in favor of an always-succeeds pseudo-die, and pulls one
/// more face from the stream under the same rule. With `deduct_failures`
/// set, each active sub-threshold face subtracts one success.
pub fn realize_pool(request: &RollRequest, mut next_face: impl FnMut() -> u32) -> RollOutcome {
    let mut active = Vec::new();
    let mut explosion_count = 0u32;
    let mut remaining = request.dice;

    while remaining > 0 {
        remaining -= 1;
        let value = next_face();
        if request.explode && value == request.faces && explosion_count < MAX_EXPLOSIONS {
            explosion_count += 1;
            remaining += 1;
        } else {
            active.push(value);
        }
    }

    let successes = active.iter().filter(|&&v| v >= request.threshold).count() as i32;
    let failures = active.iter().filter(|&&v| v < request.threshold).count() as i32;

    // Each exploded die is worth its own success plus the extra credit.
    let mut raw_total = 2 * explosion_count as i32 + successes;
    if request.deduct_failures {
        raw_total -= failures;
    }

    let mut results = Vec::with_capacity(explosion_count as usize + active.len());
    for _ in 0..explosion_count {
        results.push(DieResult {
            value: request.faces,
            pseudo: true,
        });
    }
    results.extend(active.iter().map(|&value| DieResult {
        value,
        pseudo: false,
    }));

    RollOutcome::new(results, explosion_count, raw_total, request.deduct_failures)
}

/// The standard evaluator, rolling a [`StdRng`] owned by the caller's session.
#[derive(Debug)]
pub struct PoolEvaluator {
    rng: StdRng,
}

impl PoolEvaluator {
    /// Wrap an rng for pool evaluation.
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl DiceEvaluator for PoolEvaluator {
    fn evaluate(&mut self, request: &RollRequest) -> RollOutcome {
        let faces = request.faces.max(1);
        realize_pool(request, || self.rng.random_range(1..=faces))
    }
}
