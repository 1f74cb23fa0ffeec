//! Structured roll reports for the external reporting collaborator.
//!
//! The engine hands the sink plain structured data plus whatever
//! pre-localized flavor text it was given; it formats no markup of its own.

use serde::{Deserialize, Serialize};

use crate::context::ResolutionContext;
use crate::dice::{DieResult, RollOutcome, RollRequest};
use crate::outcome::{InterpretedRoll, TotalKind};

/// One labeled value in the tooltip breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// What the value is (trait name, modifier name).
    pub label: String,
    /// The signed contribution.
    pub value: i32,
}

impl std::fmt::Display for BreakdownLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.value >= 0 {
            write!(f, "{} +{}", self.label, self.value)
        } else {
            write!(f, "{} {}", self.label, self.value)
        }
    }
}

/// The structured result handed to the report sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollReport {
    /// Pre-localized flavor text supplied by the caller.
    pub flavor_text: String,
    /// Human-readable formula, e.g. `"5d10 \u{2265} 6"`.
    pub formula_text: String,
    /// Displayed die results, pseudo-dice included.
    pub dice: Vec<DieResult>,
    /// Final numeric total.
    pub total: i32,
    /// Classification of the total.
    pub total_kind: TotalKind,
    /// Labeled contributions for the tooltip.
    pub breakdown: Vec<BreakdownLine>,
}

impl RollReport {
    /// Assemble a report from a resolved throw.
    pub fn compose(
        context: &ResolutionContext,
        request: &RollRequest,
        outcome: &RollOutcome,
        interpreted: InterpretedRoll,
        flavor_text: impl Into<String>,
    ) -> Self {
        let mut breakdown = Vec::new();
        for resolved in context.traits() {
            breakdown.push(BreakdownLine {
                label: resolved.display_name.clone(),
                value: resolved.value as i32,
            });
        }
        let pool = context.pool_mods();
        push_if_nonzero(&mut breakdown, "Pool (user)", pool.user);
        push_if_nonzero(&mut breakdown, "Pool (health)", pool.health);
        push_if_nonzero(&mut breakdown, "Pool (other)", pool.other);
        let difficulty = context.difficulty_mods();
        push_if_nonzero(&mut breakdown, "Difficulty (user)", difficulty.user);
        push_if_nonzero(&mut breakdown, "Difficulty (untrained)", difficulty.untrained);
        let success = context.success_mods();
        push_if_nonzero(&mut breakdown, "Successes (bonus)", success.bonus);
        push_if_nonzero(&mut breakdown, "Successes (malus)", success.malus);
        if outcome.willpower_spent() {
            breakdown.push(BreakdownLine {
                label: "Willpower".to_string(),
                value: 1,
            });
        }

        Self {
            flavor_text: flavor_text.into(),
            formula_text: request.to_string(),
            dice: outcome.results.clone(),
            total: interpreted.total,
            total_kind: interpreted.kind,
            breakdown,
        }
    }
}

fn push_if_nonzero(lines: &mut Vec<BreakdownLine>, label: &str, value: i32) {
    if value != 0 {
        lines.push(BreakdownLine {
            label: label.to_string(),
            value,
        });
    }
}

/// Receives finished roll reports for display.
///
/// Delivery happens after evaluation and interpretation have completed;
/// the engine never reports a roll it has not fully resolved.
pub trait ReportSink {
    /// Deliver one finished report.
    fn deliver(&mut self, report: &RollReport);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResolutionContext;
    use crate::registry::TraitRegistry;
    use crate::settings::Settings;
    use crate::throw::{ThrowDefinition, ThrowKind};
    use crate::trait_ref::test_support::FakeRecord;
    use crate::trait_ref::{TraitPath, TraitReference};

    struct CollectingSink(Vec<RollReport>);

    impl ReportSink for CollectingSink {
        fn deliver(&mut self, report: &RollReport) {
            self.0.push(report.clone());
        }
    }

    fn context() -> ResolutionContext {
        let mut throw = ThrowDefinition::new("Punch", ThrowKind::Free);
        throw
            .add_trait(TraitReference::new(
                TraitPath::new("abilities.talents.brawl").unwrap(),
            ))
            .unwrap();
        let record = FakeRecord::default().with_value("abilities.talents.brawl", 3);
        ResolutionContext::build(
            &throw,
            &record,
            None,
            &TraitRegistry::new(),
            &Settings::default(),
            true,
        )
        .unwrap()
    }

    #[test]
    fn compose_collects_breakdown_and_formula() {
        let mut context = context();
        context.set_user_pool_mod(2);
        context.set_success_bonus(1);
        let request = context.commit().unwrap();
        let outcome = RollOutcome::new(
            vec![
                DieResult { value: 8, pseudo: false },
                DieResult { value: 3, pseudo: false },
            ],
            0,
            1,
            false,
        );
        let interpreted = context.interpret(&outcome);

        let report = RollReport::compose(&context, &request, &outcome, interpreted, "Punch!");
        assert_eq!(report.formula_text, "5d10 \u{2265} 6");
        assert_eq!(report.total, 2);
        assert_eq!(report.total_kind, TotalKind::Success(2));
        assert_eq!(report.dice.len(), 2);

        let labels: Vec<&str> = report.breakdown.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["brawl", "Pool (user)", "Successes (bonus)"]);
    }

    #[test]
    fn sink_receives_report() {
        let context = context();
        let request = context.commit().unwrap();
        let outcome = RollOutcome::new(vec![], 0, 0, false);
        let report =
            RollReport::compose(&context, &request, &outcome, context.interpret(&outcome), "");
        let mut sink = CollectingSink(Vec::new());
        sink.deliver(&report);
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].total_kind, TotalKind::Failure);
    }

    #[test]
    fn breakdown_line_display() {
        let plus = BreakdownLine { label: "Pool (user)".to_string(), value: 2 };
        let minus = BreakdownLine { label: "Pool (health)".to_string(), value: -1 };
        assert_eq!(plus.to_string(), "Pool (user) +2");
        assert_eq!(minus.to_string(), "Pool (health) -1");
    }

    #[test]
    fn report_serde_round_trip() {
        let context = context();
        let request = context.commit().unwrap();
        let outcome = RollOutcome::new(vec![DieResult { value: 10, pseudo: true }], 1, 2, false);
        let report = RollReport::compose(
            &context,
            &request,
            &outcome,
            context.interpret(&outcome),
            "flavor",
        );
        let json = serde_json::to_string(&report).unwrap();
        let back: RollReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }
}
