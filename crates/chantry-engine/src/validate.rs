//! Feasibility validation of selected traits.
//!
//! Run once per trait reference before a throw is accepted. Validation is
//! all-or-nothing: either every selected trait validates (and the context's
//! totals compute), or the throw is refused in its entirety with a typed
//! reason. The engine never silently drops an invalid trait.

use crate::error::{EngineError, EngineResult};
use crate::settings::{Settings, UntrainedRule};
use crate::trait_ref::{ResolvedTrait, TraitCategory, TraitReference, TraitSource};

/// What a successful validation contributes to the throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitVerdict {
    /// Difficulty penalty contributed by this trait (untrained abilities).
    pub difficulty_penalty: u32,
}

/// Validate one resolved trait against its reference and source record.
///
/// Sphere traits fail with [`EngineError::InsufficientAptitude`] when the
/// resolved value is 0 or a locked override exceeds the trained value.
/// Abilities at value 0 consult the configured untrained rule for their
/// subtype: a penalty digit becomes a difficulty penalty, "forbidden" fails
/// with [`EngineError::InsufficientTraining`] under strict validation only.
///
/// # Errors
///
/// One of the typed reasons above, or [`EngineError::InvalidTrait`] for a
/// structurally malformed reference.
pub fn validate_trait(
    resolved: &ResolvedTrait,
    reference: &TraitReference,
    source: &dyn TraitSource,
    settings: &Settings,
    strict: bool,
) -> EngineResult<TraitVerdict> {
    match resolved.category {
        TraitCategory::Sphere => {
            let trained = source
                .value(&reference.path)
                .ok_or_else(|| EngineError::InvalidTrait {
                    path: reference.path.as_str().to_string(),
                    reason: "not present on record".to_string(),
                })?;
            if resolved.value == 0 {
                return Err(EngineError::InsufficientAptitude {
                    path: reference.path.as_str().to_string(),
                    requested: resolved.value,
                    trained,
                });
            }
            // A rote may not channel more power than the caster possesses.
            match reference.value_override {
                Some(locked) if locked > trained => {
                    return Err(EngineError::InsufficientAptitude {
                        path: reference.path.as_str().to_string(),
                        requested: locked,
                        trained,
                    });
                }
                _ => {}
            }
            Ok(TraitVerdict {
                difficulty_penalty: 0,
            })
        }
        TraitCategory::Ability(kind) if resolved.value == 0 => {
            match settings.untrained_penalties.rule(kind) {
                UntrainedRule::Penalty(digit) => Ok(TraitVerdict {
                    difficulty_penalty: digit,
                }),
                UntrainedRule::Forbidden if strict => Err(EngineError::InsufficientTraining {
                    path: reference.path.as_str().to_string(),
                }),
                UntrainedRule::Forbidden => Ok(TraitVerdict {
                    difficulty_penalty: 0,
                }),
            }
        }
        _ => Ok(TraitVerdict {
            difficulty_penalty: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TraitRegistry;
    use crate::trait_ref::test_support::FakeRecord;
    use crate::trait_ref::{TraitPath, TraitReference};

    fn path(s: &str) -> TraitPath {
        TraitPath::new(s).unwrap()
    }

    fn resolve(
        reference: &TraitReference,
        record: &FakeRecord,
    ) -> ResolvedTrait {
        reference.resolve(record, &TraitRegistry::new()).unwrap()
    }

    #[test]
    fn sphere_at_zero_fails() {
        let mut record = FakeRecord::default();
        record.values.insert("spheres.time".to_string(), 0);
        let reference = TraitReference::new(path("spheres.time"));
        let resolved = resolve(&reference, &record);
        let err =
            validate_trait(&resolved, &reference, &record, &Settings::default(), false).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientAptitude { .. }));
    }

    #[test]
    fn override_above_trained_fails() {
        let mut record = FakeRecord::default();
        record.values.insert("spheres.forces".to_string(), 2);
        let reference = TraitReference::new(path("spheres.forces")).with_override(4);
        let resolved = resolve(&reference, &record);
        let err =
            validate_trait(&resolved, &reference, &record, &Settings::default(), true).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientAptitude {
                path: "spheres.forces".to_string(),
                requested: 4,
                trained: 2,
            }
        );
    }

    #[test]
    fn override_below_trained_passes() {
        let mut record = FakeRecord::default();
        record.values.insert("spheres.forces".to_string(), 4);
        let reference = TraitReference::new(path("spheres.forces")).with_override(2);
        let resolved = resolve(&reference, &record);
        let verdict =
            validate_trait(&resolved, &reference, &record, &Settings::default(), true).unwrap();
        assert_eq!(verdict.difficulty_penalty, 0);
    }

    #[test]
    fn untrained_ability_yields_penalty_digit() {
        let mut record = FakeRecord::default();
        record.values.insert("abilities.skills.melee".to_string(), 0);
        let settings = Settings::default().with_untrained_penalties("021").unwrap();
        let reference = TraitReference::new(path("abilities.skills.melee"));
        let resolved = resolve(&reference, &record);
        let verdict = validate_trait(&resolved, &reference, &record, &settings, true).unwrap();
        assert_eq!(verdict.difficulty_penalty, 2);
    }

    #[test]
    fn forbidden_untrained_fails_only_when_strict() {
        let mut record = FakeRecord::default();
        record
            .values
            .insert("abilities.knowledges.occult".to_string(), 0);
        let settings = Settings::default().with_untrained_penalties("01X").unwrap();
        let reference = TraitReference::new(path("abilities.knowledges.occult"));
        let resolved = resolve(&reference, &record);

        let err = validate_trait(&resolved, &reference, &record, &settings, true).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientTraining {
                path: "abilities.knowledges.occult".to_string(),
            }
        );

        let verdict = validate_trait(&resolved, &reference, &record, &settings, false).unwrap();
        assert_eq!(verdict.difficulty_penalty, 0);
    }

    #[test]
    fn trained_ability_contributes_nothing() {
        let mut record = FakeRecord::default();
        record.values.insert("abilities.talents.brawl".to_string(), 3);
        let reference = TraitReference::new(path("abilities.talents.brawl"));
        let resolved = resolve(&reference, &record);
        let verdict =
            validate_trait(&resolved, &reference, &record, &Settings::default(), true).unwrap();
        assert_eq!(verdict.difficulty_penalty, 0);
    }

    #[test]
    fn attribute_at_zero_is_fine() {
        let mut record = FakeRecord::default();
        record
            .values
            .insert("attributes.physical.strength".to_string(), 0);
        let reference = TraitReference::new(path("attributes.physical.strength"));
        let resolved = resolve(&reference, &record);
        assert!(
            validate_trait(&resolved, &reference, &record, &Settings::default(), true).is_ok()
        );
    }
}
