//! The resolution context: working state for one in-progress throw.
//!
//! A [`ResolutionContext`] is built from a [`ThrowDefinition`] by resolving
//! and validating every selected trait against the character (and, for
//! item-backed traits, the owning item). It owns the pool and difficulty
//! math: every mutation recomputes the cached totals synchronously, so a
//! reader never observes stale state. The context is single-owner; it is
//! discarded or rebuilt after a roll completes.

use crate::dice::{DIE_FACES, RollRequest, ThrowMode};
use crate::error::{EngineError, EngineResult};
use crate::outcome::{InterpretedRoll, interpret};
use crate::registry::TraitRegistry;
use crate::settings::Settings;
use crate::throw::{ThrowDefinition, ThrowKind};
use crate::trait_ref::{ResolvedTrait, TraitSource};
use crate::validate::validate_trait;

/// Named dice-pool modifiers, summed into the pool total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolMods {
    /// Free user adjustment.
    pub user: i32,
    /// Negative of the character's wound penalty, when applicable.
    pub health: i32,
    /// Anything else the caller wires in (equipment, scene effects).
    pub other: i32,
}

impl PoolMods {
    fn sum(self) -> i32 {
        self.user + self.health + self.other
    }
}

/// Named difficulty modifiers, summed into the difficulty total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyMods {
    /// Free user adjustment.
    pub user: i32,
    /// Sum of untrained-ability penalty digits.
    pub untrained: i32,
}

impl DifficultyMods {
    fn sum(self) -> i32 {
        self.user + self.untrained
    }
}

/// Flat success modifiers, independent of the dice.
///
/// Kept in separate bonus and malus buckets purely for display; both are
/// added to the numeric total after dice evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuccessMods {
    /// Non-negative bonus bucket.
    pub bonus: i32,
    /// Non-positive malus bucket.
    pub malus: i32,
}

/// Lower clamp of the difficulty total.
pub const MIN_DIFFICULTY: u32 = 3;
/// Upper clamp of the difficulty total.
pub const MAX_DIFFICULTY: u32 = 9;

/// Mutable working state for one in-progress throw.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    name: String,
    kind: ThrowKind,
    traits: Vec<ResolvedTrait>,
    magical: bool,
    effect: bool,
    rote: bool,
    aptitude_base: u32,
    difficulty_base: u32,
    pool_mods: PoolMods,
    difficulty_mods: DifficultyMods,
    success_mods: SuccessMods,
    mode: ThrowMode,
    difficulty_override: Option<u32>,
    use_specialization: bool,
    settings: Settings,
    pool_total: u32,
    difficulty_total: u32,
}

impl ResolutionContext {
    /// Resolve and validate a throw definition into a ready context.
    ///
    /// Trait references with an owning item resolve through `item`, all
    /// others through `character`. Validation is all-or-nothing: the first
    /// failing trait refuses the whole throw.
    ///
    /// # Errors
    ///
    /// Any of the validation errors from
    /// [`validate_trait`](crate::validate::validate_trait), or
    /// [`EngineError::InvalidTrait`] when an item-backed reference has no
    /// item source to resolve through.
    pub fn build(
        throw: &ThrowDefinition,
        character: &dyn TraitSource,
        item: Option<&dyn TraitSource>,
        registry: &TraitRegistry,
        settings: &Settings,
        strict: bool,
    ) -> EngineResult<Self> {
        if throw.traits().len() > settings.max_throw_traits {
            return Err(EngineError::TraitListFull {
                max: settings.max_throw_traits,
            });
        }

        let mut traits = Vec::with_capacity(throw.traits().len());
        let mut untrained = 0u32;
        for reference in throw.traits() {
            let source: &dyn TraitSource = if reference.owning_item.is_some() {
                item.ok_or_else(|| EngineError::InvalidTrait {
                    path: reference.path.as_str().to_string(),
                    reason: "item-backed trait without an item source".to_string(),
                })?
            } else {
                character
            };
            let resolved = reference.resolve(source, registry)?;
            let verdict = validate_trait(&resolved, reference, source, settings, strict)?;
            untrained += verdict.difficulty_penalty;
            traits.push(resolved);
        }

        let magical = throw.is_magical(registry);
        let effect = throw.is_effect(registry);

        // An enchanted item's own aptitude powers the throw in place of the
        // wielder's arete.
        let aptitude_base = if magical {
            item.and_then(TraitSource::aptitude)
                .or_else(|| character.aptitude())
                .unwrap_or(0)
        } else {
            0
        };

        let wound = character.wound_penalty();
        let health_applies = settings.health_malus && (!effect || settings.magic_health_malus);
        let health = if health_applies { -(wound as i32) } else { 0 };

        let options = &throw.options;
        let mut context = Self {
            name: throw.name.clone(),
            kind: throw.kind,
            traits,
            magical,
            effect,
            rote: throw.rote,
            aptitude_base,
            difficulty_base: options.difficulty_base.unwrap_or(settings.default_difficulty),
            pool_mods: PoolMods {
                user: options.pool_mod,
                health,
                other: 0,
            },
            difficulty_mods: DifficultyMods {
                user: options.difficulty_mod,
                untrained: untrained as i32,
            },
            success_mods: SuccessMods {
                bonus: options.success_bonus.max(0),
                malus: options.success_malus.min(0),
            },
            mode: ThrowMode::default(),
            difficulty_override: None,
            use_specialization: false,
            settings: settings.clone(),
            pool_total: 0,
            difficulty_total: 0,
        };
        context.recompute();
        Ok(context)
    }

    /// Pure recompute of both totals from current state.
    fn recompute(&mut self) {
        let base = if self.magical {
            self.aptitude_base as i32
        } else {
            self.traits.iter().map(|t| t.value as i32).sum()
        };
        self.pool_total = (base + self.pool_mods.sum()).max(0) as u32;

        self.difficulty_total = match self.difficulty_override {
            Some(value) => value,
            None => {
                let raw = self.difficulty_base as i32 + self.difficulty_mods.sum();
                (raw.max(0) as u32).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
            }
        };
    }

    /// Throw name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Throw kind.
    pub fn kind(&self) -> ThrowKind {
        self.kind
    }

    /// The resolved traits, in selection order.
    pub fn traits(&self) -> &[ResolvedTrait] {
        &self.traits
    }

    /// Whether the pool base comes from the magical aptitude score.
    pub fn is_magical(&self) -> bool {
        self.magical
    }

    /// Whether this throw carries backlash risk.
    pub fn is_effect(&self) -> bool {
        self.effect
    }

    /// Whether this throw replays a pre-scripted rote.
    pub fn is_rote(&self) -> bool {
        self.rote
    }

    /// The effect's power level: the highest resolved value among its traits.
    pub fn effect_level(&self) -> u32 {
        self.traits.iter().map(|t| t.value).max().unwrap_or(0)
    }

    /// Current dice-pool total. Never negative; clamped at 0.
    pub fn dice_pool_total(&self) -> u32 {
        self.pool_total
    }

    /// Current difficulty total. Clamped to 3..=9 unless overridden.
    pub fn difficulty_total(&self) -> u32 {
        self.difficulty_total
    }

    /// Current pool modifiers.
    pub fn pool_mods(&self) -> PoolMods {
        self.pool_mods
    }

    /// Current difficulty modifiers.
    pub fn difficulty_mods(&self) -> DifficultyMods {
        self.difficulty_mods
    }

    /// Current success modifiers.
    pub fn success_mods(&self) -> SuccessMods {
        self.success_mods
    }

    /// Current throw-mode flags.
    pub fn mode(&self) -> ThrowMode {
        self.mode
    }

    /// Set the user dice-pool modifier.
    pub fn set_user_pool_mod(&mut self, value: i32) {
        self.pool_mods.user = value;
        self.recompute();
    }

    /// Set the catch-all dice-pool modifier.
    pub fn set_other_pool_mod(&mut self, value: i32) {
        self.pool_mods.other = value;
        self.recompute();
    }

    /// Set the user difficulty modifier.
    pub fn set_user_difficulty_mod(&mut self, value: i32) {
        self.difficulty_mods.user = value;
        self.recompute();
    }

    /// Set the flat success bonus (clamped non-negative).
    pub fn set_success_bonus(&mut self, value: i32) {
        self.success_mods.bonus = value.max(0);
        self.recompute();
    }

    /// Set the flat success malus (clamped non-positive).
    pub fn set_success_malus(&mut self, value: i32) {
        self.success_mods.malus = value.min(0);
        self.recompute();
    }

    /// Set or clear the difficulty override. An override is used exactly,
    /// bypassing the 3..=9 clamp.
    pub fn set_difficulty_override(&mut self, value: Option<u32>) {
        self.difficulty_override = value;
        self.recompute();
    }

    /// Replace the throw-mode flags.
    pub fn set_mode(&mut self, mode: ThrowMode) {
        self.mode = mode;
        self.recompute();
    }

    /// Opt in or out of using a trait's specialization for this roll.
    pub fn set_use_specialization(&mut self, enabled: bool) {
        self.use_specialization = enabled;
        self.recompute();
    }

    /// Whether this roll actually uses a specialization: the per-roll opt-in
    /// is set and at least one trait qualifies.
    pub fn uses_specialization(&self) -> bool {
        self.use_specialization && self.traits.iter().any(ResolvedTrait::can_use_specialization)
    }

    /// Commit the throw, producing the request handed to the dice evaluator.
    ///
    /// Ten-explosion turns on when the per-roll flag asks for it, or
    /// automatically for specialized and rote throws when the corresponding
    /// world setting allows.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyPool`] when the pool total is 0.
    pub fn commit(&self) -> EngineResult<RollRequest> {
        if self.pool_total == 0 {
            return Err(EngineError::EmptyPool);
        }
        let explode = self.mode.contains(ThrowMode::EXPLODE_SUCCESS)
            || (self.uses_specialization() && self.settings.specialization_explodes)
            || (self.rote && self.settings.rote_explodes);
        let request = RollRequest {
            dice: self.pool_total,
            faces: DIE_FACES,
            threshold: self.difficulty_total,
            explode,
            deduct_failures: self.mode.contains(ThrowMode::DEDUCT_FAILURES),
        };
        tracing::debug!(
            throw = %self.name,
            pool = self.pool_total,
            difficulty = self.difficulty_total,
            explode,
            deduct = request.deduct_failures,
            "throw committed"
        );
        Ok(request)
    }

    /// Fold success modifiers into an evaluated outcome and classify it.
    pub fn interpret(&self, outcome: &crate::dice::RollOutcome) -> InterpretedRoll {
        interpret(
            outcome,
            self.success_mods.bonus,
            self.success_mods.malus,
            self.mode,
        )
    }
}
