//! Dice resolution engine for a storyteller-style d10 pool system.
//!
//! Turns a set of selected character traits into a dice pool and difficulty
//! threshold, resolves the exploding-success pool mechanic, validates
//! whether a throw is legal, and, for magical-effect throws, computes the
//! paradox backlash from the result. The sheet/UI layer, persistence,
//! localization, and chat formatting are external collaborators reached
//! through the narrow traits defined here ([`TraitSource`],
//! [`DiceEvaluator`], [`CharacterRecord`], [`ReportSink`]).

pub mod context;
pub mod dice;
pub mod error;
pub mod outcome;
pub mod paradox;
pub mod registry;
pub mod report;
pub mod settings;
pub mod throw;
pub mod trait_ref;
pub mod validate;

pub use context::{DifficultyMods, PoolMods, ResolutionContext, SuccessMods};
pub use dice::{DiceEvaluator, DieResult, PoolEvaluator, RollOutcome, RollRequest, ThrowMode};
pub use error::{EngineError, EngineResult};
pub use outcome::{InterpretedRoll, TotalKind, interpret};
pub use paradox::{
    CharacterRecord, FeedbackOutcome, RiskCategory, apply_feedback, backlash_gain,
    confirm_backlash, feedback_roll,
};
pub use registry::TraitRegistry;
pub use report::{BreakdownLine, ReportSink, RollReport};
pub use settings::{Settings, UntrainedPenalties, UntrainedRule};
pub use throw::{ThrowDefinition, ThrowKind, ThrowOptions};
pub use trait_ref::{
    AbilityKind, ItemId, ResolvedTrait, TraitCategory, TraitPath, TraitReference, TraitSource,
};
pub use validate::{TraitVerdict, validate_trait};
