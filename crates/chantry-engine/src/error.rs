//! Error types for the dice resolution engine.

/// Errors that can occur while building, validating, or committing a throw.
///
/// All variants are expected, recoverable conditions surfaced to the caller;
/// none are process-fatal. Each carries enough structured detail (which trait,
/// which limit) for the caller to produce user-facing messaging without
/// re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A trait reference could not be resolved or is structurally malformed.
    #[error("invalid trait '{path}': {reason}")]
    InvalidTrait {
        /// The offending trait path.
        path: String,
        /// Why the reference was rejected.
        reason: String,
    },

    /// A magical-aptitude trait resolved to 0, or a locked override exceeds
    /// the character's actual trained value.
    #[error("insufficient aptitude in '{path}': requested {requested}, trained {trained}")]
    InsufficientAptitude {
        /// The sphere trait path.
        path: String,
        /// The level the throw asked for.
        requested: u32,
        /// The level the character actually possesses.
        trained: u32,
    },

    /// An untrained ability is configured as strictly forbidden for this throw.
    #[error("untrained ability '{path}' may not be rolled")]
    InsufficientTraining {
        /// The ability trait path.
        path: String,
    },

    /// The computed dice-pool total is zero at commit time.
    #[error("dice pool is empty")]
    EmptyPool,

    /// A mutation was attempted on a pinned (locked) throw definition.
    #[error("throw is locked")]
    ThrowLocked,

    /// Adding a trait would exceed the maximum trait count.
    #[error("throw already holds the maximum of {max} traits")]
    TraitListFull {
        /// The configured maximum.
        max: usize,
    },

    /// A settings value is malformed (e.g. a bad untrained-penalty string).
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
