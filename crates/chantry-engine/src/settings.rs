//! Immutable world-settings snapshot.
//!
//! The engine never reads configuration from a global; the host builds a
//! [`Settings`] once (from whatever storage it owns) and passes it in
//! explicitly. Trait-name discovery lives in the separate
//! [`TraitRegistry`](crate::registry::TraitRegistry), not here.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::trait_ref::AbilityKind;

/// Difficulty penalty configured for rolling an untrained ability subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UntrainedRule {
    /// Rolling untrained adds this to the difficulty.
    Penalty(u32),
    /// Rolling untrained is not allowed under strict validation.
    Forbidden,
}

/// Per-subtype untrained penalties, parsed from a 3-slot digit string.
///
/// One slot per ability subtype, in the order talents, skills, knowledges.
/// A digit is the difficulty penalty for rolling that subtype untrained;
/// any other character means "forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntrainedPenalties {
    talents: UntrainedRule,
    skills: UntrainedRule,
    knowledges: UntrainedRule,
}

impl UntrainedPenalties {
    /// Parse a penalty string like `"01X"` (talent +0, skill +1, knowledge forbidden).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the string is not exactly
    /// three characters.
    pub fn parse(s: &str) -> EngineResult<Self> {
        let slots: Vec<UntrainedRule> = s
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => UntrainedRule::Penalty(d),
                None => UntrainedRule::Forbidden,
            })
            .collect();
        match slots.as_slice() {
            [talents, skills, knowledges] => Ok(Self {
                talents: *talents,
                skills: *skills,
                knowledges: *knowledges,
            }),
            _ => Err(EngineError::InvalidConfig(format!(
                "untrained penalty string must have exactly 3 slots, got '{s}'"
            ))),
        }
    }

    /// The rule for one ability subtype.
    pub fn rule(&self, kind: AbilityKind) -> UntrainedRule {
        match kind {
            AbilityKind::Talent => self.talents,
            AbilityKind::Skill => self.skills,
            AbilityKind::Knowledge => self.knowledges,
        }
    }
}

impl Default for UntrainedPenalties {
    /// Talents free, skills +1 difficulty, knowledges forbidden.
    fn default() -> Self {
        Self {
            talents: UntrainedRule::Penalty(0),
            skills: UntrainedRule::Penalty(1),
            knowledges: UntrainedRule::Forbidden,
        }
    }
}

/// Immutable snapshot of world-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base difficulty before modifiers.
    pub default_difficulty: u32,
    /// Penalties for rolling untrained abilities.
    pub untrained_penalties: UntrainedPenalties,
    /// Apply the character's wound penalty to dice pools.
    pub health_malus: bool,
    /// Apply the wound penalty to magical-effect throws as well.
    pub magic_health_malus: bool,
    /// Specialized traits explode tens.
    pub specialization_explodes: bool,
    /// Rote throws explode tens.
    pub rote_explodes: bool,
    /// Upper clamp for a character's accumulated backlash points.
    pub max_backlash: u32,
    /// Maximum number of traits in one throw.
    pub max_throw_traits: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_difficulty: 6,
            untrained_penalties: UntrainedPenalties::default(),
            health_malus: true,
            magic_health_malus: true,
            specialization_explodes: true,
            rote_explodes: false,
            max_backlash: 20,
            max_throw_traits: 9,
        }
    }
}

impl Settings {
    /// Set the base difficulty.
    pub fn with_default_difficulty(mut self, difficulty: u32) -> Self {
        self.default_difficulty = difficulty;
        self
    }

    /// Set the untrained penalties from a 3-slot string.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the string is malformed.
    pub fn with_untrained_penalties(mut self, s: &str) -> EngineResult<Self> {
        self.untrained_penalties = UntrainedPenalties::parse(s)?;
        Ok(self)
    }

    /// Toggle the global health malus.
    pub fn with_health_malus(mut self, enabled: bool) -> Self {
        self.health_malus = enabled;
        self
    }

    /// Toggle the health malus for magical-effect throws.
    pub fn with_magic_health_malus(mut self, enabled: bool) -> Self {
        self.magic_health_malus = enabled;
        self
    }

    /// Toggle ten-explosion for specialized traits.
    pub fn with_specialization_explodes(mut self, enabled: bool) -> Self {
        self.specialization_explodes = enabled;
        self
    }

    /// Toggle ten-explosion for rote throws.
    pub fn with_rote_explodes(mut self, enabled: bool) -> Self {
        self.rote_explodes = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert_eq!(s.default_difficulty, 6);
        assert_eq!(s.max_backlash, 20);
        assert_eq!(s.max_throw_traits, 9);
        assert!(s.health_malus);
    }

    #[test]
    fn parse_penalties() {
        let p = UntrainedPenalties::parse("02X").unwrap();
        assert_eq!(p.rule(AbilityKind::Talent), UntrainedRule::Penalty(0));
        assert_eq!(p.rule(AbilityKind::Skill), UntrainedRule::Penalty(2));
        assert_eq!(p.rule(AbilityKind::Knowledge), UntrainedRule::Forbidden);
    }

    #[test]
    fn parse_penalties_wrong_length() {
        assert!(matches!(
            UntrainedPenalties::parse("0123"),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            UntrainedPenalties::parse(""),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn builder_methods() {
        let s = Settings::default()
            .with_default_difficulty(7)
            .with_health_malus(false)
            .with_rote_explodes(true);
        assert_eq!(s.default_difficulty, 7);
        assert!(!s.health_malus);
        assert!(s.rote_explodes);
    }

    #[test]
    fn serde_round_trip() {
        let s = Settings::default()
            .with_untrained_penalties("1XX")
            .unwrap()
            .with_magic_health_malus(false);
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
