//! Trait references and their resolution against a character or item record.
//!
//! A [`TraitReference`] is an immutable pointer into a record's trait tree:
//! a dot-separated category path, an optional owning-item id, and an optional
//! value override (a rote may lock an effect trait below the caster's trained
//! maximum). It resolves, through the read-only [`TraitSource`] collaborator,
//! to a current numeric value, a display name, and specialization data.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::registry::TraitRegistry;

/// Ability subtypes, each with its own untrained-penalty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Innate aptitudes (alertness, brawl, ...).
    Talent,
    /// Trained practices (melee, drive, ...).
    Skill,
    /// Learned subjects (occult, medicine, ...).
    Knowledge,
}

/// The closed set of trait categories the engine distinguishes.
///
/// Categories are fixed by configuration, not user-extensible at runtime;
/// anything unrecognized is [`TraitCategory::Other`] and participates only
/// in plain trait-sum pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitCategory {
    /// Physical/social/mental attributes.
    Attribute,
    /// Abilities, split by subtype.
    Ability(
        /// Which of the three ability subtypes.
        AbilityKind,
    ),
    /// Magical-aptitude traits (the "spheres").
    Sphere,
    /// The base magical-aptitude score itself.
    Arete,
    /// Any other numeric trait (backgrounds, custom traits, ...).
    Other,
}

impl TraitCategory {
    /// Returns true for sphere traits (the magical-aptitude category).
    pub fn is_sphere(self) -> bool {
        matches!(self, Self::Sphere)
    }

    /// Returns true for ability traits of any subtype.
    pub fn is_ability(self) -> bool {
        matches!(self, Self::Ability(_))
    }
}

/// Opaque identifier of an owned item, assigned by the hosting document layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(
    /// The host-assigned id string.
    pub String,
);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dot-separated path into a record's trait tree.
///
/// The first segment names the category (`attributes`, `abilities`,
/// `spheres`, `arete`); for abilities the second segment names the subtype.
/// The path is unique within one record's tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitPath(String);

impl TraitPath {
    /// Create a path, rejecting empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTrait`] if `path` is empty.
    pub fn new(path: impl Into<String>) -> EngineResult<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(EngineError::InvalidTrait {
                path,
                reason: "path is empty".to_string(),
            });
        }
        Ok(Self(path))
    }

    /// The full dot-separated path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment (the trait's own key).
    pub fn key(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Classify the path by its leading segments.
    ///
    /// Unknown leading segments classify as [`TraitCategory::Other`]; the
    /// [`TraitRegistry`](crate::registry::TraitRegistry) can override this
    /// for custom content.
    pub fn category(&self) -> TraitCategory {
        let mut segments = self.0.split('.');
        match segments.next() {
            Some("attributes") => TraitCategory::Attribute,
            Some("abilities") => match segments.next() {
                Some("talents") => TraitCategory::Ability(AbilityKind::Talent),
                Some("skills") => TraitCategory::Ability(AbilityKind::Skill),
                Some("knowledges") => TraitCategory::Ability(AbilityKind::Knowledge),
                _ => TraitCategory::Other,
            },
            Some("spheres") => TraitCategory::Sphere,
            Some("arete") => TraitCategory::Arete,
            _ => TraitCategory::Other,
        }
    }
}

impl std::fmt::Display for TraitPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only view over a record's (character's or owned item's) traits.
///
/// Resolution never mutates the source record; every read is fresh.
pub trait TraitSource {
    /// Current numeric value of the trait at `path`, if it exists.
    fn value(&self, path: &TraitPath) -> Option<u32>;

    /// Owner-chosen alias for the trait, if one was set.
    fn alias(&self, path: &TraitPath) -> Option<String>;

    /// Specialization text for the trait, if any.
    fn specialization(&self, path: &TraitPath) -> Option<String>;

    /// The record's own magical-aptitude ("arete") score, if it has one.
    ///
    /// Enchanted items carry their own score, which takes precedence over
    /// the wielder's when they power an effect throw.
    fn aptitude(&self) -> Option<u32>;

    /// The record's current wound penalty (0 when unhurt or not applicable).
    fn wound_penalty(&self) -> u32;
}

/// An immutable reference to one selected trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitReference {
    /// Path into the trait tree.
    pub path: TraitPath,
    /// Set when the trait is backed by an owned item rather than the sheet.
    pub owning_item: Option<ItemId>,
    /// Locks the effect trait to a level below the trained maximum.
    pub value_override: Option<u32>,
}

impl TraitReference {
    /// Reference a trait on the character sheet.
    pub fn new(path: TraitPath) -> Self {
        Self {
            path,
            owning_item: None,
            value_override: None,
        }
    }

    /// Reference a trait backed by an owned item.
    pub fn item_backed(path: TraitPath, item: ItemId) -> Self {
        Self {
            path,
            owning_item: Some(item),
            value_override: None,
        }
    }

    /// Lock the reference to a fixed level.
    pub fn with_override(mut self, value: u32) -> Self {
        self.value_override = Some(value);
        self
    }

    /// Resolve this reference against a source record.
    ///
    /// The override wins when present; the display name falls back in order
    /// alias → registry default → raw path key.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTrait`] if the path does not exist on
    /// the source.
    pub fn resolve(
        &self,
        source: &dyn TraitSource,
        registry: &TraitRegistry,
    ) -> EngineResult<ResolvedTrait> {
        let looked_up = source
            .value(&self.path)
            .ok_or_else(|| EngineError::InvalidTrait {
                path: self.path.as_str().to_string(),
                reason: "not present on record".to_string(),
            })?;
        let value = self.value_override.unwrap_or(looked_up);
        let display_name = source
            .alias(&self.path)
            .or_else(|| registry.display_name(&self.path).map(String::from))
            .unwrap_or_else(|| self.path.key().to_string());
        Ok(ResolvedTrait {
            path: self.path.clone(),
            category: registry.category(&self.path),
            display_name,
            value,
            specialization: source.specialization(&self.path),
        })
    }
}

/// A trait reference resolved to concrete values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTrait {
    /// The originating path.
    pub path: TraitPath,
    /// Category, as classified at resolution time.
    pub category: TraitCategory,
    /// Name shown in formulas and breakdowns.
    pub display_name: String,
    /// Effective numeric value (override applied).
    pub value: u32,
    /// Specialization text, if the trait has one.
    pub specialization: Option<String>,
}

impl ResolvedTrait {
    /// A trait can use its specialization at value 4+ with non-empty text.
    ///
    /// Actually *using* it additionally requires the per-roll opt-in on the
    /// resolution context.
    pub fn can_use_specialization(&self) -> bool {
        self.value >= 4
            && self
                .specialization
                .as_deref()
                .is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory record implementations shared across module tests.

    use std::collections::HashMap;

    use super::{TraitPath, TraitSource};

    /// Minimal in-memory record for tests.
    #[derive(Default)]
    pub(crate) struct FakeRecord {
        pub values: HashMap<String, u32>,
        pub aliases: HashMap<String, String>,
        pub specializations: HashMap<String, String>,
        pub aptitude: Option<u32>,
        pub wound_penalty: u32,
    }

    impl FakeRecord {
        /// Set a trait value, returning self for chaining.
        pub fn with_value(mut self, path: &str, value: u32) -> Self {
            self.values.insert(path.to_string(), value);
            self
        }
    }

    impl TraitSource for FakeRecord {
        fn value(&self, path: &TraitPath) -> Option<u32> {
            self.values.get(path.as_str()).copied()
        }
        fn alias(&self, path: &TraitPath) -> Option<String> {
            self.aliases.get(path.as_str()).cloned()
        }
        fn specialization(&self, path: &TraitPath) -> Option<String> {
            self.specializations.get(path.as_str()).cloned()
        }
        fn aptitude(&self) -> Option<u32> {
            self.aptitude
        }
        fn wound_penalty(&self) -> u32 {
            self.wound_penalty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FakeRecord;
    use super::*;
    use crate::registry::TraitRegistry;

    fn path(s: &str) -> TraitPath {
        TraitPath::new(s).unwrap()
    }

    #[test]
    fn empty_path_rejected() {
        assert!(matches!(
            TraitPath::new(""),
            Err(EngineError::InvalidTrait { .. })
        ));
    }

    #[test]
    fn category_classification() {
        assert_eq!(
            path("attributes.physical.strength").category(),
            TraitCategory::Attribute
        );
        assert_eq!(
            path("abilities.talents.alertness").category(),
            TraitCategory::Ability(AbilityKind::Talent)
        );
        assert_eq!(
            path("abilities.knowledges.occult").category(),
            TraitCategory::Ability(AbilityKind::Knowledge)
        );
        assert_eq!(path("spheres.forces").category(), TraitCategory::Sphere);
        assert_eq!(path("arete").category(), TraitCategory::Arete);
        assert_eq!(path("backgrounds.avatar").category(), TraitCategory::Other);
    }

    #[test]
    fn key_is_last_segment() {
        assert_eq!(path("abilities.skills.melee").key(), "melee");
        assert_eq!(path("arete").key(), "arete");
    }

    #[test]
    fn resolve_uses_looked_up_value() {
        let mut record = FakeRecord::default();
        record.values.insert("spheres.forces".to_string(), 3);
        let registry = TraitRegistry::new();
        let resolved = TraitReference::new(path("spheres.forces"))
            .resolve(&record, &registry)
            .unwrap();
        assert_eq!(resolved.value, 3);
        assert_eq!(resolved.category, TraitCategory::Sphere);
        assert_eq!(resolved.display_name, "forces");
    }

    #[test]
    fn resolve_override_wins() {
        let mut record = FakeRecord::default();
        record.values.insert("spheres.forces".to_string(), 3);
        let registry = TraitRegistry::new();
        let resolved = TraitReference::new(path("spheres.forces"))
            .with_override(2)
            .resolve(&record, &registry)
            .unwrap();
        assert_eq!(resolved.value, 2);
    }

    #[test]
    fn resolve_missing_trait_fails() {
        let record = FakeRecord::default();
        let registry = TraitRegistry::new();
        let err = TraitReference::new(path("spheres.forces"))
            .resolve(&record, &registry)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTrait { .. }));
    }

    #[test]
    fn display_name_fallback_order() {
        let mut record = FakeRecord::default();
        record.values.insert("spheres.forces".to_string(), 3);
        let mut registry = TraitRegistry::new();
        registry.register(path("spheres.forces"), "Forces", TraitCategory::Sphere);

        // Registry name beats the raw key.
        let resolved = TraitReference::new(path("spheres.forces"))
            .resolve(&record, &registry)
            .unwrap();
        assert_eq!(resolved.display_name, "Forces");

        // Alias beats the registry name.
        record
            .aliases
            .insert("spheres.forces".to_string(), "Elemental Mastery".to_string());
        let resolved = TraitReference::new(path("spheres.forces"))
            .resolve(&record, &registry)
            .unwrap();
        assert_eq!(resolved.display_name, "Elemental Mastery");
    }

    #[test]
    fn specialization_gate() {
        let base = ResolvedTrait {
            path: path("abilities.skills.melee"),
            category: TraitCategory::Ability(AbilityKind::Skill),
            display_name: "Melee".to_string(),
            value: 4,
            specialization: Some("Swords".to_string()),
        };
        assert!(base.can_use_specialization());

        let low = ResolvedTrait { value: 3, ..base.clone() };
        assert!(!low.can_use_specialization());

        let blank = ResolvedTrait {
            specialization: Some(String::new()),
            ..base.clone()
        };
        assert!(!blank.can_use_specialization());

        let none = ResolvedTrait {
            specialization: None,
            ..base
        };
        assert!(!none.can_use_specialization());
    }

    #[test]
    fn reference_serde_round_trip() {
        let reference = TraitReference::item_backed(
            path("spheres.life"),
            ItemId("wand-01".to_string()),
        )
        .with_override(2);
        let json = serde_json::to_string(&reference).unwrap();
        let back: TraitReference = serde_json::from_str(&json).unwrap();
        assert_eq!(reference, back);
    }
}
