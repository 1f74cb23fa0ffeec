//! Throw definitions: the reusable recipe for a roll.
//!
//! A [`ThrowDefinition`] is a named, ordered collection of trait references
//! plus default modifier values. It is created ad hoc for one-off rolls or
//! persisted as part of an owned item (an attack, a rote) and rehydrated on
//! load. The trait list is mutated only through the explicit operations here,
//! which fail fast with [`EngineError::ThrowLocked`] while the throw is
//! pinned for replay.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::registry::TraitRegistry;
use crate::trait_ref::{TraitCategory, TraitReference};

/// What kind of roll a throw definition drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrowKind {
    /// A one-off roll assembled in the UI.
    Free,
    /// A throw stored on an owned item (attack, power).
    Item,
    /// A magical-effect throw (rote or spontaneous effect).
    Effect,
}

/// Default modifier values carried by a throw definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowOptions {
    /// Default user dice-pool modifier.
    pub pool_mod: i32,
    /// Default user difficulty modifier.
    pub difficulty_mod: i32,
    /// Default flat success bonus.
    pub success_bonus: i32,
    /// Default flat success malus (stored non-positive).
    pub success_malus: i32,
    /// Overrides the world's base difficulty for this throw.
    pub difficulty_base: Option<u32>,
    /// Named difficulty presets (e.g. "ritual", "fast-cast").
    pub presets: BTreeMap<String, u32>,
}

/// A named, ordered collection of trait references plus default modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowDefinition {
    /// Display name of the throw.
    pub name: String,
    /// What kind of roll this is.
    pub kind: ThrowKind,
    traits: Vec<TraitReference>,
    /// Default modifier values.
    pub options: ThrowOptions,
    /// Whether this throw is a pre-scripted rote.
    pub rote: bool,
    locked: bool,
}

/// Hard cap on traits per throw; [`Settings`](crate::settings::Settings)
/// may lower it but not raise it.
pub const MAX_TRAITS: usize = 9;

impl ThrowDefinition {
    /// Create an empty throw of the given kind.
    pub fn new(name: impl Into<String>, kind: ThrowKind) -> Self {
        Self {
            name: name.into(),
            kind,
            traits: Vec::new(),
            options: ThrowOptions::default(),
            rote: false,
            locked: false,
        }
    }

    /// Mark this throw as a pre-scripted rote.
    pub fn as_rote(mut self) -> Self {
        self.rote = true;
        self
    }

    /// Pin the trait list (a stored throw being replayed).
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Unpin the trait list.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Whether the trait list is pinned.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The ordered trait references.
    pub fn traits(&self) -> &[TraitReference] {
        &self.traits
    }

    /// Append a trait reference.
    ///
    /// # Errors
    ///
    /// [`EngineError::ThrowLocked`] while pinned,
    /// [`EngineError::TraitListFull`] at [`MAX_TRAITS`] entries, and
    /// [`EngineError::InvalidTrait`] when the exact path is already present.
    pub fn add_trait(&mut self, reference: TraitReference) -> EngineResult<()> {
        self.ensure_unlocked()?;
        if self.traits.len() >= MAX_TRAITS {
            return Err(EngineError::TraitListFull { max: MAX_TRAITS });
        }
        if self.traits.iter().any(|t| t.path == reference.path) {
            return Err(EngineError::InvalidTrait {
                path: reference.path.as_str().to_string(),
                reason: "already selected for this throw".to_string(),
            });
        }
        self.traits.push(reference);
        Ok(())
    }

    /// Remove the trait at `index`.
    ///
    /// # Errors
    ///
    /// [`EngineError::ThrowLocked`] while pinned, or
    /// [`EngineError::InvalidTrait`] when `index` is out of bounds.
    pub fn remove_trait(&mut self, index: usize) -> EngineResult<TraitReference> {
        self.ensure_unlocked()?;
        if index >= self.traits.len() {
            return Err(EngineError::InvalidTrait {
                path: format!("#{index}"),
                reason: "no trait at that position".to_string(),
            });
        }
        Ok(self.traits.remove(index))
    }

    /// Move the trait at `from` to position `to`, shifting the rest.
    ///
    /// # Errors
    ///
    /// [`EngineError::ThrowLocked`] while pinned, or
    /// [`EngineError::InvalidTrait`] when either index is out of bounds.
    pub fn reorder(&mut self, from: usize, to: usize) -> EngineResult<()> {
        self.ensure_unlocked()?;
        if from >= self.traits.len() || to >= self.traits.len() {
            return Err(EngineError::InvalidTrait {
                path: format!("#{from}"),
                reason: "reorder position out of bounds".to_string(),
            });
        }
        let reference = self.traits.remove(from);
        self.traits.insert(to, reference);
        Ok(())
    }

    /// Whether this throw is magical for pool-base purposes.
    ///
    /// True when every selected trait is a sphere and the list is non-empty,
    /// or when the single selected trait is the arete score itself.
    pub fn is_magical(&self, registry: &TraitRegistry) -> bool {
        if self.is_arete_throw(registry) {
            return true;
        }
        !self.traits.is_empty()
            && self
                .traits
                .iter()
                .all(|t| registry.category(&t.path).is_sphere())
    }

    /// Whether this is a magical-effect throw, which carries backlash risk.
    ///
    /// An arete-only throw is magical for pool-base purposes but is not an
    /// effect.
    pub fn is_effect(&self, registry: &TraitRegistry) -> bool {
        self.kind == ThrowKind::Effect
            && !self.traits.is_empty()
            && self
                .traits
                .iter()
                .all(|t| registry.category(&t.path).is_sphere())
    }

    fn is_arete_throw(&self, registry: &TraitRegistry) -> bool {
        match self.traits.as_slice() {
            [only] => registry.category(&only.path) == TraitCategory::Arete,
            _ => false,
        }
    }

    fn ensure_unlocked(&self) -> EngineResult<()> {
        if self.locked {
            return Err(EngineError::ThrowLocked);
        }
        Ok(())
    }
}
