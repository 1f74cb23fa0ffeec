//! Engine-owned registry of known trait paths.
//!
//! Built once from loaded content (compendium packs, world documents) and
//! then treated as read-only by the engine. It supplies localized default
//! display names and category overrides for paths the structural
//! classification in [`TraitPath::category`](crate::trait_ref::TraitPath::category)
//! cannot place.

use std::collections::HashMap;

use crate::trait_ref::{TraitCategory, TraitPath};

/// One registered trait path.
#[derive(Debug, Clone)]
struct RegistryEntry {
    display_name: String,
    category: TraitCategory,
}

/// Registry of known trait paths, keyed by full path.
#[derive(Debug, Clone, Default)]
pub struct TraitRegistry {
    entries: HashMap<TraitPath, RegistryEntry>,
}

impl TraitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path with its localized default name and category.
    ///
    /// Re-registering a path replaces the previous entry.
    pub fn register(
        &mut self,
        path: TraitPath,
        display_name: impl Into<String>,
        category: TraitCategory,
    ) {
        self.entries.insert(
            path,
            RegistryEntry {
                display_name: display_name.into(),
                category,
            },
        );
    }

    /// Localized default name for a path, if registered.
    pub fn display_name(&self, path: &TraitPath) -> Option<&str> {
        self.entries.get(path).map(|e| e.display_name.as_str())
    }

    /// Category for a path: the registered one, else structural classification.
    pub fn category(&self, path: &TraitPath) -> TraitCategory {
        self.entries
            .get(path)
            .map(|e| e.category)
            .unwrap_or_else(|| path.category())
    }

    /// How many paths are registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
