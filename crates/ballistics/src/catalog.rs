//! Process-wide, read-only set of ammunition families.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::table::AmmunitionFamily;

/// Ammunition families indexed by upper-cased name.
///
/// Families are wrapped in `Arc` so solver tasks on other threads can hold them
/// without copying the tables.
#[derive(Debug, Clone, Default)]
pub struct AmmunitionCatalog {
    families: BTreeMap<String, Arc<AmmunitionFamily>>,
}

impl AmmunitionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a family, returning the one it replaced under the same name.
    pub fn insert(&mut self, family: AmmunitionFamily) -> Option<Arc<AmmunitionFamily>> {
        self.families
            .insert(family.name().to_uppercase(), Arc::new(family))
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<Arc<AmmunitionFamily>> {
        self.families.get(&name.to_uppercase()).cloned()
    }

    /// Family names as declared, in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.families.values().map(|family| family.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

impl FromIterator<AmmunitionFamily> for AmmunitionCatalog {
    fn from_iter<I: IntoIterator<Item = AmmunitionFamily>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for family in iter {
            catalog.insert(family);
        }
        catalog
    }
}
