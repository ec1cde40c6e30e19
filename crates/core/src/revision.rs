// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use crate::{Delta, EntityId, Reference};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An immutable snapshot of the whole repository state.
///
/// `bindings` maps root names to references; `entities` maps every live
/// reference to the entity body that is current at this revision. Both
/// maps are total within the revision, tombstones exist only in deltas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    bindings: BTreeMap<String, Reference>,
    entities: BTreeMap<Reference, EntityId>,
}

impl Revision {
    /// The empty revision: no bindings, no live references.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a revision directly from its two maps.
    pub fn from_parts(
        bindings: BTreeMap<String, Reference>,
        entities: BTreeMap<Reference, EntityId>,
    ) -> Self {
        Self { bindings, entities }
    }

    /// Looks up the reference bound to a root name.
    pub fn binding(&self, name: &str) -> Option<Reference> {
        self.bindings.get(name).copied()
    }

    /// Looks up the entity id that is current for a reference.
    pub fn id_of(&self, reference: Reference) -> Option<EntityId> {
        self.entities.get(&reference).copied()
    }

    /// All named roots of this revision.
    pub fn bindings(&self) -> &BTreeMap<String, Reference> {
        &self.bindings
    }

    /// All live references of this revision and their current bodies.
    pub fn entities(&self) -> &BTreeMap<Reference, EntityId> {
        &self.entities
    }

    /// Computes the change required to turn this revision into `target`.
    ///
    /// For each half, keys whose value differs between the two revisions
    /// map to the target value, and keys present here but absent from the
    /// target map to a tombstone. `self.apply(&self.diff(target))` equals
    /// `target` for any two revisions.
    pub fn diff(&self, target: &Revision) -> Delta {
        Delta::from_parts(
            diff_map(&self.bindings, &target.bindings),
            diff_map(&self.entities, &target.entities),
        )
    }

    /// Produces the revision that results from applying `delta` on top of
    /// this one. Tombstones remove their key, other entries overwrite, and
    /// keys absent from the delta are carried through unchanged.
    pub fn apply(&self, delta: &Delta) -> Revision {
        Revision {
            bindings: apply_map(&self.bindings, delta.bindings()),
            entities: apply_map(&self.entities, delta.entities()),
        }
    }
}

fn diff_map<K: Ord + Clone, V: PartialEq + Clone>(
    source: &BTreeMap<K, V>,
    target: &BTreeMap<K, V>,
) -> BTreeMap<K, Option<V>> {
    let mut changes = BTreeMap::new();
    for (key, value) in target {
        if source.get(key) != Some(value) {
            changes.insert(key.clone(), Some(value.clone()));
        }
    }
    for key in source.keys() {
        if !target.contains_key(key) {
            changes.insert(key.clone(), None);
        }
    }
    changes
}

fn apply_map<K: Ord + Clone, V: Clone>(
    source: &BTreeMap<K, V>,
    changes: &BTreeMap<K, Option<V>>,
) -> BTreeMap<K, V> {
    let mut result = source.clone();
    for (key, change) in changes {
        match change {
            Some(value) => {
                result.insert(key.clone(), value.clone());
            }
            None => {
                result.remove(key);
            }
        }
    }
    result
}
