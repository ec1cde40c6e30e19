// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use crate::{EntityId, Reference};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// The difference between two revisions.
///
/// Both halves are partial maps: a key is present exactly when its value
/// differs between the source and target revision. A `None` value is a
/// tombstone ("remove this key at the target"), distinct from the key
/// being absent ("unchanged").
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    bindings: BTreeMap<String, Option<Reference>>,
    entities: BTreeMap<Reference, Option<EntityId>>,
}

impl Delta {
    /// Creates a delta directly from its two halves.
    pub fn from_parts(
        bindings: BTreeMap<String, Option<Reference>>,
        entities: BTreeMap<Reference, Option<EntityId>>,
    ) -> Self {
        Self { bindings, entities }
    }

    /// The binding changes, keyed by root name.
    pub fn bindings(&self) -> &BTreeMap<String, Option<Reference>> {
        &self.bindings
    }

    /// The entity changes, keyed by reference.
    pub fn entities(&self) -> &BTreeMap<Reference, Option<EntityId>> {
        &self.entities
    }

    /// True if the delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.entities.is_empty()
    }

    /// True iff either key set intersects the corresponding half of this
    /// delta. The intersection iterates the smaller side against
    /// membership in the larger one.
    pub fn conflicts_with(
        &self,
        binding_keys: &BTreeSet<String>,
        entity_keys: &BTreeSet<Reference>,
    ) -> bool {
        intersects(binding_keys, &self.bindings) || intersects(entity_keys, &self.entities)
    }

    /// Combines two deltas with disjoint key sets into their key-wise
    /// union, or returns `None` if any binding key or entity key appears
    /// in both. Overlapping keys conflict even when their values agree;
    /// no per-key reconciliation is attempted.
    pub fn merge(&self, other: &Delta) -> Option<Delta> {
        if overlaps(&self.bindings, &other.bindings) || overlaps(&self.entities, &other.entities) {
            return None;
        }
        let mut bindings = self.bindings.clone();
        bindings.extend(other.bindings.iter().map(|(k, v)| (k.clone(), *v)));
        let mut entities = self.entities.clone();
        entities.extend(other.entities.iter().map(|(k, v)| (*k, *v)));
        Some(Delta { bindings, entities })
    }
}

impl Display for Delta {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "delta({} bindings, {} entities)", self.bindings.len(), self.entities.len())
    }
}

fn intersects<K: Ord, V>(keys: &BTreeSet<K>, changes: &BTreeMap<K, V>) -> bool {
    if keys.len() <= changes.len() {
        keys.iter().any(|key| changes.contains_key(key))
    } else {
        changes.keys().any(|key| keys.contains(key))
    }
}

fn overlaps<K: Ord, V>(left: &BTreeMap<K, V>, right: &BTreeMap<K, V>) -> bool {
    if left.len() <= right.len() {
        left.keys().any(|key| right.contains_key(key))
    } else {
        right.keys().any(|key| left.contains_key(key))
    }
}
