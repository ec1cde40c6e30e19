// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use crate::Sequence;
use crossbeam_skiplist::SkipMap;
use smalltable_core::{Delta, Entity, EntityId, Error, Reference, Result, Revision};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, trace};

/// How many times [`Repository::commit`] re-rebases and retries the head
/// install before giving up with a conflict.
const MAX_RETRY: usize = 5;

/// The shared repository: entity table, revision history and identifier
/// sequences.
///
/// Many sessions share one repository. The sequences and the entity table
/// are lock-free; only the revision list is guarded by a mutex, and it is
/// touched exclusively through [`Repository::head`] and the install step of
/// [`Repository::commit`]. Revisions are handed out as `Arc` snapshots and
/// are never mutated after install.
pub struct Repository {
    pub(crate) references: Sequence,
    pub(crate) entity_ids: Sequence,
    /// Entity bodies by id. Grows monotonically; bodies are inserted by
    /// [`Repository::prepare`] before the commit that makes them reachable
    /// and are never removed or replaced.
    pub(crate) entities: SkipMap<EntityId, Entity>,
    /// Append-only, oldest first; the last element is head. Never empty:
    /// a fresh repository starts with the empty revision.
    pub(crate) revisions: Mutex<Vec<Arc<Revision>>>,
}

impl Repository {
    /// Creates an empty repository whose head is the empty revision.
    pub fn new() -> Self {
        Self {
            references: Sequence::new(),
            entity_ids: Sequence::new(),
            entities: SkipMap::new(),
            revisions: Mutex::new(vec![Arc::new(Revision::new())]),
        }
    }

    /// Allocates a fresh reference.
    pub fn allocate_reference(&self) -> Reference {
        Reference(self.references.next())
    }

    /// Allocates `count` fresh entity ids. Ids are unique across
    /// concurrent callers; nothing more is guaranteed about their order.
    pub fn allocate_entity_ids(&self, count: u64) -> Vec<EntityId> {
        self.entity_ids.next_batch(count).map(EntityId).collect()
    }

    /// Looks up an entity body by id.
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.get(&id).map(|entry| entry.value().clone())
    }

    /// Assigns a fresh entity id to every input entity and stores the
    /// bodies, returning the map from each entity's reference to its new
    /// id. Passing several entities with the same reference stores as many
    /// distinct bodies; the last one wins in the returned map.
    pub fn prepare(
        &self,
        entities: impl IntoIterator<Item = Entity>,
    ) -> BTreeMap<Reference, EntityId> {
        let entities: Vec<Entity> = entities.into_iter().collect();
        let ids = self.allocate_entity_ids(entities.len() as u64);

        let mut assigned = BTreeMap::new();
        for (entity, id) in entities.into_iter().zip(ids) {
            trace!(reference = %entity.reference(), id = %id, "storing entity body");
            assigned.insert(entity.reference(), id);
            self.entities.insert(id, entity);
        }
        assigned
    }

    /// The current head revision.
    pub fn head(&self) -> Arc<Revision> {
        let revisions = self.revisions.lock().expect("revision list mutex poisoned");
        revisions.last().expect("revision list is never empty").clone()
    }

    /// Attempts to install `delta` on top of the current head, rebasing it
    /// over whatever landed since `source`.
    ///
    /// Each attempt diffs `source` against the current head, merges the
    /// caller's delta with that head delta, and installs the result if the
    /// head has not moved in the meantime. A merge failure means the
    /// caller's changes overlap changes already committed and surfaces as
    /// [`Error::Conflict`]; so does losing the install race `MAX_RETRY`
    /// times in a row.
    #[instrument(name = "repository::commit", level = "debug", skip(self, source, delta))]
    pub fn commit(&self, source: &Arc<Revision>, delta: Delta) -> Result<Arc<Revision>> {
        for attempt in 1..=MAX_RETRY {
            let head = self.head();
            let since_source = source.diff(&head);
            let Some(rebased) = delta.merge(&since_source) else {
                debug!(attempt, "delta overlaps changes at head, giving up");
                return Err(Error::Conflict);
            };

            let next = Arc::new(source.apply(&rebased));
            if self.install_if_head_unchanged(&head, next.clone()) {
                trace!(attempt, "installed new head");
                return Ok(next);
            }
            debug!(attempt, "head moved during install, retrying");
        }
        debug!("gave up after {MAX_RETRY} attempts");
        Err(Error::Conflict)
    }

    /// Pushes `next` as the new head iff the current head is still the
    /// same revision (by identity) as `expected`.
    fn install_if_head_unchanged(&self, expected: &Arc<Revision>, next: Arc<Revision>) -> bool {
        let mut revisions = self.revisions.lock().expect("revision list mutex poisoned");
        let head = revisions.last().expect("revision list is never empty");
        if !Arc::ptr_eq(head, expected) {
            return false;
        }
        revisions.push(next);
        true
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
