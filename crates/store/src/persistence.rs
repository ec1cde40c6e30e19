// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use crate::Repository;
use crossbeam_skiplist::SkipMap;
use serde::{Deserialize, Serialize};
use smalltable_core::encoding::Value as _;
use smalltable_core::{Entity, EntityId, Result, Revision, invalid_argument};
use std::io::{Read, Write};
use std::sync::{Arc, Mutex};

/// One self-contained dump of a repository: the revision history (newest
/// first), the entity table, and both sequence counters.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    revisions: Vec<Arc<Revision>>,
    entities: Vec<(EntityId, Entity)>,
    next_reference: u64,
    next_entity_id: u64,
}

impl smalltable_core::encoding::Value for Snapshot {}

impl Repository {
    /// Dumps the whole repository into a byte stream.
    pub fn dump_into<W: Write>(&self, writer: W) -> Result<()> {
        Ok(self.snapshot().encode_into(writer)?)
    }

    /// Restores a repository from a byte stream produced by
    /// [`Repository::dump_into`]. The restored head equals the head at
    /// dump time, and both sequences resume strictly above every
    /// identifier appearing anywhere in the snapshot.
    pub fn restore_from<R: Read>(reader: R) -> Result<Repository> {
        Self::from_snapshot(Snapshot::decode_from(reader)?)
    }

    fn snapshot(&self) -> Snapshot {
        // The revision list is captured before the entity table: entities
        // are inserted before the install that makes them reachable, so
        // every body the captured head can reach is already in the table.
        let revisions: Vec<Arc<Revision>> = {
            let revisions = self.revisions.lock().expect("revision list mutex poisoned");
            revisions.iter().rev().cloned().collect()
        };
        let entities =
            self.entities.iter().map(|entry| (*entry.key(), entry.value().clone())).collect();
        Snapshot {
            revisions,
            entities,
            next_reference: self.references.current(),
            next_entity_id: self.entity_ids.current(),
        }
    }

    fn from_snapshot(snapshot: Snapshot) -> Result<Repository> {
        if snapshot.revisions.is_empty() {
            return invalid_argument!("snapshot contains no revisions");
        }

        let references = crate::Sequence::starting_at(snapshot.next_reference.max(1));
        let entity_ids = crate::Sequence::starting_at(snapshot.next_entity_id.max(1));

        let entities = SkipMap::new();
        for (id, entity) in snapshot.entities {
            entity_ids.advance_past(id.0);
            references.advance_past(entity.reference().0);
            for value in entity.properties().values() {
                if let smalltable_core::Value::Reference(reference) = value {
                    references.advance_past(reference.0);
                }
            }
            entities.insert(id, entity);
        }

        for revision in &snapshot.revisions {
            for reference in revision.bindings().values() {
                references.advance_past(reference.0);
            }
            for (reference, id) in revision.entities() {
                references.advance_past(reference.0);
                entity_ids.advance_past(id.0);
            }
        }

        Ok(Repository {
            references,
            entity_ids,
            entities,
            revisions: Mutex::new(snapshot.revisions.into_iter().rev().collect()),
        })
    }
}
