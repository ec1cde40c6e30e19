// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use smalltable_core::{Delta, Entity, Error, Reference, Result, Revision};
use smalltable_store::Repository;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A per-client workspace pinned to the revision that was head when the
/// session began.
///
/// All reads observe that start revision, never later commits. Binding
/// changes are staged in the session and only reach the repository through
/// [`Session::save`], which consumes the session: one session produces at
/// most one commit.
pub struct Session {
    repository: Arc<Repository>,
    start: Arc<Revision>,
    modified_bindings: BTreeMap<String, Option<Reference>>,
}

impl Session {
    /// Opens a session at the repository's current head.
    pub fn begin(repository: Arc<Repository>) -> Self {
        let start = repository.head();
        Self { repository, start, modified_bindings: BTreeMap::new() }
    }

    /// The revision this session reads from.
    pub fn start(&self) -> &Arc<Revision> {
        &self.start
    }

    /// The repository this session belongs to.
    pub fn repository(&self) -> &Arc<Repository> {
        &self.repository
    }

    /// Allocates a fresh reference from the repository.
    pub fn allocate_reference(&self) -> Reference {
        self.repository.allocate_reference()
    }

    /// Stages a binding change: `Some` binds the name to a reference,
    /// `None` unbinds it. Nothing reaches the repository until save.
    pub fn bind(&mut self, name: impl Into<String>, reference: Option<Reference>) {
        self.modified_bindings.insert(name.into(), reference);
    }

    /// Looks up a root name. Staged changes win over the start revision;
    /// in particular a staged unbind shadows a binding that exists at the
    /// start revision.
    pub fn bound(&self, name: &str) -> Option<Reference> {
        match self.modified_bindings.get(name) {
            Some(change) => *change,
            None => self.start.binding(name),
        }
    }

    /// Looks up the entity body that is current for `reference` at the
    /// start revision. Commits by other sessions are never observed.
    pub fn resolve(&self, reference: Reference) -> Option<Entity> {
        let id = self.start.id_of(reference)?;
        self.repository.entity(id)
    }

    /// Saves the session's staged binding changes together with the dirty
    /// entity bodies collected by the caller, consuming the session.
    ///
    /// The entity bodies are stored and assigned fresh ids first, then the
    /// combined delta goes through the repository's optimistic commit.
    /// On conflict the repository is left unchanged except for the stored
    /// bodies, which stay in the entity table unreachable from any
    /// revision.
    #[instrument(name = "session::save", level = "debug", skip(self, dirty))]
    pub fn save(self, dirty: impl IntoIterator<Item = Entity>) -> Result<Arc<Revision>> {
        let dirty: Vec<Entity> = dirty.into_iter().collect();
        let bindings = self.binding_changes();

        // Fail fast when the changes already collide with commits landed
        // since the session began, before burning entity ids on a commit
        // that cannot succeed. The commit loop below stays authoritative.
        let binding_keys: BTreeSet<String> = bindings.keys().cloned().collect();
        let entity_keys: BTreeSet<Reference> =
            dirty.iter().map(|entity| entity.reference()).collect();
        let since_start = self.start.diff(&self.repository.head());
        if since_start.conflicts_with(&binding_keys, &entity_keys) {
            debug!("changes collide with commits since session start");
            return Err(Error::Conflict);
        }

        let assigned = self.repository.prepare(dirty);
        let entities = assigned.into_iter().map(|(reference, id)| (reference, Some(id))).collect();
        let delta = Delta::from_parts(bindings, entities);
        self.repository.commit(&self.start, delta)
    }

    /// The canonical binding delta: staged entries that do not actually
    /// change anything relative to the start revision are dropped.
    fn binding_changes(&self) -> BTreeMap<String, Option<Reference>> {
        self.modified_bindings
            .iter()
            .filter(|(name, change)| self.start.binding(name) != **change)
            .map(|(name, change)| (name.clone(), *change))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smalltable_core::Value;

    fn repository_with_root() -> Arc<Repository> {
        let repository = Arc::new(Repository::new());
        let reference = repository.allocate_reference();
        let entity =
            Entity::new(reference, [("value".to_string(), Value::Int(1))]).unwrap();
        let assigned = repository.prepare([entity]);
        let delta = Delta::from_parts(
            [("root".to_string(), Some(reference))].into_iter().collect(),
            assigned.iter().map(|(reference, id)| (*reference, Some(*id))).collect(),
        );
        repository.commit(&repository.head(), delta).unwrap();
        repository
    }

    #[test]
    fn pending_bindings_win_over_the_start_revision() {
        let mut session = Session::begin(repository_with_root());
        let root = session.bound("root").unwrap();

        let fresh = session.allocate_reference();
        session.bind("root", Some(fresh));
        assert_eq!(session.bound("root"), Some(fresh));

        session.bind("root", None);
        assert_eq!(session.bound("root"), None);

        session.bind("root", Some(root));
        assert_eq!(session.bound("root"), Some(root));
    }

    #[test]
    fn staged_no_ops_produce_no_binding_changes() {
        let mut session = Session::begin(repository_with_root());
        let root = session.bound("root").unwrap();

        session.bind("root", Some(root));
        session.bind("missing", None);
        assert!(session.binding_changes().is_empty());

        session.bind("root", None);
        let changes = session.binding_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get("root"), Some(&None));
    }
}
