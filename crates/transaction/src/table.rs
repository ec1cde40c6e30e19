// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use crate::object::{Object, Property, TableId};
use crate::session::Session;
use smalltable_core::{Entity, Reference, Result, Revision, Value, invalid_argument};
use smalltable_store::Repository;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// The client façade over a [`Session`].
///
/// A table resolves references lazily into [`Object`] handles and caches
/// them, so one reference always yields the same handle within a table.
/// Objects created or mutated through the table are tracked as dirty and
/// turned into entity bodies on [`Table::save`]. A table, like the session
/// underneath it, is owned by one thread and saved at most once.
pub struct Table {
    id: TableId,
    session: Session,
    objects: RefCell<HashMap<Reference, Object>>,
}

impl Table {
    /// Opens a table over a fresh session at the repository's head.
    pub fn new(repository: Arc<Repository>) -> Self {
        Self {
            id: TableId(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)),
            session: Session::begin(repository),
            objects: RefCell::new(HashMap::new()),
        }
    }

    /// The session underneath this table.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Creates a new, empty object owned by this table.
    pub fn new_object(&self) -> Object {
        let reference = self.session.allocate_reference();
        let object = Object::fresh(self.id, reference);
        self.objects.borrow_mut().insert(reference, object.clone());
        object
    }

    /// Resolves a reference into an object handle, against the session's
    /// start revision. Repeated resolution of one reference returns the
    /// same handle.
    pub fn object(&self, reference: Reference) -> Option<Object> {
        if let Some(object) = self.objects.borrow().get(&reference) {
            return Some(object.clone());
        }
        let entity = self.session.resolve(reference)?;
        let object =
            Object::with_properties(self.id, reference, entity.properties().clone(), false);
        self.objects.borrow_mut().insert(reference, object.clone());
        Some(object)
    }

    /// Stages a root binding: `Some` binds the name to an object of this
    /// table, `None` unbinds it.
    pub fn bind(&mut self, name: impl Into<String>, object: Option<&Object>) -> Result<()> {
        let reference = match object {
            Some(object) => {
                self.ensure_owned(object)?;
                Some(object.reference())
            }
            None => None,
        };
        self.session.bind(name, reference);
        Ok(())
    }

    /// Looks up a root binding as an object handle. Staged bindings win
    /// over the start revision.
    pub fn bound(&self, name: &str) -> Option<Object> {
        self.object(self.session.bound(name)?)
    }

    /// Reads a property of an object, resolving an object-valued property
    /// into a handle of this table.
    pub fn property(&self, object: &Object, name: &str) -> Result<Option<Property>> {
        self.ensure_owned(object)?;
        let value = object.state.borrow().properties.get(name).cloned();
        Ok(match value {
            Some(Value::Int(value)) => Some(Property::Int(value)),
            Some(Value::Text(value)) => Some(Property::Text(value)),
            Some(Value::Reference(reference)) => self.object(reference).map(Property::Object),
            None => None,
        })
    }

    /// Sets a property on an object of this table and marks it dirty. An
    /// object-valued property must belong to this table too; it is stored
    /// as a plain reference, never by embedding, so object graphs may be
    /// cyclic.
    pub fn set_property(
        &self,
        object: &Object,
        name: impl Into<String>,
        value: impl Into<Property>,
    ) -> Result<()> {
        self.ensure_owned(object)?;
        let value = match value.into() {
            Property::Int(value) => Value::Int(value),
            Property::Text(value) => Value::Text(value),
            Property::Object(other) => {
                self.ensure_owned(&other)?;
                Value::Reference(other.reference())
            }
        };
        let mut state = object.state.borrow_mut();
        state.properties.insert(name.into(), value);
        state.dirty = true;
        Ok(())
    }

    /// Saves every dirty object together with the staged bindings,
    /// consuming the table. Returns the installed revision, or a conflict
    /// when the repository rejected the commit.
    pub fn save(self) -> Result<Arc<Revision>> {
        let mut dirty = Vec::new();
        for object in self.objects.borrow().values() {
            let state = object.state.borrow();
            if state.dirty {
                dirty.push(Entity::new(state.reference, state.properties.clone())?);
            }
        }
        debug!(dirty = dirty.len(), "saving table");
        self.session.save(dirty)
    }

    fn ensure_owned(&self, object: &Object) -> Result<()> {
        if object.table() != self.id {
            return invalid_argument!("object {} belongs to a different table", object.reference());
        }
        Ok(())
    }
}
