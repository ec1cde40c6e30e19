// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use crate::{Reference, Result, Value, invalid_argument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An immutable snapshot of one object's contents: a property map tagged
/// with the reference that identifies the object across revisions.
///
/// Entities are created once and never mutated. Storing a changed object
/// produces a fresh entity under a fresh [`crate::EntityId`]; older bodies
/// stay retrievable by id for as long as the repository lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    reference: Reference,
    properties: BTreeMap<String, Value>,
}

impl Entity {
    /// Creates an entity from a reference and its properties. Rejects a
    /// duplicate property name.
    pub fn new(
        reference: Reference,
        properties: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (name, value) in properties {
            if map.insert(name.clone(), value).is_some() {
                return invalid_argument!("duplicate property {name}");
            }
        }
        Ok(Self { reference, properties: map })
    }

    /// The reference identifying this object across revisions.
    pub fn reference(&self) -> Reference {
        self.reference
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// All properties of this entity.
    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn duplicate_property_rejected() {
        let result = Entity::new(
            Reference(1),
            [
                ("value".to_string(), Value::Int(1)),
                ("value".to_string(), Value::Int(2)),
            ],
        );
        assert_eq!(result, Err(Error::InvalidArgument("duplicate property value".to_string())));
    }

    #[test]
    fn property_lookup() {
        let entity = Entity::new(
            Reference(1),
            [("value".to_string(), Value::Text("hello".to_string()))],
        )
        .unwrap();
        assert_eq!(entity.property("value"), Some(&Value::Text("hello".to_string())));
        assert_eq!(entity.property("missing"), None);
    }
}
