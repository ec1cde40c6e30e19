// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identity of an object across its whole lifetime.
///
/// References are opaque 64-bit handles, allocated from the repository's
/// monotonic reference sequence and never reused. Every revision maps the
/// live references to the entity body that is current at that revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Reference(pub u64);

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Identity of one immutable snapshot of an object's contents.
///
/// Entity ids are allocated from their own monotonic sequence, separate
/// from the reference sequence, and are likewise never reused. A new id is
/// assigned every time an object is stored, so one reference accumulates
/// many entity ids over the revision history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
