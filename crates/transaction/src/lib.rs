// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

//! Sessions and the client table façade for SmallTable.
//!
//! A [`Session`] pins the repository head at the moment it begins and reads
//! that snapshot for its whole lifetime; changes are staged locally and
//! handed to the repository in a single [`Session::save`]. The [`Table`]
//! layer on top resolves references into cached [`Object`] handles, tracks
//! which objects are dirty, and rejects objects that belong to a different
//! table.

pub use object::{Object, Property};
pub use session::Session;
pub use table::Table;

mod object;
mod session;
mod table;
