// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A SmallTable error.
///
/// Lookups that merely miss (an unknown binding name, reference or entity
/// id) are not errors; they return `None` at the call site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Error {
    /// A caller-supplied argument was rejected: a duplicate property name,
    /// or an object that belongs to a different table.
    InvalidArgument(String),
    /// An optimistic commit could not be installed. This covers both a
    /// rebased delta overlapping with changes already at head and the
    /// install retries being exhausted; callers cannot tell the two apart
    /// and must treat both as "save failed, state unchanged".
    Conflict,
    /// A repository snapshot could not be encoded or decoded.
    Encoding(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Error::Conflict => f.write_str("commit conflict"),
            Error::Encoding(message) => write!(f, "encoding error: {message}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<crate::encoding::Error> for Error {
    fn from(error: crate::encoding::Error) -> Self {
        Error::Encoding(error.to_string())
    }
}

/// Constructs an `Err(Error::InvalidArgument)` from a format string.
#[macro_export]
macro_rules! invalid_argument {
    ($($args:tt)*) => {
        Err($crate::Error::InvalidArgument(format!($($args)*)))
    };
}
