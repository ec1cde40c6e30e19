// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use bincode::error::{DecodeError, EncodeError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An error that occurred while encoding or decoding a snapshot: malformed
/// binary input, a truncated stream, or an internal encoding bug.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Error(pub String);

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error {}

impl From<EncodeError> for Error {
    fn from(error: EncodeError) -> Self {
        Self(error.to_string())
    }
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Self {
        Self(error.to_string())
    }
}
