// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

// This file includes portions of code from https://github.com/erikgrinaker/toydb (Apache 2 License).
// Original Apache 2 License Copyright (c) erikgrinaker 2024.

//! Binary encoding of repository snapshots.

pub use error::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

pub mod bincode;
mod error;

/// The encoding result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Adds automatic Bincode encode-decode methods to value types. These are
/// used for the self-contained repository snapshot and any other value
/// dumped to or restored from a byte stream.
pub trait Value: Serialize + DeserializeOwned {
    /// Decodes a value from a byte slice using Bincode.
    fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
    }

    /// Decodes a value from a reader using Bincode.
    fn decode_from<R: Read>(reader: R) -> Result<Self> {
        bincode::deserialize_from(reader)
    }

    /// Encodes a value to a byte vector using Bincode.
    fn encode(&self) -> Vec<u8> {
        bincode::serialize(self)
    }

    /// Encodes a value into a writer using Bincode.
    fn encode_into<W: Write>(&self, writer: W) -> Result<()> {
        bincode::serialize_into(writer, self)
    }
}
