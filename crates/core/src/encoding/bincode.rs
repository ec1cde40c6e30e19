// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

// This file includes portions of code from https://github.com/erikgrinaker/toydb (Apache 2 License).
// Original Apache 2 License Copyright (c) erikgrinaker 2024.

//! Bincode is used to encode values, both for persisted snapshots and for
//! in-memory round trips in tests. It is a Rust-specific encoding that
//! depends on the exact data structure layout, which is fine here: the
//! snapshot format is internal to SmallTable.
//!
//! Encoding values is treated as infallible, since failures are bugs in
//! the encoded data structures rather than runtime conditions. Decoding
//! returns a `Result`, since the input bytes come from outside.

use super::Result;
use bincode::config;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// Returns the standard Bincode configuration.
fn standard() -> config::Configuration {
    config::standard()
}

/// Deserializes a value from a byte slice.
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (value, _) = bincode::serde::decode_from_slice(bytes, standard())?;
    Ok(value)
}

/// Deserializes a value from a reader.
pub fn deserialize_from<T: DeserializeOwned, R: Read>(mut reader: R) -> Result<T> {
    Ok(bincode::serde::decode_from_std_read(&mut reader, standard())?)
}

/// Serializes a value to a byte vector.
pub fn serialize<T: Serialize>(value: &T) -> Vec<u8> {
    bincode::serde::encode_to_vec(value, standard()).expect("value must be serializable")
}

/// Serializes a value into a writer.
pub fn serialize_into<T: Serialize, W: Write>(mut writer: W, value: &T) -> Result<()> {
    bincode::serde::encode_into_std_write(value, &mut writer, standard())?;
    Ok(())
}
