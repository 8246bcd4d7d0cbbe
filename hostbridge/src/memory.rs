// Copyright (c) 2026 The Host Bridge Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decoding of guest strings out of linear memory.
//!
//! The guest passes strings to the host as raw `(pointer, length)` pairs
//! into its own linear memory. The ABI carries both values as `i32`, but
//! wasm addresses are unsigned, so both are reinterpreted as `u32` before
//! the bounds check; a negative pointer therefore lands far out of bounds
//! instead of wrapping into valid memory.

use std::borrow::Cow;

use crate::error::BridgeError;

/// Decodes the byte range `[ptr, ptr + len)` of `memory` as UTF-8 text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than rejected,
/// matching the decoding convention the guest was written against. A range
/// that does not lie fully within `memory` is a [`BridgeError::OutOfBoundsRead`].
pub fn decode_text(memory: &[u8], ptr: i32, len: i32) -> Result<Cow<'_, str>, BridgeError> {
    let offset = ptr as u32 as usize;
    let length = len as u32 as usize;

    let bytes = offset
        .checked_add(length)
        .and_then(|end| memory.get(offset..end))
        .ok_or(BridgeError::OutOfBoundsRead {
            offset: offset as u64,
            len: length as u64,
            size: memory.len() as u64,
        })?;

    Ok(String::from_utf8_lossy(bytes))
}
