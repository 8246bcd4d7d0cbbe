// Copyright (c) 2026 The Host Bridge Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Typed failure surface for the host bridge.
//!
//! Only failures that cross the guest/host call boundary and need to be
//! matched on get a typed variant here. Everything else in the bootstrap
//! path (file I/O, compilation, instantiation) flows as [`anyhow::Error`]
//! with context attached and aborts startup unrecovered.

use thiserror::Error;

/// Errors raised by the host bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The guest reported a failed source-level assertion through
    /// `env.assert_here`. The message format is part of the host/guest
    /// contract and must stay exactly `<file>:<line>: Assertion Fail`.
    #[error("{file}:{line}: Assertion Fail")]
    AssertionFailure {
        /// Source file name decoded from guest memory.
        file: String,
        /// Source line number as passed by the guest.
        line: i32,
    },

    /// A `(pointer, length)` pair handed to the host referenced bytes
    /// outside the guest's current linear memory.
    #[error("guest memory read out of bounds: offset {offset} + length {len} exceeds memory size {size}")]
    OutOfBoundsRead {
        /// Requested start offset into linear memory.
        offset: u64,
        /// Requested byte length.
        len: u64,
        /// Linear memory size at the time of the call.
        size: u64,
    },

    /// The guest does not export its linear memory under the name `memory`.
    #[error("guest module does not export a linear memory named `memory`")]
    MissingMemory,

    /// The guest does not export an `init` function.
    #[error("guest module does not export an `init` function")]
    MissingInit,
}
