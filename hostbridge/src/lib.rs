// Copyright (c) 2026 The Host Bridge Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)]

//! Host bridge for a WebAssembly guest module.
//!
//! This crate loads and instantiates a compiled guest module, wires up the
//! two host functions the guest links against (`env.write` and
//! `env.assert_here`), and exposes the guest's exported `init` entry point
//! to the host. The one non-trivial contract it implements is the
//! memory-bridging convention used to pass strings out of the guest's
//! linear memory: the guest hands raw `(pointer, length)` pairs to the host,
//! and the host decodes the referenced byte range as UTF-8 text.
//!
//! ## What the bridge provides
//!
//! - Compilation and instantiation of a guest binary (or text-format
//!   module) with the `env` import namespace bound
//! - Bounds-checked, lossy UTF-8 decoding of guest strings
//! - A pluggable output sink for guest writes, owned by the store and
//!   handed to the host callbacks by reference
//! - A typed failure surface for assertion failures raised by the guest
//!
//! ## Usage
//!
//! ```rust,no_run
//! # fn main() -> anyhow::Result<()> {
//! use hostbridge::{Bridge, HostState};
//!
//! let wasm_bytes = std::fs::read("index.wasm")?;
//! let bridge = Bridge::new()?;
//! let mut guest = bridge.instantiate(&wasm_bytes, HostState::new())?;
//! guest.run_init()?;
//! # Ok(())
//! # }
//! ```

// Export modules
pub mod error;
pub mod host;
pub mod loader;
pub mod memory;
pub mod prelude;

// Reexport types for convenience (use fully qualified paths)
pub use error::BridgeError;
pub use host::{HostState, add_to_linker};
pub use loader::{Bridge, GuestInstance};
pub use memory::decode_text;

/// Import namespace the guest links its host functions against.
pub const IMPORT_MODULE: &str = "env";

/// Name of the linear memory export the host reads guest strings from.
pub const MEMORY_EXPORT: &str = "memory";

/// Name of the guest's exported initialization entry point.
pub const INIT_EXPORT: &str = "init";
