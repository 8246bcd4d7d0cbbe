// Copyright (c) 2026 The Host Bridge Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Prelude module for convenient imports.

pub use crate::error::BridgeError;
pub use crate::host::{HostState, add_to_linker};
pub use crate::loader::{Bridge, GuestInstance};
pub use crate::memory::decode_text;
pub use crate::{IMPORT_MODULE, INIT_EXPORT, MEMORY_EXPORT};
