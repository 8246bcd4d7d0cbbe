// Copyright (c) 2026 The Host Bridge Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Compilation, instantiation and startup of the guest module.
//!
//! The flow is the whole lifecycle of the system: compile the binary, link
//! the `env` imports, instantiate, then call the guest's exported `init`
//! once. Any failure along the way propagates out unrecovered; there is no
//! retry and nothing to roll back.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;
use wasmtime::{Engine, Instance, Linker, Module, Store};

use crate::error::BridgeError;
use crate::host::{self, HostState};
use crate::{INIT_EXPORT, MEMORY_EXPORT};

/// The host bridge: an engine with the `env` import namespace prepared.
///
/// One `Bridge` can instantiate any number of guests, though the system
/// only ever creates one per process.
pub struct Bridge {
    engine: Engine,
    linker: Linker<HostState>,
}

impl Bridge {
    /// Creates a bridge with `env.write` and `env.assert_here` bound.
    pub fn new() -> Result<Self> {
        let engine = Engine::default();
        let mut linker = Linker::new(&engine);
        host::add_to_linker(&mut linker)?;
        Ok(Self { engine, linker })
    }

    /// Compiles and instantiates a guest module against the host imports.
    ///
    /// `bytes` may be a binary module or the text format. The instance must
    /// export its linear memory as `memory`; that is checked here, before
    /// any host callback can need it. On failure the guest is never run.
    pub fn instantiate(&self, bytes: &[u8], state: HostState) -> Result<GuestInstance> {
        let compile_start = Instant::now();
        let module =
            Module::new(&self.engine, bytes).context("failed to compile guest module")?;
        debug!(elapsed = ?compile_start.elapsed(), "guest module compiled");

        let mut store = Store::new(&self.engine, state);
        let instance = self
            .linker
            .instantiate(&mut store, &module)
            .context("failed to instantiate guest module")?;

        if instance.get_memory(&mut store, MEMORY_EXPORT).is_none() {
            return Err(BridgeError::MissingMemory.into());
        }

        Ok(GuestInstance { store, instance })
    }
}

/// An instantiated guest, alive for the rest of the process.
pub struct GuestInstance {
    store: Store<HostState>,
    instance: Instance,
}

impl GuestInstance {
    /// Calls the guest's exported `init()` entry point.
    ///
    /// This one call performs the guest's entire observable behavior,
    /// including re-entrant calls back into the host imports. A guest
    /// assertion failure raised during the call surfaces here as the
    /// fatal error, downcastable to [`BridgeError::AssertionFailure`].
    pub fn run_init(&mut self) -> Result<()> {
        let func = self
            .instance
            .get_func(&mut self.store, INIT_EXPORT)
            .ok_or(BridgeError::MissingInit)?;
        let init = func
            .typed::<(), ()>(&self.store)
            .context("guest `init` export has the wrong signature")?;

        debug!("calling guest init");
        init.call(&mut self.store, ())
    }
}
