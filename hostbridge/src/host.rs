// Copyright (c) 2026 The Host Bridge Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The two host functions the guest imports, and the state they run against.
//!
//! Both functions live in the `env` import namespace and are called
//! synchronously from the guest's single thread of execution, so neither may
//! block or suspend. The guest's linear memory is only ever read here,
//! transiently, for the duration of one call.

use std::io::{self, Write};

use anyhow::Context;
use tracing::trace;
use wasmtime::{Caller, Extern, Linker, Memory};

use crate::error::BridgeError;
use crate::memory::decode_text;
use crate::{IMPORT_MODULE, MEMORY_EXPORT};

/// Host-side state owned by the store and handed to the host functions by
/// reference on every call.
///
/// Holds the output sink guest writes land on. The daemon wires this to
/// stdout; tests substitute an in-memory buffer.
pub struct HostState {
    output: Box<dyn Write + Send>,
}

impl HostState {
    /// Creates host state writing guest output to the host's stdout.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }

    /// Creates host state writing guest output to the given sink.
    pub fn with_output(output: impl Write + Send + 'static) -> Self {
        Self { output: Box::new(output) }
    }

    /// Emits one decoded guest string as a single output line.
    pub(crate) fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers the `env` import namespace on the linker.
///
/// The names and signatures must match the guest's import section exactly or
/// instantiation fails:
///
/// - `write(channel: i32, ptr: i32, len: i32)`
/// - `assert_here(file_ptr: i32, file_len: i32, line: i32, condition: i32)`
pub fn add_to_linker(linker: &mut Linker<HostState>) -> wasmtime::Result<()> {
    linker.func_wrap(IMPORT_MODULE, "write", host_write)?;
    linker.func_wrap(IMPORT_MODULE, "assert_here", host_assert_here)?;
    Ok(())
}

/// `env.write`: emit one line of guest text.
///
/// `channel` is the stream selector from the guest's libc stub; only stdout
/// exists on this side, so its value has no effect.
fn host_write(
    mut caller: Caller<'_, HostState>,
    channel: i32,
    ptr: i32,
    len: i32,
) -> wasmtime::Result<()> {
    trace!(channel, ptr, len, "guest write");

    let memory = guest_memory(&mut caller)?;
    let (data, state) = memory.data_and_store_mut(&mut caller);
    let text = decode_text(data, ptr, len)?;
    state
        .write_line(&text)
        .context("failed to write guest output")?;
    Ok(())
}

/// `env.assert_here`: a source-level assertion check reported by the guest.
///
/// A zero `condition` is an unrecoverable guest-side invariant violation;
/// it raises a trap carrying the decoded file name and line, which aborts
/// the guest call stack and surfaces from the host's invoke call.
fn host_assert_here(
    mut caller: Caller<'_, HostState>,
    file_ptr: i32,
    file_len: i32,
    line: i32,
    condition: i32,
) -> wasmtime::Result<()> {
    if condition != 0 {
        return Ok(());
    }

    let memory = guest_memory(&mut caller)?;
    let file = decode_text(memory.data(&caller), file_ptr, file_len)?.into_owned();
    Err(BridgeError::AssertionFailure { file, line }.into())
}

/// Resolves the calling instance's exported linear memory.
fn guest_memory(caller: &mut Caller<'_, HostState>) -> Result<Memory, BridgeError> {
    caller
        .get_export(MEMORY_EXPORT)
        .and_then(Extern::into_memory)
        .ok_or(BridgeError::MissingMemory)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use wasmtime::{Engine, Linker, Module, Store};

    use super::{HostState, add_to_linker};

    /// Clonable sink so a test keeps a handle on what the guest wrote.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn run_init(wat_text: &str, state: HostState) -> wasmtime::Result<()> {
        let engine = Engine::default();
        let module = Module::new(&engine, wat::parse_str(wat_text)?)?;
        let mut linker = Linker::new(&engine);
        add_to_linker(&mut linker)?;
        let mut store = Store::new(&engine, state);
        let instance = linker.instantiate(&mut store, &module)?;
        let init = instance.get_typed_func::<(), ()>(&mut store, "init")?;
        init.call(&mut store, ())
    }

    #[test]
    fn write_emits_one_line_per_call() {
        let sink = Capture::default();
        run_init(
            r#"(module
                (import "env" "write" (func $write (param i32 i32 i32)))
                (memory (export "memory") 1)
                (data (i32.const 16) "hello")
                (func (export "init")
                    (call $write (i32.const 0) (i32.const 16) (i32.const 5))))"#,
            HostState::with_output(sink.clone()),
        )
        .unwrap();

        assert_eq!(sink.contents(), "hello\n");
    }

    #[test]
    fn write_ignores_channel_selector() {
        let sink = Capture::default();
        run_init(
            r#"(module
                (import "env" "write" (func $write (param i32 i32 i32)))
                (memory (export "memory") 1)
                (data (i32.const 0) "a")
                (func (export "init")
                    (call $write (i32.const -1) (i32.const 0) (i32.const 1))
                    (call $write (i32.const 7) (i32.const 0) (i32.const 1))))"#,
            HostState::with_output(sink.clone()),
        )
        .unwrap();

        assert_eq!(sink.contents(), "a\na\n");
    }

    #[test]
    fn write_of_empty_range_is_an_empty_line() {
        let sink = Capture::default();
        run_init(
            r#"(module
                (import "env" "write" (func $write (param i32 i32 i32)))
                (memory (export "memory") 1)
                (func (export "init")
                    (call $write (i32.const 0) (i32.const 0) (i32.const 0))))"#,
            HostState::with_output(sink.clone()),
        )
        .unwrap();

        assert_eq!(sink.contents(), "\n");
    }
}
