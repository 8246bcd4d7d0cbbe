//! # WebAssembly Host Bridge Daemon (hostbridged)
//!
//! A small daemon that loads a WebAssembly guest module and runs it against
//! the host bridge.
//!
//! This daemon provides:
//! - Loading of a guest module from a well-known location on disk
//! - The two host functions the guest links against (`env.write` and
//!   `env.assert_here`)
//! - A single invocation of the guest's exported `init` entry point
//!
//! ## Usage
//!
//! ```bash
//! hostbridged [wasm-file]
//! ```
//!
//! With no argument the daemon loads `index.wasm` from the current
//! directory, mirroring the fixed well-known location the guest is deployed
//! next to. Text-format modules are accepted too:
//!
//! ```bash
//! hostbridged demos/hello.wat
//! ```
//!
//! Guest output goes to stdout, one line per guest `write` call. Diagnostics
//! go to stderr through `tracing`; set `RUST_LOG` to adjust verbosity and
//! `RUST_LOG_FORMAT` to `json` or `compact` to change the format. Any load
//! or guest failure is fatal: the daemon logs it and exits non-zero.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use hostbridge::{Bridge, HostState};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// WebAssembly host bridge daemon CLI arguments
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the WebAssembly module to load and run
    #[arg(default_value = "index.wasm")]
    wasm_file: std::path::PathBuf,
}

fn main() -> Result<()> {
    // Initialize tracing
    initialize_tracing();

    // Parse command line arguments
    let args = Args::parse();

    // Read the WebAssembly file
    let wasm_bytes = load_wasm_file(&args.wasm_file)?;

    info!("Initializing host bridge");
    let bridge = Bridge::new()?;

    let inst_start = Instant::now();
    let mut guest = bridge.instantiate(&wasm_bytes, HostState::new())?;
    info!("Guest module instantiated in {:?}", inst_start.elapsed());

    if let Err(e) = guest.run_init() {
        error!("Guest initialization failed: {:#}", e);
        return Err(e);
    }

    debug!("Guest init returned");
    Ok(())
}

/// Initialize the tracing system for logging
fn initialize_tracing() {
    let format = env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match format.as_str() {
        "json" => subscriber.json().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.pretty().init(),
    }
}

/// Load a WebAssembly file from disk
fn load_wasm_file(path: &Path) -> Result<Vec<u8>> {
    debug!("Loading WebAssembly file: {}", path.display());

    let load_start = Instant::now();
    let wasm_bytes = fs::read(path)
        .with_context(|| format!("Failed to read WebAssembly file `{}`", path.display()))?;

    info!(
        "Loaded {} bytes of WebAssembly code in {:?}",
        wasm_bytes.len(),
        load_start.elapsed()
    );

    Ok(wasm_bytes)
}
