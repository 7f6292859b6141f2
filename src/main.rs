//! Host bring-up tool for the FiveD hardware layer.
//!
//! Runs the same startup path the firmware does and prints the result:
//!
//! ```text
//! fived-hw [--config CONFIG.json] [RAW ...]
//! ```
//!
//! 1. Load the config (JSON file, or defaults when absent).
//! 2. Resolve the board and build the calibration table; any failure aborts.
//! 3. Print the resolved pin map.
//! 4. Convert each `RAW` argument (an averaged ADC value) to °C.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, info};

use fived_hw::adapters::config_store::JsonConfigFile;
use fived_hw::app::ports::ConfigPort;
use fived_hw::app::service::HardwareService;
use fived_hw::config::FirmwareConfig;

/// Resolve a FiveD motherboard and convert thermistor readings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON firmware config (defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// enable debug messages
    #[arg(short, long)]
    verbose: bool,

    /// averaged raw ADC values to convert
    raw: Vec<u16>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ── 1. Logging ────────────────────────────────────────────
    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter(None, LevelFilter::Debug);
    } else {
        builder.filter(None, LevelFilter::Info);
    }
    builder.init();
    info!("FiveD hardware layer v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config ─────────────────────────────────────────────
    let config = match &args.config {
        Some(path) => JsonConfigFile::new(path)
            .load()
            .with_context(|| format!("loading {}", path.display()))?,
        None => FirmwareConfig::default(),
    };

    // ── 3. Startup resolution (fatal on error) ────────────────
    let service = HardwareService::init(&config).context("hardware configuration rejected")?;
    let board = service.board();

    println!("{}", board.variant());
    for (role, pin) in board.assigned() {
        println!("  {:<32} {pin}", role.to_string());
    }

    // ── 4. Temperature conversion ─────────────────────────────
    if args.raw.is_empty() {
        return Ok(());
    }
    if service.calibration().is_none() {
        bail!("{} reads temperatures on its extruder controller", board.variant().name());
    }
    for raw in args.raw {
        if let Some(celsius) = service.convert(raw) {
            println!("raw {raw:>4} -> {celsius}\u{00b0}C");
        }
    }

    Ok(())
}
