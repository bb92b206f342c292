use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hex2coe_rs::config::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use hex2coe_rs::{convert_file, write_coe_file, ConversionStats, ConvertConfig, Warning};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert an @-addressed hex listing into a Xilinx COE file for block RAM init"
)]
struct Opts {
    /// Input hex listing
    #[arg(value_name = "HEXFILE", default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Output COE file
    #[arg(value_name = "COEFILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Memory depth in 32-bit words (hex or dec) [default: 2048]
    #[arg(short, long, value_parser = parse_usize)]
    depth: Option<usize>,
    /// Word stored in slots the input never writes (hex or dec) [default: 0x33]
    #[arg(short, long, value_parser = parse_u32)]
    fill: Option<u32>,
    /// Load depth/fill from a JSON file; flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Write a JSON report (stats and warnings) after a successful conversion
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn parse_usize(s: &str) -> Result<usize> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(usize::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<usize>()?)
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    input: &'a PathBuf,
    output: &'a PathBuf,
    config: ConvertConfig,
    stats: ConversionStats,
    warnings: &'a [Warning],
}

fn load_config(opts: &Opts) -> Result<ConvertConfig> {
    let mut cfg = match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ConvertConfig::default(),
    };
    if let Some(depth) = opts.depth {
        cfg.mem_depth = depth;
    }
    if let Some(fill) = opts.fill {
        cfg.fill_value = fill;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn check_input(path: &Path) -> Result<()> {
    if !path.exists() {
        error!("'{}' not found", path.display());
        if let Ok(cwd) = std::env::current_dir() {
            info!("Current directory: {}", cwd.display());
        }
        anyhow::bail!("input file '{}' not found", path.display());
    }
    Ok(())
}

fn write_report(path: &Path, report: &Report<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("writing report {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();
    let cfg = load_config(&opts)?;

    check_input(&opts.input)?;

    let conv = convert_file(&opts.input, &cfg).context("translation failed")?;
    write_coe_file(&opts.output, &conv.image).context("translation failed")?;

    let depth = conv.image.depth();
    info!("Conversion complete");
    info!("  Input:  {}", opts.input.display());
    info!("  Output: {}", opts.output.display());
    info!(
        "  Memory: {depth} words ({} bytes = {}KB)",
        conv.image.byte_size(),
        conv.image.byte_size() / 1024
    );
    info!(
        "  Words written: {} ({} dropped, {} warnings)",
        conv.stats.words_written,
        conv.stats.words_dropped,
        conv.warnings.len()
    );
    info!("First 5 instructions:");
    for (i, word) in conv.image.words().iter().take(5).enumerate() {
        info!("  [0x{:04X}] 0x{word:08X}", i * 4);
    }
    info!("Load {} in the Block Memory Generator (depth {depth}, width 32)", opts.output.display());

    if let Some(path) = &opts.report {
        let report = Report {
            input: &opts.input,
            output: &opts.output,
            config: cfg,
            stats: conv.stats,
            warnings: &conv.warnings,
        };
        // the COE file is already in place, a lost report does not fail the run
        if let Err(e) = write_report(path, &report) {
            warn!("{e:#}");
        }
    }

    Ok(())
}
