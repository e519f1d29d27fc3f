mod keymap;
mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sdl2::pixels::Color;

/// Chip-8 emulator for the reduced instruction set
#[derive(Parser, Debug)]
#[command(name = "ocho", version, about)]
struct Args {
    /// Path to the program image to load at 0x200
    rom: PathBuf,

    /// Size in window pixels of one display cell
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// Color of lit cells, as RRGGBBAA hex
    #[arg(long, default_value = "FFFFFFFF", value_parser = parse_color)]
    fg: Color,

    /// Color of dark cells, as RRGGBBAA hex
    #[arg(long, default_value = "000000FF", value_parser = parse_color)]
    bg: Color,

    /// Draw lit cells flat, without the background-colored outline
    #[arg(long)]
    no_outlines: bool,

    /// Target instruction rate in Hz
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    clock_hz: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Parse an `RRGGBBAA` hex string (leading `#` allowed).
fn parse_color(arg: &str) -> Result<Color, String> {
    let hex = arg.trim_start_matches('#');
    if hex.len() != 8 {
        return Err(format!("expected RRGGBBAA, got {arg:?}"));
    }
    let raw = u32::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
    Ok(Color::RGBA(
        (raw >> 24) as u8,
        (raw >> 16) as u8,
        (raw >> 8) as u8,
        raw as u8,
    ))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("reading program image {}", args.rom.display()))?;
    info!("running {}", args.rom.display());

    run::run(&args, &rom)
}
