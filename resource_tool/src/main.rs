mod cli;

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use cli::{Cli, Command, VariantArg};
use echo_fw::font::{Variant, LARGE_BASE_CODEPOINT};
use echo_fw::Engine;

type BoxError = Box<dyn Error>;

fn load_engine(path: &Path) -> Result<Engine, BoxError> {
    let firmware = std::fs::read(path)?;
    Ok(Engine::load(firmware)?)
}

fn check_variant(codepoint: u32, requested: VariantArg) {
    let actual = if codepoint >= LARGE_BASE_CODEPOINT {
        Variant::Large
    } else {
        Variant::Small
    };
    if Variant::from(requested) != actual {
        warn!("U+{codepoint:04X} is a {actual:?} glyph; ignoring the requested variant");
    }
}

fn run(cli: Cli) -> Result<(), BoxError> {
    match cli.command {
        Command::ListBitmaps { firmware } => {
            let engine = load_engine(&firmware)?;
            for entry in engine.list_bitmaps() {
                println!(
                    "{:<24} {:>5}x{:<5} {:>8} bytes @ {:#x}",
                    entry.name, entry.width, entry.height, entry.size, entry.offset
                );
            }
        }
        Command::ReadBitmap { firmware, name, out } => {
            let engine = load_engine(&firmware)?;
            let bmp = engine.read_bitmap_bmp(&name)?;
            std::fs::write(&out, bmp)?;
            info!("wrote {}", out.display());
        }
        Command::ReplaceBitmap {
            firmware,
            name,
            payload,
            out,
        } => {
            let mut engine = load_engine(&firmware)?;
            let bmp = std::fs::read(&payload)?;
            engine.replace_bitmap_bmp(&name, &bmp)?;
            std::fs::write(&out, engine.export())?;
            info!("wrote {}", out.display());
        }
        Command::ListPlanes { firmware } => {
            let engine = load_engine(&firmware)?;
            for (plane, variant) in engine.list_planes() {
                println!(
                    "{:<24} U+{:04X}..U+{:04X} {:?}",
                    plane.name, plane.start, plane.end, variant
                );
            }
        }
        Command::ReadFont {
            firmware,
            codepoint,
            variant,
            out,
        } => {
            let codepoint = cli::parse_codepoint(&codepoint)?;
            check_variant(codepoint, variant);
            let engine = load_engine(&firmware)?;
            let bmp = engine.read_font_bmp(codepoint)?;
            std::fs::write(&out, bmp)?;
            info!("wrote {}", out.display());
        }
        Command::ReplaceFont {
            firmware,
            codepoint,
            variant,
            payload,
            out,
        } => {
            let codepoint = cli::parse_codepoint(&codepoint)?;
            check_variant(codepoint, variant);
            let mut engine = load_engine(&firmware)?;
            let bmp = std::fs::read(&payload)?;
            engine.replace_font_bmp(codepoint, &bmp)?;
            std::fs::write(&out, engine.export())?;
            info!("wrote {}", out.display());
        }
        Command::Analyze { firmware } => {
            let engine = load_engine(&firmware)?;
            let addresses = engine.addresses();
            let confidence = engine.confidence();
            println!("SMALL_BASE    {:#x}", addresses.small_base);
            println!("LARGE_BASE    {:#x}", addresses.large_base);
            println!("LOOKUP_TABLE  {:#x}", addresses.lookup_table);
            println!("movw patterns seen: {}", confidence.movw_pattern_count);
            println!("small font decodes: {}", confidence.small_font_decodes);
            println!("large font decodes: {}", confidence.large_font_decodes);
            if confidence.is_low() {
                println!("confidence: LOW");
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .format_target(false)
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
