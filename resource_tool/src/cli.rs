//! Commandline argument definitions, factored out of `main.rs` the way the
//! library separates argument parsing from argument handling.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use echo_fw::font::Variant;

/// Inspect and patch Echo Mini firmware resources
#[derive(Parser)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Small,
    Large,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Variant {
        match v {
            VariantArg::Small => Variant::Small,
            VariantArg::Large => Variant::Large,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List every bitmap the resource directory resolves
    ListBitmaps { firmware: PathBuf },
    /// Dump one bitmap to a BMP file
    ReadBitmap {
        firmware: PathBuf,
        name: String,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Replace one bitmap's pixels from a BMP file, writing the modified
    /// image to a separate output file
    ReplaceBitmap {
        firmware: PathBuf,
        name: String,
        payload: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// List font planes and which glyph variant each uses
    ListPlanes { firmware: PathBuf },
    /// Dump one glyph to a 1bpp BMP file
    ReadFont {
        firmware: PathBuf,
        /// Code point, as a decimal number, 0x-hex, or U+ notation
        codepoint: String,
        variant: VariantArg,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Replace one glyph's pixels from a 1bpp BMP file, writing the
    /// modified image to a separate output file
    ReplaceFont {
        firmware: PathBuf,
        codepoint: String,
        variant: VariantArg,
        payload: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Run the analyzer and report the addresses it found plus confidence
    Analyze { firmware: PathBuf },
}

/// Accept "65", "0x41", and "U+0041" as the same code point.
pub fn parse_codepoint(raw: &str) -> Result<u32, std::num::ParseIntError> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("U+").or_else(|| raw.strip_prefix("u+")) {
        return u32::from_str_radix(hex, 16);
    }
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16);
    }
    raw.parse::<u32>()
}
