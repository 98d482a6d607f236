//! Locates the fixed-offset registers and the scored `LARGE_BASE` window
//! that together make up a firmware image's font addresses.
//!
//! Mirrors the shape of `ec_binary.rs`'s version-cookie parsing: read a
//! fixed-offset register, validate it, and hand back a small typed record
//! rather than raw integers.

use log::{debug, trace, warn};

use crate::binary;
use crate::error::Result;
use crate::font::{self, Variant, LARGE_BASE_CODEPOINT};

pub const SMALL_BASE_LO_OFFSET: usize = 0x78;
pub const SMALL_BASE_HI_OFFSET: usize = 0x7A;
pub const LOOKUP_TABLE_BASE: u32 = 0x080000;

/// Lower bound of the `LARGE_BASE` candidate sweep. There is no guarantee
/// this is correct for every firmware revision; it is the only value the
/// known samples have ever needed.
pub const LARGE_BASE_SEARCH_START: usize = 0x10000;
const LARGE_BASE_SEARCH_MARGIN: usize = 10_000;
const LARGE_BASE_SEARCH_CEILING: usize = 0x200000;
const LARGE_BASE_STRIDE: usize = 33;
const LARGE_BASE_SLOT_COUNT: usize = 100;
const FOOTER_SCORE_BYTES: [u8; 7] = [0x8F, 0x90, 0x89, 0x8B, 0x8D, 0x8E, 0x8C];
const FOOTER_PADDING_BYTES: [u8; 2] = [0x00, 0xFF];

const MOVW_OPCODE_MASK: u16 = 0xFBF0;
const MOVW_OPCODE: u16 = 0xF2C0;
const MOVW_SCAN_LEN: usize = 0x4000;

/// The three addresses cached after one analyzer pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareAddresses {
    pub small_base: u32,
    pub large_base: u32,
    pub lookup_table: u32,
}

/// A non-fatal signal about how much to trust the addresses above.
#[derive(Debug, Clone, PartialEq)]
pub struct Confidence {
    pub movw_pattern_count: usize,
    pub small_font_decodes: bool,
    pub large_font_decodes: bool,
}

impl Confidence {
    pub fn is_low(&self) -> bool {
        !self.small_font_decodes || !self.large_font_decodes
    }
}

pub(crate) fn small_glyph_address(small_base: u32, codepoint: u32) -> u32 {
    small_base.wrapping_add(codepoint.wrapping_mul(32))
}

pub(crate) fn large_glyph_address(large_base: u32, codepoint: u32) -> u32 {
    large_base.wrapping_add((codepoint - LARGE_BASE_CODEPOINT).wrapping_mul(33))
}

fn read_small_base(firmware: &[u8]) -> Result<u32> {
    let lo = binary::read_u16_le(firmware, SMALL_BASE_LO_OFFSET)? as u32;
    let hi = binary::read_u16_le(firmware, SMALL_BASE_HI_OFFSET)? as u32;
    Ok((hi << 16) | lo)
}

/// Score one candidate `LARGE_BASE` by counting plausible row-33 footers.
/// Returns `None` immediately if an obvious padding footer is seen, so
/// clearly-wrong candidates don't cost a full 100-slot walk.
fn score_candidate(firmware: &[u8], base: usize) -> Option<u32> {
    let mut score = 0u32;
    for slot in 0..LARGE_BASE_SLOT_COUNT {
        let footer_offset = base + LARGE_BASE_STRIDE * slot + 32;
        let footer = *firmware.get(footer_offset)?;
        if FOOTER_PADDING_BYTES.contains(&footer) {
            return Some(score);
        }
        if FOOTER_SCORE_BYTES.contains(&footer) {
            score += 1;
        }
    }
    Some(score)
}

fn find_large_base(firmware: &[u8]) -> Option<u32> {
    let ceiling = firmware
        .len()
        .saturating_sub(LARGE_BASE_SEARCH_MARGIN)
        .min(LARGE_BASE_SEARCH_CEILING);
    if LARGE_BASE_SEARCH_START >= ceiling {
        return None;
    }

    let mut best: Option<(usize, u32)> = None;
    let mut candidate = LARGE_BASE_SEARCH_START;
    while candidate < ceiling {
        if let Some(score) = score_candidate(firmware, candidate) {
            trace!("LARGE_BASE candidate {candidate:#x} scored {score}");
            if best.map(|(_, best_score)| score > best_score).unwrap_or(true) {
                best = Some((candidate, score));
            }
        }
        candidate += LARGE_BASE_STRIDE;
    }
    best.map(|(offset, _)| offset as u32)
}

fn count_movw_patterns(firmware: &[u8]) -> usize {
    let end = firmware.len().min(MOVW_SCAN_LEN);
    firmware[..end]
        .chunks_exact(2)
        .filter(|pair| {
            let word = u16::from_le_bytes([pair[0], pair[1]]);
            word & MOVW_OPCODE_MASK == MOVW_OPCODE
        })
        .count()
}

/// Run the analyzer once over a firmware image, producing the cached
/// addresses plus a confidence record. Never fails: a firmware with no
/// plausible `LARGE_BASE` just gets `large_base == 0` and low confidence,
/// matching the spec's "report, don't reject" stance on detection quality.
pub fn analyze(firmware: &[u8]) -> Result<(FirmwareAddresses, Confidence)> {
    let small_base = read_small_base(firmware)?;
    let large_base = find_large_base(firmware).unwrap_or(0);
    debug!("SMALL_BASE={small_base:#x} LARGE_BASE={large_base:#x}");

    let addresses = FirmwareAddresses {
        small_base,
        large_base,
        lookup_table: LOOKUP_TABLE_BASE,
    };

    let small_addr = small_glyph_address(small_base, 'A' as u32) as usize;
    let small_font_decodes = read_lookup(firmware, 'A' as u32)
        .ok()
        .and_then(|lookup| firmware.get(small_addr..small_addr + 32).map(|c| (c, lookup)))
        .map(|(chunk, lookup)| font::is_valid_chunk(chunk, lookup, Variant::Small))
        .unwrap_or(false);

    let large_addr = large_glyph_address(large_base, LARGE_BASE_CODEPOINT) as usize;
    let large_font_decodes = read_lookup(firmware, LARGE_BASE_CODEPOINT)
        .ok()
        .and_then(|lookup| firmware.get(large_addr..large_addr + 33).map(|c| (c, lookup)))
        .map(|(chunk, lookup)| font::is_valid_chunk(chunk, lookup, Variant::Large))
        .unwrap_or(false);

    let confidence = Confidence {
        movw_pattern_count: count_movw_patterns(firmware),
        small_font_decodes,
        large_font_decodes,
    };
    if confidence.is_low() {
        warn!("firmware analysis has low confidence: {confidence:?}");
    }

    Ok((addresses, confidence))
}

pub(crate) fn read_lookup(firmware: &[u8], codepoint: u32) -> Result<u8> {
    binary::read_u8(firmware, (LOOKUP_TABLE_BASE + (codepoint >> 3)) as usize)
}
