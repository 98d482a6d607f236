//! Builds a small synthetic firmware image exercising every subsystem at
//! once: analyzer registers, a scored `LARGE_BASE` region, both glyph
//! variants, and a one-entry resource directory. Shared by `engine.rs`'s
//! tests so they don't each re-derive the same offset arithmetic.

use crate::analyzer::{SMALL_BASE_HI_OFFSET, SMALL_BASE_LO_OFFSET};
use crate::binary;
use crate::directory::{PART5_OFFSET_FIELD, PART5_SIZE_FIELD};
use crate::font::{self, PixelGrid};

const FIRMWARE_LEN: usize = 0x100000;
const SMALL_BASE: u32 = 0x9000;
const LARGE_BASE: u32 = 0x10000;
const LARGE_BASE_SLOT_COUNT: usize = 100;
const LARGE_BASE_STRIDE: usize = 33;
const LARGE_BASE_FOOTER_BYTE: u8 = 0x8F;

const PART5_OFFSET: u32 = 0x90000;
const PART5_SIZE: u32 = 0x2000;
const ROCK26_POS: usize = 0x10;
const ANCHOR_COUNT_OFFSET: usize = 16;
const ANCHOR_ENTRIES_OFFSET: usize = 32;
const ANCHOR_OFFSET_FIELD: usize = 12;
const TABLE_START: usize = 0x200;
const METADATA_OFFSET_FIELD: usize = 20;
const METADATA_WIDTH_FIELD: usize = 24;
const METADATA_HEIGHT_FIELD: usize = 28;
const METADATA_NAME_FIELD: usize = 32;

const PAYLOAD_OFFSET: u32 = 0x500;
const ICON_WIDTH: u32 = 4;
const ICON_HEIGHT: u32 = 4;

fn glyph_pattern() -> PixelGrid {
    let mut grid = [[false; font::GLYPH_COLS]; font::GLYPH_ROWS];
    for row in 0..font::GLYPH_ROWS {
        for col in 0..8 {
            grid[row][col] = (row + col) % 2 == 0;
        }
    }
    grid
}

pub(crate) fn synthetic_firmware() -> Vec<u8> {
    let mut fw = vec![0u8; FIRMWARE_LEN];

    binary::write_u16_le(&mut fw, SMALL_BASE_LO_OFFSET, (SMALL_BASE & 0xFFFF) as u16).unwrap();
    binary::write_u16_le(&mut fw, SMALL_BASE_HI_OFFSET, (SMALL_BASE >> 16) as u16).unwrap();

    for slot in 0..LARGE_BASE_SLOT_COUNT {
        let footer = LARGE_BASE as usize + LARGE_BASE_STRIDE * slot + 32;
        fw[footer] = LARGE_BASE_FOOTER_BYTE;
    }

    let pattern = glyph_pattern();
    let lookup_val = 0u8; // lookup table region is left zeroed, so every codepoint reads back 0.

    let small_addr = (SMALL_BASE + ('A' as u32) * 32) as usize;
    let small_chunk = font::encode_v8(&pattern, lookup_val);
    fw[small_addr..small_addr + 32].copy_from_slice(&small_chunk);

    let large_addr = LARGE_BASE as usize;
    let large_chunk = font::encode_v8(&pattern, lookup_val);
    fw[large_addr..large_addr + 32].copy_from_slice(&large_chunk);

    binary::write_u32_le(&mut fw, PART5_OFFSET_FIELD, PART5_OFFSET).unwrap();
    binary::write_u32_le(&mut fw, PART5_SIZE_FIELD, PART5_SIZE).unwrap();

    let part5_start = PART5_OFFSET as usize;
    {
        let part5 = &mut fw[part5_start..part5_start + PART5_SIZE as usize];
        part5[ROCK26_POS..ROCK26_POS + 14].copy_from_slice(b"ROCK26IMAGERES");
        part5[ROCK26_POS + ANCHOR_COUNT_OFFSET..ROCK26_POS + ANCHOR_COUNT_OFFSET + 4]
            .copy_from_slice(&1u32.to_le_bytes());
        let anchor_entry = ROCK26_POS + ANCHOR_ENTRIES_OFFSET;
        part5[anchor_entry + ANCHOR_OFFSET_FIELD..anchor_entry + ANCHOR_OFFSET_FIELD + 4]
            .copy_from_slice(&PAYLOAD_OFFSET.to_le_bytes());

        let p = TABLE_START;
        part5[p + METADATA_OFFSET_FIELD..p + METADATA_OFFSET_FIELD + 4]
            .copy_from_slice(&PAYLOAD_OFFSET.to_le_bytes());
        part5[p + METADATA_WIDTH_FIELD..p + METADATA_WIDTH_FIELD + 4]
            .copy_from_slice(&ICON_WIDTH.to_le_bytes());
        part5[p + METADATA_HEIGHT_FIELD..p + METADATA_HEIGHT_FIELD + 4]
            .copy_from_slice(&ICON_HEIGHT.to_le_bytes());
        let name = b"ICON.BMP";
        part5[p + METADATA_NAME_FIELD..p + METADATA_NAME_FIELD + name.len()].copy_from_slice(name);

        let payload_start = PAYLOAD_OFFSET as usize;
        for i in 0..(ICON_WIDTH * ICON_HEIGHT) as usize {
            let val = (i as u16).wrapping_mul(0x1111);
            part5[payload_start + i * 2..payload_start + i * 2 + 2].copy_from_slice(&val.to_be_bytes());
        }
    }

    fw
}
