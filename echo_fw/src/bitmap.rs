//! BMP encode/decode for the two pixel formats the engine trades in: a
//! 16-bit RGB565 `BI_BITFIELDS` bitmap for device bitmaps, and a 1bpp
//! monochrome bitmap for font glyphs.
//!
//! Both directions are bounds-checked the same way `binary.rs` is; a
//! truncated or malformed BMP becomes `InvalidFormat`, never a panic.

use crate::binary;
use crate::error::{EngineError, Result};

const FILE_HEADER_SIZE: usize = 14;
const DIB_HEADER_SIZE: u32 = 40;
const MAX_DIMENSION: u32 = 10_000;
const MAX_MONO_DIMENSION: u32 = 100;

const RGB565_MASKS: [u32; 3] = [0xF800, 0x07E0, 0x001F];
const RGB565_HEADER_SIZE: usize = FILE_HEADER_SIZE + DIB_HEADER_SIZE as usize + 12;

const MONO_PALETTE: [u32; 2] = [0x00FF_FFFF, 0x0000_0000];
const MONO_HEADER_SIZE: usize = FILE_HEADER_SIZE + DIB_HEADER_SIZE as usize + MONO_PALETTE.len() * 4;

fn row_stride(bitcount: u32, width: u32) -> usize {
    (((bitcount as usize) * width as usize + 31) / 32) * 4
}

fn check_dimensions(width: u32, height: u32, max: u32) -> Result<()> {
    if width == 0 || height == 0 || width > max || height > max {
        return Err(EngineError::InvalidDimensions {
            width: width as i64,
            height: height as i64,
        });
    }
    Ok(())
}

/// Encode a top-down, row-major buffer of RGB565 pixels as a 16bpp
/// `BI_BITFIELDS` BMP. Pixel data is written bottom-up, 4-byte padded, per
/// the BMP format.
pub fn encode_rgb565_bmp(width: u32, height: u32, pixels: &[u16]) -> Result<Vec<u8>> {
    check_dimensions(width, height, MAX_DIMENSION)?;
    if pixels.len() != (width * height) as usize {
        return Err(EngineError::InvalidPayloadSize {
            expected: (width * height) as usize * 2,
            actual: pixels.len() * 2,
        });
    }

    let stride = row_stride(16, width);
    let pixel_data_size = stride * height as usize;
    let total = RGB565_HEADER_SIZE + pixel_data_size;
    let mut buf = vec![0u8; total];

    buf[0] = b'B';
    buf[1] = b'M';
    binary::write_u32_le(&mut buf, 2, total as u32)?;
    binary::write_u32_le(&mut buf, 10, RGB565_HEADER_SIZE as u32)?;

    binary::write_u32_le(&mut buf, 14, DIB_HEADER_SIZE)?;
    binary::write_u32_le(&mut buf, 18, width)?;
    binary::write_u32_le(&mut buf, 22, height)?; // positive => bottom-up
    binary::write_u16_le(&mut buf, 26, 1)?; // planes
    binary::write_u16_le(&mut buf, 28, 16)?; // bitcount
    binary::write_u32_le(&mut buf, 30, 3)?; // BI_BITFIELDS
    binary::write_u32_le(&mut buf, 34, pixel_data_size as u32)?;
    binary::write_u32_le(&mut buf, 38, 0)?;
    binary::write_u32_le(&mut buf, 42, 0)?;
    binary::write_u32_le(&mut buf, 46, 0)?;
    binary::write_u32_le(&mut buf, 50, 0)?;
    for (i, mask) in RGB565_MASKS.iter().enumerate() {
        binary::write_u32_le(&mut buf, FILE_HEADER_SIZE + DIB_HEADER_SIZE as usize + i * 4, *mask)?;
    }

    for file_row in 0..height as usize {
        let image_row = height as usize - 1 - file_row;
        let row_base = RGB565_HEADER_SIZE + file_row * stride;
        for col in 0..width as usize {
            let pixel = pixels[image_row * width as usize + col];
            binary::write_u16_le(&mut buf, row_base + col * 2, pixel)?;
        }
    }
    Ok(buf)
}

/// Decode a 16bpp `BI_BITFIELDS` RGB565 BMP into top-down, row-major pixels.
pub fn decode_rgb565_bmp(bmp: &[u8]) -> Result<(u32, u32, Vec<u16>)> {
    if bmp.len() < FILE_HEADER_SIZE + DIB_HEADER_SIZE as usize || &bmp[0..2] != b"BM" {
        return Err(EngineError::InvalidFormat("missing BM signature"));
    }
    let pixel_offset = binary::read_u32_le(bmp, 10)? as usize;
    let dib_size = binary::read_u32_le(bmp, 14)?;
    if dib_size != DIB_HEADER_SIZE {
        return Err(EngineError::InvalidFormat("unsupported DIB header size"));
    }
    let width = binary::read_u32_le(bmp, 18)?;
    let height = binary::read_i32_le(bmp, 22)?;
    if height <= 0 {
        return Err(EngineError::InvalidFormat("top-down BMPs are not supported"));
    }
    let height = height as u32;
    check_dimensions(width, height, MAX_DIMENSION)?;

    let bitcount = binary::read_u16_le(bmp, 28)?;
    if bitcount != 16 {
        return Err(EngineError::InvalidFormat("expected a 16bpp bitmap"));
    }
    let compression = binary::read_u32_le(bmp, 30)?;
    if compression != 3 {
        return Err(EngineError::InvalidFormat("expected BI_BITFIELDS compression"));
    }
    for (i, expected) in RGB565_MASKS.iter().enumerate() {
        let mask = binary::read_u32_le(bmp, FILE_HEADER_SIZE + DIB_HEADER_SIZE as usize + i * 4)?;
        if mask != *expected {
            return Err(EngineError::InvalidFormat("expected RGB565 colour masks"));
        }
    }

    let stride = row_stride(16, width);
    let mut pixels = vec![0u16; (width * height) as usize];
    for file_row in 0..height as usize {
        let image_row = height as usize - 1 - file_row;
        let row_base = pixel_offset + file_row * stride;
        for col in 0..width as usize {
            pixels[image_row * width as usize + col] = binary::read_u16_le(bmp, row_base + col * 2)?;
        }
    }
    Ok((width, height, pixels))
}

/// Encode a top-down, row-major buffer of booleans (`true` = foreground) as
/// a 1bpp BMP with a fixed white/black palette.
pub fn encode_mono_bmp(width: u32, height: u32, bits: &[bool]) -> Result<Vec<u8>> {
    check_dimensions(width, height, MAX_MONO_DIMENSION)?;
    if bits.len() != (width * height) as usize {
        return Err(EngineError::InvalidPayloadSize {
            expected: (width * height) as usize,
            actual: bits.len(),
        });
    }

    let stride = row_stride(1, width);
    let pixel_data_size = stride * height as usize;
    let total = MONO_HEADER_SIZE + pixel_data_size;
    let mut buf = vec![0u8; total];

    buf[0] = b'B';
    buf[1] = b'M';
    binary::write_u32_le(&mut buf, 2, total as u32)?;
    binary::write_u32_le(&mut buf, 10, MONO_HEADER_SIZE as u32)?;

    binary::write_u32_le(&mut buf, 14, DIB_HEADER_SIZE)?;
    binary::write_u32_le(&mut buf, 18, width)?;
    binary::write_u32_le(&mut buf, 22, height)?;
    binary::write_u16_le(&mut buf, 26, 1)?;
    binary::write_u16_le(&mut buf, 28, 1)?; // bitcount
    binary::write_u32_le(&mut buf, 30, 0)?; // BI_RGB
    binary::write_u32_le(&mut buf, 34, pixel_data_size as u32)?;
    binary::write_u32_le(&mut buf, 38, 0)?;
    binary::write_u32_le(&mut buf, 42, 0)?;
    binary::write_u32_le(&mut buf, 46, MONO_PALETTE.len() as u32)?;
    binary::write_u32_le(&mut buf, 50, MONO_PALETTE.len() as u32)?;
    for (i, colour) in MONO_PALETTE.iter().enumerate() {
        binary::write_u32_le(&mut buf, FILE_HEADER_SIZE + DIB_HEADER_SIZE as usize + i * 4, *colour)?;
    }

    for file_row in 0..height as usize {
        let image_row = height as usize - 1 - file_row;
        let row_base = MONO_HEADER_SIZE + file_row * stride;
        for col in 0..width as usize {
            if bits[image_row * width as usize + col] {
                let byte_idx = row_base + col / 8;
                buf[byte_idx] |= 1 << (7 - (col % 8));
            }
        }
    }
    Ok(buf)
}

/// Decode a 1bpp BMP into top-down, row-major booleans (`true` = foreground,
/// palette index 1).
pub fn decode_mono_bmp(bmp: &[u8]) -> Result<(u32, u32, Vec<bool>)> {
    if bmp.len() < FILE_HEADER_SIZE + DIB_HEADER_SIZE as usize || &bmp[0..2] != b"BM" {
        return Err(EngineError::InvalidFormat("missing BM signature"));
    }
    let pixel_offset = binary::read_u32_le(bmp, 10)? as usize;
    let dib_size = binary::read_u32_le(bmp, 14)?;
    if dib_size != DIB_HEADER_SIZE {
        return Err(EngineError::InvalidFormat("unsupported DIB header size"));
    }
    let width = binary::read_u32_le(bmp, 18)?;
    let height = binary::read_i32_le(bmp, 22)?;
    if height <= 0 {
        return Err(EngineError::InvalidFormat("top-down BMPs are not supported"));
    }
    let height = height as u32;
    check_dimensions(width, height, MAX_MONO_DIMENSION)?;

    let bitcount = binary::read_u16_le(bmp, 28)?;
    if bitcount != 1 {
        return Err(EngineError::InvalidFormat("expected a 1bpp bitmap"));
    }

    let stride = row_stride(1, width);
    let mut bits = vec![false; (width * height) as usize];
    for file_row in 0..height as usize {
        let image_row = height as usize - 1 - file_row;
        let row_base = pixel_offset + file_row * stride;
        for col in 0..width as usize {
            let byte = binary::read_u8(bmp, row_base + col / 8)?;
            bits[image_row * width as usize + col] = (byte >> (7 - (col % 8))) & 1 == 1;
        }
    }
    Ok((width, height, bits))
}
