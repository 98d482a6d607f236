//! Top-level entry point: ties the analyzer, the resource directory, the
//! font codec, and the BMP codec together behind a single owning struct
//! that holds the firmware buffer and mutates it in place.

use log::{debug, info};

use crate::analyzer::{self, Confidence, FirmwareAddresses};
use crate::binary;
use crate::bitmap;
use crate::directory::{BitmapEntry, ResourceDirectory};
use crate::error::{EngineError, Result};
use crate::font::{self, FontPlane, PixelGrid, Variant, LARGE_BASE_CODEPOINT};

/// Owns a firmware image plus everything learned about it: the analyzer's
/// register addresses, its confidence in those addresses, and the parsed
/// bitmap directory. All mutation happens in place on the owned buffer.
pub struct Engine {
    firmware: Vec<u8>,
    addresses: FirmwareAddresses,
    confidence: Confidence,
    directory: ResourceDirectory,
}

fn plane_variant(plane: &FontPlane) -> Variant {
    if plane.start >= LARGE_BASE_CODEPOINT {
        Variant::Large
    } else {
        Variant::Small
    }
}

impl Engine {
    /// Run the analyzer and parse the resource directory over a firmware
    /// image. Analyzer confidence issues are reported, not rejected; a
    /// malformed Part 5 (no `ROCK26IMAGERES` anchor) is rejected, since
    /// without it there is nothing to enumerate or mutate.
    pub fn load(firmware: Vec<u8>) -> Result<Engine> {
        let (addresses, confidence) = analyzer::analyze(&firmware)?;
        let directory = ResourceDirectory::parse(&firmware)?;
        info!(
            "loaded {} byte firmware image, {} bitmaps, misalignment {}",
            firmware.len(),
            directory.list_bitmaps().len(),
            directory.misalignment
        );
        Ok(Engine {
            firmware,
            addresses,
            confidence,
            directory,
        })
    }

    pub fn addresses(&self) -> FirmwareAddresses {
        self.addresses
    }

    pub fn confidence(&self) -> &Confidence {
        &self.confidence
    }

    pub fn list_bitmaps(&self) -> Vec<BitmapEntry> {
        self.directory.list_bitmaps()
    }

    pub fn list_planes(&self) -> Vec<(&'static FontPlane, Variant)> {
        font::FONT_PLANES.iter().map(|p| (p, plane_variant(p))).collect()
    }

    /// Translate a Part-5-relative payload range into an absolute firmware
    /// range, checking both bounds the spec calls out: the payload must
    /// start inside Part 5, and must not run past the end of the image.
    fn resolve_payload_range(&self, payload_offset: u32, payload_size: u32) -> Result<(usize, usize)> {
        let part5_size = self.directory.part5_size as usize;
        let payload_offset = payload_offset as usize;
        let payload_size = payload_size as usize;
        if payload_offset >= part5_size {
            return Err(EngineError::OutOfBounds {
                offset: payload_offset,
                len: payload_size,
                buf_len: part5_size,
            });
        }
        let abs_start = self.directory.part5_offset as usize + payload_offset;
        let abs_end = abs_start + payload_size;
        if abs_end > self.firmware.len() {
            return Err(EngineError::OutOfBounds {
                offset: abs_start,
                len: payload_size,
                buf_len: self.firmware.len(),
            });
        }
        Ok((abs_start, abs_end))
    }

    /// Read a bitmap's pixels as top-down, row-major RGB565 values. On-flash
    /// pixel bytes are big-endian; BMP files are little-endian.
    pub fn read_bitmap_pixels(&self, name: &str) -> Result<(u32, u32, Vec<u16>)> {
        let entry = self.directory.resolve_by_name(name)?;
        let (start, end) = self.resolve_payload_range(entry.offset, entry.size)?;
        let mut pixels = Vec::with_capacity((entry.width * entry.height) as usize);
        let mut p = start;
        while p < end {
            pixels.push(binary::read_u16_be(&self.firmware, p)?);
            p += 2;
        }
        Ok((entry.width, entry.height, pixels))
    }

    pub fn read_bitmap_bmp(&self, name: &str) -> Result<Vec<u8>> {
        let (width, height, pixels) = self.read_bitmap_pixels(name)?;
        bitmap::encode_rgb565_bmp(width, height, &pixels)
    }

    pub fn replace_bitmap_pixels(&mut self, name: &str, pixels: &[u16]) -> Result<()> {
        let entry = self.directory.resolve_by_name(name)?;
        let expected = (entry.width * entry.height) as usize;
        if pixels.len() != expected {
            return Err(EngineError::InvalidPayloadSize {
                expected: expected * 2,
                actual: pixels.len() * 2,
            });
        }
        let (start, _end) = self.resolve_payload_range(entry.offset, entry.size)?;
        for (i, &pixel) in pixels.iter().enumerate() {
            binary::write_u16_be(&mut self.firmware, start + i * 2, pixel)?;
        }
        info!("replaced bitmap {name:?} ({}x{})", entry.width, entry.height);
        Ok(())
    }

    /// Replace a bitmap from a BMP buffer. The BMP's dimensions must match
    /// the directory entry exactly; this never resizes the payload region.
    pub fn replace_bitmap_bmp(&mut self, name: &str, bmp: &[u8]) -> Result<()> {
        let entry = self.directory.resolve_by_name(name)?;
        let (width, height, pixels) = bitmap::decode_rgb565_bmp(bmp)?;
        if width != entry.width || height != entry.height {
            return Err(EngineError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        self.replace_bitmap_pixels(name, &pixels)
    }

    fn font_address(&self, codepoint: u32) -> (Variant, usize) {
        if codepoint >= LARGE_BASE_CODEPOINT {
            (
                Variant::Large,
                analyzer::large_glyph_address(self.addresses.large_base, codepoint) as usize,
            )
        } else {
            (
                Variant::Small,
                analyzer::small_glyph_address(self.addresses.small_base, codepoint) as usize,
            )
        }
    }

    pub fn read_font_pixels(&self, codepoint: u32) -> Result<(Variant, PixelGrid)> {
        let (variant, addr) = self.font_address(codepoint);
        let lookup = analyzer::read_lookup(&self.firmware, codepoint)?;
        let chunk = self.firmware.get(addr..addr + variant.stride()).ok_or(EngineError::OutOfBounds {
            offset: addr,
            len: variant.stride(),
            buf_len: self.firmware.len(),
        })?;
        let grid = font::decode_v8(chunk, lookup)?;
        Ok((variant, grid))
    }

    pub fn read_font_bmp(&self, codepoint: u32) -> Result<Vec<u8>> {
        let (_, grid) = self.read_font_pixels(codepoint)?;
        let bits: Vec<bool> = grid.iter().flatten().copied().collect();
        bitmap::encode_mono_bmp(font::GLYPH_COLS as u32, font::GLYPH_ROWS as u32, &bits)
    }

    /// Encode a grid, reject it the same way detection would (uniform bytes
    /// or an implausible fill ratio), then decode it right back and compare
    /// against the input (ignoring the always-blank last column) before it
    /// ever touches the firmware buffer. A mismatch means the codec and the
    /// firmware's own format have drifted apart.
    fn encode_and_verify(grid: &PixelGrid, lookup: u8, variant: Variant) -> Result<[u8; 32]> {
        let chunk = font::encode_v8(grid, lookup);
        if !font::is_valid_chunk(&chunk, lookup, variant) {
            return Err(EngineError::InvalidPayloadContent(
                "encoded glyph is uniform or its fill ratio is out of bounds",
            ));
        }
        let decoded = font::decode_v8(&chunk, lookup)?;
        for row in 0..font::GLYPH_ROWS {
            for col in 0..font::GLYPH_COLS - 1 {
                if decoded[row][col] != grid[row][col] {
                    return Err(EngineError::CodecDisagreement);
                }
            }
        }
        Ok(chunk)
    }

    pub fn replace_font_pixels(&mut self, codepoint: u32, grid: &PixelGrid) -> Result<()> {
        let (variant, addr) = self.font_address(codepoint);
        let lookup = analyzer::read_lookup(&self.firmware, codepoint)?;
        if addr + variant.stride() > self.firmware.len() {
            return Err(EngineError::OutOfBounds {
                offset: addr,
                len: variant.stride(),
                buf_len: self.firmware.len(),
            });
        }
        let chunk = Self::encode_and_verify(grid, lookup, variant)?;
        self.firmware[addr..addr + 32].copy_from_slice(&chunk);
        debug!("replaced {variant:?} glyph for U+{codepoint:04X}");
        Ok(())
    }

    pub fn replace_font_bmp(&mut self, codepoint: u32, bmp: &[u8]) -> Result<()> {
        let (width, height, bits) = bitmap::decode_mono_bmp(bmp)?;
        if width as usize != font::GLYPH_COLS || height as usize != font::GLYPH_ROWS {
            return Err(EngineError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        let mut grid = [[false; font::GLYPH_COLS]; font::GLYPH_ROWS];
        for row in 0..font::GLYPH_ROWS {
            for col in 0..font::GLYPH_COLS {
                grid[row][col] = bits[row * font::GLYPH_COLS + col];
            }
        }
        self.replace_font_pixels(codepoint, &grid)
    }

    /// Hand back the (possibly mutated) firmware buffer.
    pub fn export(self) -> Vec<u8> {
        self.firmware
    }
}
