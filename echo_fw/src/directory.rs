//! Bitmap resource directory: locates Part 5, anchors on the
//! `ROCK26IMAGERES` signature, walks the metadata table backward to its
//! true start, and reconciles the metadata table's indexing against the
//! anchor table (the "misalignment" / Bootloader-reorganisation dance).
//!
//! The metadata-table walk is patterned on `pd_binary.rs`'s
//! magic-byte-gated row walk: read a fixed-size block, validate a marker,
//! only then trust the fields inside it.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::binary;
use crate::error::{EngineError, Result};

pub const PART5_OFFSET_FIELD: usize = 0x14C;
pub const PART5_SIZE_FIELD: usize = 0x150;

const ROCK26_SIGNATURE: &[u8] = b"ROCK26IMAGERES";
const ANCHOR_COUNT_OFFSET: usize = 16;
const ANCHOR_ENTRIES_OFFSET: usize = 32;
const ANCHOR_ENTRY_SIZE: usize = 16;
const ANCHOR_OFFSET_FIELD: usize = 12;

const METADATA_ENTRY_SIZE: usize = 108;
const METADATA_OFFSET_FIELD: usize = 20;
const METADATA_WIDTH_FIELD: usize = 24;
const METADATA_HEIGHT_FIELD: usize = 28;
const METADATA_NAME_FIELD: usize = 32;
const METADATA_NAME_LEN: usize = 64;

const MAX_MISALIGNMENT_SHIFT: i32 = 3;
const MAX_SHIFT_SAMPLES: usize = 20;
const MIN_NAME_LEN: usize = 3;
const MAX_DIMENSION: u32 = 10_000;

/// Heuristic sentinel values the Bootloader writes into a reorganised
/// entry's offset field. Used only to raise detection confidence in logs,
/// never to gate the misalignment vote itself.
pub const BOOTLOADER_SENTINELS: [u32; 5] =
    [0xF564_F564, 0xB7B5_D7B5, 0x0000_0000, 0xC308_C308, 0x4529_4529];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub offset: u32,
    pub width: u32,
    pub height: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapEntry {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub size: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionInfo {
    pub shift: i32,
    pub votes: BTreeMap<i32, u32>,
    pub low_confidence: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDirectory {
    pub part5_offset: u32,
    pub part5_size: u32,
    pub table_start: usize,
    pub entries: Vec<MetadataEntry>,
    pub anchor_offsets: Vec<u32>,
    pub misalignment: i32,
    pub detection: DetectionInfo,
}

fn is_printable(byte: u8) -> bool {
    // 0x20..=0x7E already covers '.', '_', '-', '(', ')', ',', ' '.
    (0x20..=0x7E).contains(&byte)
}

/// Decode a name field: stop at the first NUL, drop non-ASCII bytes.
fn decode_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    raw[..end].iter().filter(|&&b| b < 0x80).map(|&b| b as char).collect()
}

fn is_printable_bmp_name(raw: &[u8]) -> Option<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let candidate = &raw[..end];
    if !candidate.iter().all(|&b| is_printable(b)) {
        return None;
    }
    let name: String = candidate.iter().map(|&b| b as char).collect();
    if name.len() >= MIN_NAME_LEN && name.ends_with(".BMP") {
        Some(name)
    } else {
        None
    }
}

/// Slice the firmware image down to Part 5 using the fixed-offset descriptor.
pub fn locate_part5(firmware: &[u8]) -> Result<(u32, u32)> {
    let offset = binary::read_u32_le(firmware, PART5_OFFSET_FIELD)?;
    let size = binary::read_u32_le(firmware, PART5_SIZE_FIELD)?;
    let end = offset as usize + size as usize;
    if end > firmware.len() {
        return Err(EngineError::OutOfBounds {
            offset: offset as usize,
            len: size as usize,
            buf_len: firmware.len(),
        });
    }
    Ok((offset, size))
}

fn read_anchor_offsets(part5: &[u8], rock26_pos: usize) -> Result<Vec<u32>> {
    let count = binary::read_u32_le(part5, rock26_pos + ANCHOR_COUNT_OFFSET)?;
    let mut offsets = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let entry = rock26_pos + ANCHOR_ENTRIES_OFFSET + i * ANCHOR_ENTRY_SIZE;
        match binary::read_u32_le(part5, entry + ANCHOR_OFFSET_FIELD) {
            Ok(offset) => offsets.push(offset),
            Err(_) => break,
        }
    }
    Ok(offsets)
}

fn find_metadata_candidates(part5: &[u8], anchor_offset: u32) -> Vec<usize> {
    let mut candidates = Vec::new();
    let mut p = 0usize;
    while p + METADATA_NAME_FIELD + METADATA_NAME_LEN <= part5.len() {
        if let Ok(offset) = binary::read_u32_le(part5, p + METADATA_OFFSET_FIELD) {
            if offset == anchor_offset {
                let name_field = &part5[p + METADATA_NAME_FIELD..p + METADATA_NAME_FIELD + METADATA_NAME_LEN];
                if is_printable_bmp_name(name_field).is_some() {
                    candidates.push(p);
                }
            }
        }
        p += 4;
    }
    candidates
}

fn walk_table_start(part5: &[u8], first_candidate: usize) -> usize {
    let mut start = first_candidate;
    while start >= METADATA_ENTRY_SIZE {
        let prev = start - METADATA_ENTRY_SIZE;
        let name_field_start = prev + METADATA_NAME_FIELD;
        let name_field_end = name_field_start + METADATA_NAME_LEN;
        if name_field_end > part5.len() {
            break;
        }
        if is_printable_bmp_name(&part5[name_field_start..name_field_end]).is_none() {
            break;
        }
        start = prev;
    }
    start
}

fn find_metadata_table(part5: &[u8], anchor_offset: u32) -> Result<usize> {
    let candidates = find_metadata_candidates(part5, anchor_offset);
    let smallest = *candidates.iter().min().ok_or(EngineError::MetadataNotFound)?;
    Ok(walk_table_start(part5, smallest))
}

fn parse_entries(part5: &[u8], table_start: usize) -> Vec<MetadataEntry> {
    let mut entries = Vec::new();
    let mut p = table_start;
    loop {
        let name_start = p + METADATA_NAME_FIELD;
        let name_end = name_start + METADATA_NAME_LEN;
        if name_end > part5.len() {
            break;
        }
        let name = decode_name(&part5[name_start..name_end]);
        if name.len() < MIN_NAME_LEN {
            break;
        }
        let (Ok(offset), Ok(width), Ok(height)) = (
            binary::read_u32_le(part5, p + METADATA_OFFSET_FIELD),
            binary::read_u32_le(part5, p + METADATA_WIDTH_FIELD),
            binary::read_u32_le(part5, p + METADATA_HEIGHT_FIELD),
        ) else {
            break;
        };
        entries.push(MetadataEntry {
            offset,
            width,
            height,
            name,
        });
        p += METADATA_ENTRY_SIZE;
    }
    entries
}

fn detect_misalignment(entries: &[MetadataEntry], anchor_offsets: &[u32]) -> DetectionInfo {
    let sample_count = anchor_offsets.len().min(MAX_SHIFT_SAMPLES);
    let mut votes: BTreeMap<i32, u32> = BTreeMap::new();
    for rock26_idx in 0..sample_count {
        let anchor_value = anchor_offsets[rock26_idx];
        for shift in -MAX_MISALIGNMENT_SHIFT..=MAX_MISALIGNMENT_SHIFT {
            let candidate_idx = rock26_idx as i64 + shift as i64;
            if candidate_idx < 0 {
                continue;
            }
            if let Some(entry) = entries.get(candidate_idx as usize) {
                if entry.offset == anchor_value {
                    *votes.entry(shift).or_insert(0) += 1;
                }
            }
        }
    }

    // On a vote tie, prefer the shift closest to zero (ties within that,
    // e.g. -1 vs 1, keep the first seen; BTreeMap iterates ascending).
    let best = votes.iter().fold(None, |acc: Option<(i32, u32)>, (&shift, &count)| match acc {
        Some((bshift, bcount)) if count < bcount || (count == bcount && shift.abs() >= bshift.abs()) => {
            Some((bshift, bcount))
        }
        _ => Some((shift, count)),
    });

    match best {
        Some((shift, count)) if count > 0 => DetectionInfo {
            shift,
            votes,
            low_confidence: false,
        },
        _ => {
            // Fallback: single-point correlation against the first anchor offset.
            let fallback_shift = anchor_offsets.first().and_then(|&first_offset| {
                entries
                    .iter()
                    .position(|e| e.offset == first_offset)
                    .map(|idx| idx as i32 - 1)
            });
            match fallback_shift {
                Some(shift) => DetectionInfo {
                    shift,
                    votes,
                    low_confidence: true,
                },
                None => DetectionInfo {
                    shift: 0,
                    votes,
                    low_confidence: true,
                },
            }
        }
    }
}

impl ResourceDirectory {
    /// Locate Part 5, the anchor table, and the metadata table, and
    /// reconcile the index misalignment between them. Returns an empty
    /// directory (not an error) when the anchor table itself is empty.
    pub fn parse(firmware: &[u8]) -> Result<ResourceDirectory> {
        let (part5_offset, part5_size) = locate_part5(firmware)?;
        let part5 = &firmware[part5_offset as usize..part5_offset as usize + part5_size as usize];

        let rock26_pos = binary::find_bytes(part5, ROCK26_SIGNATURE, 0)
            .ok_or(EngineError::SignatureNotFound)?;
        let anchor_offsets = read_anchor_offsets(part5, rock26_pos)?;

        if anchor_offsets.is_empty() {
            return Ok(ResourceDirectory {
                part5_offset,
                part5_size,
                table_start: 0,
                entries: Vec::new(),
                anchor_offsets,
                misalignment: 0,
                detection: DetectionInfo {
                    shift: 0,
                    votes: BTreeMap::new(),
                    low_confidence: true,
                },
            });
        }

        let anchor_offset = anchor_offsets[0];
        let table_start = find_metadata_table(part5, anchor_offset)?;
        let entries = parse_entries(part5, table_start);
        let detection = detect_misalignment(&entries, &anchor_offsets);
        debug!(
            "metadata table at {:#x}, {} entries, misalignment {}{}",
            table_start,
            entries.len(),
            detection.shift,
            if detection.low_confidence { " (low confidence)" } else { "" }
        );
        for sentinel in BOOTLOADER_SENTINELS {
            if entries.iter().any(|e| e.offset == sentinel) {
                trace!("observed Bootloader sentinel {sentinel:#x} in metadata table");
            }
        }

        Ok(ResourceDirectory {
            part5_offset,
            part5_size,
            table_start,
            entries,
            anchor_offsets,
            misalignment: detection.shift,
            detection,
        })
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Runtime indices for which `resolve` is meaningful.
    pub fn valid_index_range(&self) -> std::ops::Range<usize> {
        let n = self.entry_count();
        if self.misalignment > 0 {
            0..n.saturating_sub(self.misalignment as usize)
        } else {
            (-self.misalignment) as usize..n
        }
    }

    /// Resolve a runtime index to its Part-5-relative payload offset and
    /// displayable dimensions, honouring the Bootloader reorganisation
    /// (dimensions live one entry ahead of the offset).
    fn resolve(&self, i: usize) -> Option<(&MetadataEntry, u32, u32)> {
        if !self.valid_index_range().contains(&i) {
            return None;
        }
        let flash_idx = (i as i64 + self.misalignment as i64) as usize;
        let name_entry = self.entries.get(i)?;
        let offset_entry = self.entries.get(flash_idx)?;
        let dim_entry = self.entries.get(i + 1).unwrap_or(name_entry);
        let _ = name_entry;
        Some((offset_entry, dim_entry.width, dim_entry.height))
    }

    /// List every bitmap whose resolved offset and dimensions look sane.
    pub fn list_bitmaps(&self) -> Vec<BitmapEntry> {
        let mut out = Vec::new();
        for i in self.valid_index_range() {
            let Some((offset_entry, width, height)) = self.resolve(i) else {
                continue;
            };
            if offset_entry.offset == 0 || !valid_dimensions(width, height) {
                continue;
            }
            let Some(size) = payload_size(width, height) else {
                continue;
            };
            let Some(name_entry) = self.entries.get(i) else {
                continue;
            };
            out.push(BitmapEntry {
                name: name_entry.name.clone(),
                width,
                height,
                size,
                offset: offset_entry.offset,
            });
        }
        out
    }

    /// Resolve a named bitmap to its payload offset and dimensions. Applies
    /// the same offset/dimension bounds `list_bitmaps` enumerates under, so
    /// a name the listing would never show can't be read or mutated either.
    pub fn resolve_by_name(&self, name: &str) -> Result<BitmapEntry> {
        for i in self.valid_index_range() {
            let Some(entry) = self.entries.get(i) else {
                continue;
            };
            if entry.name != name {
                continue;
            }
            let Some((offset_entry, width, height)) = self.resolve(i) else {
                return Err(EngineError::NameNotFound(name.to_string()));
            };
            if offset_entry.offset == 0 {
                return Err(EngineError::NameNotFound(name.to_string()));
            }
            if !valid_dimensions(width, height) {
                return Err(EngineError::InvalidDimensions {
                    width: width as i64,
                    height: height as i64,
                });
            }
            let size = payload_size(width, height).ok_or(EngineError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            })?;
            return Ok(BitmapEntry {
                name: name.to_string(),
                width,
                height,
                size,
                offset: offset_entry.offset,
            });
        }
        Err(EngineError::NameNotFound(name.to_string()))
    }
}

fn valid_dimensions(width: u32, height: u32) -> bool {
    (1..=MAX_DIMENSION).contains(&width) && (1..=MAX_DIMENSION).contains(&height)
}

/// `width * height * 2` widened to avoid overflow on a crafted entry with
/// implausibly large (but still in-range-looking) dimensions.
fn payload_size(width: u32, height: u32) -> Option<u32> {
    u32::try_from((width as u64) * (height as u64) * 2).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a synthetic firmware image with one Part 5 containing a
    /// `ROCK26IMAGERES` anchor table and a metadata table, for directory
    /// and mutator tests.
    pub(crate) fn synthetic_firmware(
        part5_offset: u32,
        entries: &[(&str, u32, u32, u32)], // name, offset, width, height
        anchor_first_offset: u32,
    ) -> Vec<u8> {
        let part5_size = 0x2000u32;
        let mut fw = vec![0u8; part5_offset as usize + part5_size as usize];
        binary::write_u32_le(&mut fw, PART5_OFFSET_FIELD, part5_offset).unwrap();
        binary::write_u32_le(&mut fw, PART5_SIZE_FIELD, part5_size).unwrap();

        let rock26_pos = 0x10usize;
        let table_start = 0x200usize;

        {
            let part5 = &mut fw[part5_offset as usize..part5_offset as usize + part5_size as usize];
            part5[rock26_pos..rock26_pos + ROCK26_SIGNATURE.len()].copy_from_slice(ROCK26_SIGNATURE);
            part5[rock26_pos + ANCHOR_COUNT_OFFSET..rock26_pos + ANCHOR_COUNT_OFFSET + 4]
                .copy_from_slice(&1u32.to_le_bytes());
            let anchor_entry = rock26_pos + ANCHOR_ENTRIES_OFFSET;
            part5[anchor_entry + ANCHOR_OFFSET_FIELD..anchor_entry + ANCHOR_OFFSET_FIELD + 4]
                .copy_from_slice(&anchor_first_offset.to_le_bytes());

            for (i, (name, offset, width, height)) in entries.iter().enumerate() {
                let p = table_start + i * METADATA_ENTRY_SIZE;
                part5[p + METADATA_OFFSET_FIELD..p + METADATA_OFFSET_FIELD + 4]
                    .copy_from_slice(&offset.to_le_bytes());
                part5[p + METADATA_WIDTH_FIELD..p + METADATA_WIDTH_FIELD + 4]
                    .copy_from_slice(&width.to_le_bytes());
                part5[p + METADATA_HEIGHT_FIELD..p + METADATA_HEIGHT_FIELD + 4]
                    .copy_from_slice(&height.to_le_bytes());
                let name_bytes = name.as_bytes();
                part5[p + METADATA_NAME_FIELD..p + METADATA_NAME_FIELD + name_bytes.len()]
                    .copy_from_slice(name_bytes);
            }
        }
        fw
    }

    #[test]
    fn scenario_a_single_entry_directory() {
        // part5Offset=0x300000 would be ~3MiB of zeros; use a smaller
        // offset for test speed, the logic is offset-agnostic.
        let fw = synthetic_firmware(0x1000, &[("TEST.BMP", 0x2000, 10, 10)], 0x2000);
        let dir = ResourceDirectory::parse(&fw).unwrap();
        let listed = dir.list_bitmaps();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "TEST.BMP");
        assert_eq!(listed[0].width, 10);
        assert_eq!(listed[0].height, 10);
        assert_eq!(listed[0].size, 200);
        assert_eq!(listed[0].offset, 0x2000);
    }

    #[test]
    fn scenario_d_bootloader_reorganisation_detected() {
        let fw = synthetic_firmware(
            0x1000,
            &[
                ("A.BMP", 0xF564_F564, 1, 1),
                ("B.BMP", 0x2100, 10, 10),
            ],
            0x2100,
        );
        let dir = ResourceDirectory::parse(&fw).unwrap();
        assert_eq!(dir.misalignment, 1);
        let listed = dir.list_bitmaps();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].offset, 0x2100);
    }

    #[test]
    fn scenario_e_missing_signature_returns_empty_list() {
        let mut fw = synthetic_firmware(0x1000, &[("TEST.BMP", 0x2000, 10, 10)], 0x2000);
        // Corrupt the signature.
        let part5_offset = 0x1000usize;
        fw[part5_offset + 0x10] = b'X';
        let result = ResourceDirectory::parse(&fw);
        assert!(matches!(result, Err(EngineError::SignatureNotFound)));
    }

    #[test]
    fn empty_anchor_table_yields_empty_listing() {
        let part5_offset = 0x1000u32;
        let part5_size = 0x2000u32;
        let mut fw = vec![0u8; part5_offset as usize + part5_size as usize];
        binary::write_u32_le(&mut fw, PART5_OFFSET_FIELD, part5_offset).unwrap();
        binary::write_u32_le(&mut fw, PART5_SIZE_FIELD, part5_size).unwrap();
        let part5 = &mut fw[part5_offset as usize..part5_offset as usize + part5_size as usize];
        part5[0x10..0x10 + ROCK26_SIGNATURE.len()].copy_from_slice(ROCK26_SIGNATURE);
        // Anchor count left at 0.
        let dir = ResourceDirectory::parse(&fw).unwrap();
        assert!(dir.list_bitmaps().is_empty());
    }

    #[test]
    fn perfectly_aligned_anchor_and_metadata_yields_zero_shift() {
        let fw = synthetic_firmware(0x1000, &[("A.BMP", 0x2000, 10, 10)], 0x2000);
        let dir = ResourceDirectory::parse(&fw).unwrap();
        assert_eq!(dir.misalignment, 0);
    }

    #[test]
    fn misalignment_vote_tie_prefers_zero_over_equal_nonzero_shift() {
        let mut votes: BTreeMap<i32, u32> = BTreeMap::new();
        votes.insert(-2, 3);
        votes.insert(0, 3);
        votes.insert(2, 3);
        let best = votes.iter().fold(None, |acc: Option<(i32, u32)>, (&shift, &count)| match acc {
            Some((bshift, bcount))
                if count < bcount || (count == bcount && shift.abs() >= bshift.abs()) =>
            {
                Some((bshift, bcount))
            }
            _ => Some((shift, count)),
        });
        assert_eq!(best, Some((0, 3)));
    }

    #[test]
    fn metadata_parsing_stops_at_empty_name() {
        let fw = synthetic_firmware(
            0x1000,
            &[("A.BMP", 0x2000, 10, 10), ("", 0x3000, 5, 5)],
            0x2000,
        );
        let dir = ResourceDirectory::parse(&fw).unwrap();
        assert_eq!(dir.entries.len(), 1);
    }

    #[test]
    fn resolve_by_name_rejects_zero_dimensions() {
        let fw = synthetic_firmware(0x1000, &[("ZERO.BMP", 0x2000, 0, 0)], 0x2000);
        let dir = ResourceDirectory::parse(&fw).unwrap();
        assert!(dir.list_bitmaps().is_empty());
        assert!(matches!(
            dir.resolve_by_name("ZERO.BMP"),
            Err(EngineError::InvalidDimensions { width: 0, height: 0 })
        ));
    }

    #[test]
    fn resolve_by_name_rejects_oversized_dimensions() {
        let fw = synthetic_firmware(0x1000, &[("HUGE.BMP", 0x2000, 20_000, 20_000)], 0x2000);
        let dir = ResourceDirectory::parse(&fw).unwrap();
        assert!(dir.list_bitmaps().is_empty());
        assert!(matches!(
            dir.resolve_by_name("HUGE.BMP"),
            Err(EngineError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn resolve_by_name_rejects_zero_offset() {
        let fw = synthetic_firmware(0x1000, &[("ZEROOFF.BMP", 0, 10, 10)], 0);
        let dir = ResourceDirectory::parse(&fw).unwrap();
        assert!(dir.list_bitmaps().is_empty());
        assert!(matches!(
            dir.resolve_by_name("ZEROOFF.BMP"),
            Err(EngineError::NameNotFound(_))
        ));
    }

    #[test]
    fn candidate_search_rejects_non_printable_name_bytes() {
        // Two blocks both have offset == anchor_offset and a ".BMP" suffix;
        // the earlier one's name bytes aren't printable ASCII and must be
        // skipped so the real table start is found instead of garbage.
        let part5_offset = 0x1000u32;
        let part5_size = 0x2000u32;
        let mut fw = vec![0u8; part5_offset as usize + part5_size as usize];
        binary::write_u32_le(&mut fw, PART5_OFFSET_FIELD, part5_offset).unwrap();
        binary::write_u32_le(&mut fw, PART5_SIZE_FIELD, part5_size).unwrap();

        let rock26_pos = 0x10usize;
        let anchor_offset = 0x2000u32;
        let garbage_block = 0x20usize;
        let real_block = 0x200usize;

        {
            let part5 = &mut fw[part5_offset as usize..part5_offset as usize + part5_size as usize];
            part5[rock26_pos..rock26_pos + ROCK26_SIGNATURE.len()].copy_from_slice(ROCK26_SIGNATURE);
            part5[rock26_pos + ANCHOR_COUNT_OFFSET..rock26_pos + ANCHOR_COUNT_OFFSET + 4]
                .copy_from_slice(&1u32.to_le_bytes());
            let anchor_entry = rock26_pos + ANCHOR_ENTRIES_OFFSET;
            part5[anchor_entry + ANCHOR_OFFSET_FIELD..anchor_entry + ANCHOR_OFFSET_FIELD + 4]
                .copy_from_slice(&anchor_offset.to_le_bytes());

            // Garbage block: offset matches, name field has non-printable
            // bytes before a ".BMP" suffix.
            part5[garbage_block + METADATA_OFFSET_FIELD..garbage_block + METADATA_OFFSET_FIELD + 4]
                .copy_from_slice(&anchor_offset.to_le_bytes());
            let garbage_name = garbage_block + METADATA_NAME_FIELD;
            part5[garbage_name] = 0x01;
            part5[garbage_name + 1] = 0xFF;
            part5[garbage_name + 2..garbage_name + 6].copy_from_slice(b".BMP");

            // Real block: offset matches, name is printable.
            part5[real_block + METADATA_OFFSET_FIELD..real_block + METADATA_OFFSET_FIELD + 4]
                .copy_from_slice(&anchor_offset.to_le_bytes());
            part5[real_block + METADATA_WIDTH_FIELD..real_block + METADATA_WIDTH_FIELD + 4]
                .copy_from_slice(&10u32.to_le_bytes());
            part5[real_block + METADATA_HEIGHT_FIELD..real_block + METADATA_HEIGHT_FIELD + 4]
                .copy_from_slice(&10u32.to_le_bytes());
            let name = b"REAL.BMP";
            part5[real_block + METADATA_NAME_FIELD..real_block + METADATA_NAME_FIELD + name.len()]
                .copy_from_slice(name);
        }

        let dir = ResourceDirectory::parse(&fw).unwrap();
        assert_eq!(dir.table_start, real_block);
        let listed = dir.list_bitmaps();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "REAL.BMP");
    }
}
