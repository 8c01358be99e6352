//! Minimal EXIF writer for JPEG files.
//!
//! Serializes the fixed tag set the pipeline stamps into rendered images
//! and splices it into a JPEG byte stream as an APP1 segment. Compressed
//! image data is never touched; only the header segments are rewritten.
//!
//! Segment layout:
//!
//! ```text
//! FF E1           APP1 marker
//! u16             segment length (big-endian, includes itself)
//! "Exif\0\0"      identifier
//! TIFF block:
//!   "MM" 00 2A    big-endian byte order, magic 42
//!   u32           offset of 0th IFD (always 8)
//!   0th IFD       ImageDescription, Software, Artist, Copyright,
//!                 pointer to the Exif IFD
//!   Exif IFD      DateTimeOriginal, UserComment
//! ```
//!
//! Each IFD entry is 12 bytes: tag (u16), type (u16), count (u32), then
//! the value itself if it fits in four bytes or its offset from the TIFF
//! header start if not. Entries are written in ascending tag order and
//! out-of-line values go in a data area directly after their IFD.
//!
//! Splicing puts the new segment after the SOI marker and any APP0 (JFIF)
//! segments, and drops every existing Exif APP1 so re-running the pipeline
//! replaces metadata instead of accumulating it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExifError {
    #[error("Not a JPEG file (missing SOI marker)")]
    NotJpeg,
    #[error("Invalid JPEG marker at offset {0}")]
    BadMarker(usize),
    #[error("Truncated JPEG segment at offset {0}")]
    Truncated(usize),
    #[error("EXIF segment exceeds APP1 capacity: {0} bytes")]
    Oversized(usize),
}

/// The descriptive tags stamped into each matched image.
///
/// All values are plain text; assembling them from catalog and site data
/// is the injector's job, not this module's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    pub artist: String,
    pub copyright: String,
    pub image_description: String,
    pub software: String,
    pub user_comment: String,
    /// `YYYY:01:01 00:00:00`; only the year is meaningful for paintings.
    pub date_time_original: String,
}

const SOI: &[u8] = &[0xFF, 0xD8];
const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";

// 0th IFD (TIFF baseline) tags
const TAG_IMAGE_DESCRIPTION: u16 = 0x010E;
const TAG_SOFTWARE: u16 = 0x0131;
const TAG_ARTIST: u16 = 0x013B;
const TAG_COPYRIGHT: u16 = 0x8298;
const TAG_EXIF_IFD: u16 = 0x8769;

// Exif IFD tags
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_USER_COMMENT: u16 = 0x9286;

// TIFF field types
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_UNDEFINED: u16 = 7;

/// One IFD entry before layout: raw value bytes, offsets still unresolved.
#[derive(Debug)]
struct Entry {
    tag: u16,
    typ: u16,
    data: Vec<u8>,
}

impl Entry {
    /// TIFF count field: number of values, which for the one-byte-per-value
    /// types used here (ASCII, UNDEFINED) equals the byte length.
    fn count(&self) -> u32 {
        match self.typ {
            TYPE_LONG => (self.data.len() / 4) as u32,
            _ => self.data.len() as u32,
        }
    }
}

fn ascii_entry(tag: u16, text: &str) -> Entry {
    let mut data = text.as_bytes().to_vec();
    data.push(0); // ASCII values are NUL-terminated and counted with it
    Entry {
        tag,
        typ: TYPE_ASCII,
        data,
    }
}

fn undefined_entry(tag: u16, data: Vec<u8>) -> Entry {
    Entry {
        tag,
        typ: TYPE_UNDEFINED,
        data,
    }
}

fn long_entry(tag: u16, value: u32) -> Entry {
    Entry {
        tag,
        typ: TYPE_LONG,
        data: value.to_be_bytes().to_vec(),
    }
}

/// UserComment starts with an eight-byte character-code field. The comment
/// text carries `×` and translated fragments, which rules out the ASCII
/// code; the undefined code (all zero) followed by UTF-8 bytes is what
/// mainstream readers expect for non-ASCII comments.
fn user_comment_value(text: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + text.len());
    data.extend_from_slice(&[0u8; 8]);
    data.extend_from_slice(text.as_bytes());
    data
}

/// Serialized length of one IFD including its out-of-line data area.
fn serialized_len(entries: &[Entry]) -> usize {
    let heap: usize = entries
        .iter()
        .filter(|e| e.data.len() > 4)
        .map(|e| e.data.len() + e.data.len() % 2)
        .sum();
    2 + entries.len() * 12 + 4 + heap
}

/// Serialize one IFD located at `ifd_offset` from the TIFF header start.
///
/// Values longer than four bytes land in a data area immediately after the
/// entry table, padded to word boundaries. The next-IFD pointer is always
/// written as zero; chaining is expressed with explicit pointer tags.
fn serialize_ifd(entries: &[Entry], ifd_offset: u32) -> Vec<u8> {
    let table_len = 2 + entries.len() * 12 + 4;
    let mut table = Vec::with_capacity(table_len);
    let mut heap: Vec<u8> = Vec::new();

    table.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    for entry in entries {
        table.extend_from_slice(&entry.tag.to_be_bytes());
        table.extend_from_slice(&entry.typ.to_be_bytes());
        table.extend_from_slice(&entry.count().to_be_bytes());
        if entry.data.len() <= 4 {
            let mut value = entry.data.clone();
            value.resize(4, 0);
            table.extend_from_slice(&value);
        } else {
            let offset = ifd_offset + (table_len + heap.len()) as u32;
            table.extend_from_slice(&offset.to_be_bytes());
            heap.extend_from_slice(&entry.data);
            if heap.len() % 2 == 1 {
                heap.push(0);
            }
        }
    }
    table.extend_from_slice(&0u32.to_be_bytes()); // no next IFD
    table.extend(heap);
    table
}

/// Serialize a tag set as a complete TIFF block: what follows `Exif\0\0`
/// inside the APP1 segment. Big-endian throughout, 0th IFD at offset 8.
pub fn serialize_tiff(tags: &TagSet) -> Vec<u8> {
    // Tags must stay in ascending order within each IFD.
    let zeroth_entries = |exif_ifd_offset: u32| {
        vec![
            ascii_entry(TAG_IMAGE_DESCRIPTION, &tags.image_description),
            ascii_entry(TAG_SOFTWARE, &tags.software),
            ascii_entry(TAG_ARTIST, &tags.artist),
            ascii_entry(TAG_COPYRIGHT, &tags.copyright),
            long_entry(TAG_EXIF_IFD, exif_ifd_offset),
        ]
    };
    let exif_entries = vec![
        ascii_entry(TAG_DATE_TIME_ORIGINAL, &tags.date_time_original),
        undefined_entry(TAG_USER_COMMENT, user_comment_value(&tags.user_comment)),
    ];

    // The Exif IFD sits right after the 0th one, and the 0th IFD holds a
    // pointer to it, so the 0th layout is sized before it is serialized.
    let exif_ifd_offset = 8 + serialized_len(&zeroth_entries(0)) as u32;
    let zeroth = serialize_ifd(&zeroth_entries(exif_ifd_offset), 8);
    let exif = serialize_ifd(&exif_entries, exif_ifd_offset);

    let mut tiff = Vec::with_capacity(8 + zeroth.len() + exif.len());
    tiff.extend_from_slice(b"MM\x00\x2A"); // big-endian, magic 42
    tiff.extend_from_slice(&8u32.to_be_bytes()); // 0th IFD offset
    tiff.extend(zeroth);
    tiff.extend(exif);
    tiff
}

/// Wrap a tag set as a complete APP1 segment, marker and length included.
pub fn app1_segment(tags: &TagSet) -> Result<Vec<u8>, ExifError> {
    let tiff = serialize_tiff(tags);
    let payload_len = 2 + EXIF_IDENTIFIER.len() + tiff.len(); // length field counts itself
    if payload_len > u16::MAX as usize {
        return Err(ExifError::Oversized(payload_len));
    }
    let mut segment = Vec::with_capacity(2 + payload_len);
    segment.extend_from_slice(&[0xFF, 0xE1]);
    segment.extend_from_slice(&(payload_len as u16).to_be_bytes());
    segment.extend_from_slice(EXIF_IDENTIFIER);
    segment.extend(tiff);
    Ok(segment)
}

/// Rewrite a JPEG byte stream with `segment` as its only Exif APP1.
///
/// The segment goes after SOI and any APP0 (JFIF insists on being first);
/// existing Exif APP1 segments are dropped, other APP1 payloads (XMP) are
/// kept. Everything from the start-of-scan marker on is copied verbatim.
pub fn splice_app1(jpeg: &[u8], segment: &[u8]) -> Result<Vec<u8>, ExifError> {
    if !jpeg.starts_with(SOI) {
        return Err(ExifError::NotJpeg);
    }
    let mut out = Vec::with_capacity(jpeg.len() + segment.len());
    out.extend_from_slice(SOI);

    let mut pos = 2;
    let mut inserted = false;
    loop {
        if pos + 2 > jpeg.len() {
            return Err(ExifError::Truncated(pos));
        }
        if jpeg[pos] != 0xFF {
            return Err(ExifError::BadMarker(pos));
        }
        let marker = jpeg[pos + 1];
        match marker {
            // Fill byte: 0xFF padding may precede any marker.
            0xFF => pos += 1,
            0x00 => return Err(ExifError::BadMarker(pos)),
            // Scan data or end of image: header rewriting is over.
            0xDA | 0xD9 => {
                if !inserted {
                    out.extend_from_slice(segment);
                }
                out.extend_from_slice(&jpeg[pos..]);
                return Ok(out);
            }
            // Standalone markers carry no length field.
            0x01 | 0xD0..=0xD7 => {
                out.extend_from_slice(&jpeg[pos..pos + 2]);
                pos += 2;
            }
            // APP0 stays ahead of the new segment.
            0xE0 => {
                let end = segment_end(jpeg, pos)?;
                out.extend_from_slice(&jpeg[pos..end]);
                pos = end;
            }
            _ => {
                if !inserted {
                    out.extend_from_slice(segment);
                    inserted = true;
                }
                let end = segment_end(jpeg, pos)?;
                let is_exif = marker == 0xE1 && jpeg[pos + 4..end].starts_with(EXIF_IDENTIFIER);
                if !is_exif {
                    out.extend_from_slice(&jpeg[pos..end]);
                }
                pos = end;
            }
        }
    }
}

/// Bounds-checked end offset of the segment starting at `pos`.
fn segment_end(jpeg: &[u8], pos: usize) -> Result<usize, ExifError> {
    if pos + 4 > jpeg.len() {
        return Err(ExifError::Truncated(pos));
    }
    let len = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
    if len < 2 {
        return Err(ExifError::BadMarker(pos));
    }
    let end = pos + 2 + len;
    if end > jpeg.len() {
        return Err(ExifError::Truncated(pos));
    }
    Ok(end)
}

/// Serialize `tags` and splice them into `jpeg` in one step.
pub fn stamp(jpeg: &[u8], tags: &TagSet) -> Result<Vec<u8>, ExifError> {
    let segment = app1_segment(tags)?;
    splice_app1(jpeg, &segment)
}

/// Locate the TIFF block of the first Exif APP1 segment, if any.
///
/// Read-side counterpart of [`splice_app1`], used to verify stamped files.
pub fn find_exif_tiff(jpeg: &[u8]) -> Option<&[u8]> {
    if !jpeg.starts_with(SOI) {
        return None;
    }
    let mut pos = 2;
    while pos + 2 <= jpeg.len() {
        if jpeg[pos] != 0xFF {
            return None;
        }
        let marker = jpeg[pos + 1];
        match marker {
            0xFF => pos += 1,
            0x00 | 0xDA | 0xD9 => return None,
            0x01 | 0xD0..=0xD7 => pos += 2,
            _ => {
                let end = segment_end(jpeg, pos).ok()?;
                let payload = &jpeg[pos + 4..end];
                if marker == 0xE1 && payload.starts_with(EXIF_IDENTIFIER) {
                    return Some(&payload[EXIF_IDENTIFIER.len()..]);
                }
                pos = end;
            }
        }
    }
    None
}
