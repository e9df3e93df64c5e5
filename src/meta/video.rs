//! Video metadata: native container scans with an ffprobe fallback.
//!
//! MP4-family files get an ISO-BMFF box scan for the `mvhd` creation time;
//! Matroska-family files get an EBML scan for the first `DateUTC`. ffprobe
//! runs only when neither yields a timestamp.

use chrono::{DateTime, Local, Utc};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use super::ffprobe;
use crate::types::FileMetadata;

/// Seconds between 1904-01-01 (QuickTime epoch) and the Unix epoch.
const QT_TO_UNIX_OFFSET: i64 = 2_082_844_800;
/// Seconds between the Unix epoch and 2001-01-01 (Matroska DateUTC epoch).
const MKV_TO_UNIX_OFFSET: i64 = 978_307_200;

const EBML_SEGMENT: u64 = 0x1853_8067;
const EBML_INFO: u64 = 0x1549_A966;
const EBML_DATE_UTC: u64 = 0x4461;
const EBML_UNKNOWN_SIZE: u64 = u64::MAX;

/// Extract video metadata. Never fails: container scan by extension, then
/// ffprobe only if no timestamp was found, extension-only metadata in the
/// worst case.
pub fn extract(path: &Path) -> FileMetadata {
    let mut meta = FileMetadata::for_path(path);

    match meta.extension.as_str() {
        "mp4" | "m4v" | "mov" => meta.taken_time = read_mp4_creation_time(path),
        "mkv" | "webm" => meta.taken_time = read_mkv_date_utc(path),
        _ => {}
    }

    if meta.taken_time.is_none() {
        if let Some(probed) = ffprobe::probe(path) {
            meta.taken_time = probed.taken_time;
            meta.camera_maker = probed.camera_maker;
            meta.camera_model = probed.camera_model;
        }
    }

    meta
}

/// Creation time from the `moov`/`mvhd` box: seconds since 1904-01-01 UTC,
/// 64-bit for version 1 and 32-bit for version 0. Zero means unset.
pub fn read_mp4_creation_time(path: &Path) -> Option<DateTime<Local>> {
    let mut file = File::open(path).ok()?;
    let file_len = file.metadata().ok()?.len();
    let (moov_start, moov_end) = find_box(&mut file, 0, file_len, *b"moov")?;
    let (mvhd_start, _) = find_box(&mut file, moov_start, moov_end, *b"mvhd")?;

    file.seek(SeekFrom::Start(mvhd_start)).ok()?;
    let mut ver_flags = [0u8; 4];
    file.read_exact(&mut ver_flags).ok()?;
    let secs = if ver_flags[0] == 1 {
        read_u64_be(&mut file)?
    } else {
        u64::from(read_u32_be(&mut file)?)
    };
    if secs == 0 {
        return None;
    }
    let unix = (secs as i64).checked_sub(QT_TO_UNIX_OFFSET)?;
    let utc = DateTime::<Utc>::from_timestamp(unix, 0)?;
    Some(utc.with_timezone(&Local))
}

fn find_box(file: &mut File, start: u64, end: u64, kind: [u8; 4]) -> Option<(u64, u64)> {
    let mut offset = start;
    while offset + 8 <= end {
        file.seek(SeekFrom::Start(offset)).ok()?;
        let mut header = [0u8; 8];
        file.read_exact(&mut header).ok()?;
        let mut size = u64::from(u32::from_be_bytes([
            header[0], header[1], header[2], header[3],
        ]));
        let box_kind = [header[4], header[5], header[6], header[7]];
        let mut header_size = 8u64;

        if size == 1 {
            // 64-bit size follows the compact header
            size = read_u64_be(file)?;
            header_size = 16;
        } else if size == 0 {
            // box extends to the end of the enclosing range
            size = end.saturating_sub(offset);
        }
        if size < header_size {
            return None;
        }
        let box_end = offset.saturating_add(size).min(end);
        if box_end <= offset {
            return None;
        }

        if box_kind == kind {
            return Some((offset + header_size, box_end));
        }
        offset = box_end;
    }
    None
}

/// First `DateUTC` in Segment > Info: signed big-endian nanoseconds since
/// 2001-01-01 UTC. Later occurrences never overwrite.
pub fn read_mkv_date_utc(path: &Path) -> Option<DateTime<Local>> {
    let mut file = File::open(path).ok()?;
    let file_len = file.metadata().ok()?.len();
    let (seg_start, seg_end) = find_ebml_element(&mut file, 0, file_len, EBML_SEGMENT)?;
    let (info_start, info_end) = find_ebml_element(&mut file, seg_start, seg_end, EBML_INFO)?;
    let (date_start, date_end) = find_ebml_element(&mut file, info_start, info_end, EBML_DATE_UTC)?;

    let len = (date_end - date_start) as usize;
    if len == 0 || len > 8 {
        return None;
    }
    file.seek(SeekFrom::Start(date_start)).ok()?;
    let mut buf = [0u8; 8];
    file.read_exact(&mut buf[8 - len..]).ok()?;
    let mut nanos = i64::from_be_bytes(buf);
    if len < 8 && buf[8 - len] & 0x80 != 0 {
        nanos |= -1_i64 << (len * 8);
    }

    let secs = MKV_TO_UNIX_OFFSET + nanos.div_euclid(1_000_000_000);
    let subsec = nanos.rem_euclid(1_000_000_000) as u32;
    let utc = DateTime::<Utc>::from_timestamp(secs, subsec)?;
    Some(utc.with_timezone(&Local))
}

/// Scan sibling elements in `[start, end)` for `id`, returning the data range
/// of the first match. Unknown-size elements extend to the range end.
fn find_ebml_element(file: &mut File, start: u64, end: u64, id: u64) -> Option<(u64, u64)> {
    let mut offset = start;
    while offset < end {
        file.seek(SeekFrom::Start(offset)).ok()?;
        let (elem_id, id_len) = read_ebml_id(file)?;
        let (size, size_len) = read_ebml_size(file)?;
        let data_start = offset + id_len + size_len;
        let data_end = if size == EBML_UNKNOWN_SIZE {
            end
        } else {
            data_start.checked_add(size)?.min(end)
        };
        if data_end < data_start {
            return None;
        }
        if elem_id == id {
            return Some((data_start, data_end));
        }
        if data_end <= offset {
            return None;
        }
        offset = data_end;
    }
    None
}

/// Element ID with its length marker kept, as Matroska IDs are written.
fn read_ebml_id(file: &mut File) -> Option<(u64, u64)> {
    let first = read_u8(file)?;
    let len = ebml_length(first)?;
    if len > 4 {
        return None;
    }
    let mut value = u64::from(first);
    for _ in 1..len {
        value = (value << 8) | u64::from(read_u8(file)?);
    }
    Some((value, u64::from(len)))
}

/// Element size with the marker bit stripped. All-ones means unknown size.
fn read_ebml_size(file: &mut File) -> Option<(u64, u64)> {
    let first = read_u8(file)?;
    let len = ebml_length(first)?;
    let marker = 0x80u8 >> (len - 1);
    let mask = marker - 1;
    let mut value = u64::from(first & mask);
    let mut all_ones = first & mask == mask;
    for _ in 1..len {
        let b = read_u8(file)?;
        value = (value << 8) | u64::from(b);
        all_ones = all_ones && b == 0xFF;
    }
    if all_ones {
        return Some((EBML_UNKNOWN_SIZE, u64::from(len)));
    }
    Some((value, u64::from(len)))
}

fn ebml_length(first: u8) -> Option<u32> {
    match first.leading_zeros() {
        8 => None,
        n => Some(n + 1),
    }
}

fn read_u8(file: &mut File) -> Option<u8> {
    let mut buf = [0u8; 1];
    file.read_exact(&mut buf).ok()?;
    Some(buf[0])
}

fn read_u32_be(file: &mut File) -> Option<u32> {
    let mut buf = [0u8; 4];
    file.read_exact(&mut buf).ok()?;
    Some(u32::from_be_bytes(buf))
}

fn read_u64_be(file: &mut File) -> Option<u64> {
    let mut buf = [0u8; 8];
    file.read_exact(&mut buf).ok()?;
    Some(u64::from_be_bytes(buf))
}
