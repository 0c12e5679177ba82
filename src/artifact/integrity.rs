//! Structural integrity checker
//!
//! Proves a raw buffer is a well-formed PDSA artifact before anything
//! interprets its bytes as typed fields. Checks run in this order:
//!
//! 1. Buffer length: non-zero, within the configured maximum, holds a header
//! 2. Header: magic, version, known flags
//! 3. Declared total length equals the buffer length
//! 4. Declared section lengths add up to the total length
//! 5. Checksum trailer, if flagged
//! 6. Directory entries: reserved byte, type tag, name and value ranges
//! 7. No two ranges overlap and the data region is fully referenced
//! 8. Names unique, values well-formed for their tags
//!
//! The checker is conservative: any ambiguity is corruption. There is no
//! best-effort recovery.

use std::collections::HashSet;
use std::ops::Range;

use crate::config::GateConfig;

use super::checksum::compute_checksum;
use super::errors::{IntegrityError, IntegrityResult};
use super::format::{
    le_8, le_u32, DirectoryEntry, Header, TypeTag, CHECKSUM_LEN, ENTRY_LEN, FORMAT_VERSION,
    HEADER_LEN, KNOWN_FLAGS, MAGIC,
};
use super::view::{ArrayValue, ArtifactView, Value};

/// Verifies raw artifact buffers and projects them into views.
#[derive(Debug, Clone)]
pub struct IntegrityChecker {
    max_artifact_bytes: usize,
    max_fields: usize,
}

impl IntegrityChecker {
    pub fn new(max_artifact_bytes: usize, max_fields: usize) -> Self {
        Self {
            max_artifact_bytes,
            max_fields,
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.max_artifact_bytes, config.max_fields)
    }

    /// Checks `raw` and returns a view over it.
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError` (always `CorruptedStruct`) on any boundary
    /// violation, truncation, overlap, checksum mismatch or malformed value.
    pub fn check<'a>(&self, raw: &'a [u8]) -> IntegrityResult<ArtifactView<'a>> {
        if raw.is_empty() {
            return Err(IntegrityError::empty_buffer());
        }
        if raw.len() > self.max_artifact_bytes {
            return Err(IntegrityError::oversized(raw.len(), self.max_artifact_bytes));
        }

        let header = self.check_header(raw)?;
        let data = self.check_lengths(raw, &header)?;

        let entry_count = usize::from(header.entry_count);
        let mut entries = Vec::with_capacity(entry_count);
        let mut spans = Vec::with_capacity(entry_count * 2);

        for index in 0..entry_count {
            let at = HEADER_LEN + index * ENTRY_LEN;
            let entry = DirectoryEntry::read(raw, at)
                .ok_or_else(|| IntegrityError::truncated(format!("directory[{}]", index), ENTRY_LEN, raw.len().saturating_sub(at)))?;
            let (name, tag, value_span) = check_entry(index, &entry, data)?;

            spans.push((name_span(&entry), index));
            spans.push((value_span.clone(), index));
            entries.push((name, tag, value_span));
        }

        check_coverage(&mut spans, data.len())?;

        let mut seen = HashSet::with_capacity(entries.len());
        let mut fields = Vec::with_capacity(entries.len());
        for (name, tag, span) in entries {
            if !seen.insert(name) {
                return Err(IntegrityError::duplicate_field(name));
            }
            let bytes = data
                .get(span)
                .ok_or_else(|| IntegrityError::malformed_value(name, "value inside data region", "out of bounds"))?;
            fields.push((name, decode_value(name, tag, bytes)?));
        }

        Ok(ArtifactView::from_entries(fields, header.has_checksum()))
    }

    fn check_header(&self, raw: &[u8]) -> IntegrityResult<Header> {
        let header = match (raw.get(..MAGIC.len()), Header::read(raw)) {
            (Some(magic), Some(header)) if raw.len() >= HEADER_LEN => {
                if magic != MAGIC {
                    return Err(IntegrityError::bad_header(
                        "header.magic",
                        "PDSA",
                        format!("{:02x?}", magic),
                    ));
                }
                header
            }
            _ => return Err(IntegrityError::truncated("header", HEADER_LEN, raw.len())),
        };

        if header.version != FORMAT_VERSION {
            return Err(IntegrityError::bad_header(
                "header.version",
                FORMAT_VERSION.to_string(),
                header.version.to_string(),
            ));
        }
        if header.flags & !KNOWN_FLAGS != 0 {
            return Err(IntegrityError::bad_header(
                "header.flags",
                format!("flags within {:#04x}", KNOWN_FLAGS),
                format!("{:#04x}", header.flags),
            ));
        }
        Ok(header)
    }

    /// Cross-checks declared lengths and the checksum, returning the data region.
    fn check_lengths<'a>(&self, raw: &'a [u8], header: &Header) -> IntegrityResult<&'a [u8]> {
        let total_len = header.total_len as usize;
        if total_len > raw.len() {
            return Err(IntegrityError::truncated("header.total_len", total_len, raw.len()));
        }
        if total_len < raw.len() {
            return Err(IntegrityError::length_mismatch(
                "header.total_len",
                format!("{} bytes", raw.len()),
                format!("{} bytes declared", total_len),
            ));
        }

        let entry_count = usize::from(header.entry_count);
        if entry_count > self.max_fields {
            return Err(IntegrityError::too_many_fields(entry_count, self.max_fields));
        }

        let trailer = if header.has_checksum() { CHECKSUM_LEN } else { 0 };
        let data_len = header.data_len as usize;
        let data_start = HEADER_LEN + entry_count * ENTRY_LEN;
        let expected_total = data_start
            .checked_add(data_len)
            .and_then(|n| n.checked_add(trailer));

        match expected_total {
            Some(expected) if expected == total_len => {}
            Some(expected) if expected > total_len => {
                return Err(IntegrityError::truncated("header.data_len", expected, total_len));
            }
            Some(expected) => {
                return Err(IntegrityError::length_mismatch(
                    "header.data_len",
                    format!("{} bytes", total_len),
                    format!("{} bytes declared", expected),
                ));
            }
            None => {
                return Err(IntegrityError::length_mismatch(
                    "header.data_len",
                    "representable length",
                    "arithmetic overflow",
                ));
            }
        }

        if header.has_checksum() {
            let body_len = total_len - CHECKSUM_LEN;
            let stored = le_u32(raw, body_len)
                .ok_or_else(|| IntegrityError::truncated("trailer.checksum", CHECKSUM_LEN, 0))?;
            let computed = compute_checksum(&raw[..body_len]);
            if computed != stored {
                return Err(IntegrityError::checksum_mismatch(computed, stored));
            }
        }

        raw.get(data_start..data_start + data_len)
            .ok_or_else(|| IntegrityError::truncated("data", data_len, raw.len().saturating_sub(data_start)))
    }
}

fn name_span(entry: &DirectoryEntry) -> Range<usize> {
    let start = entry.name_offset as usize;
    start..start + usize::from(entry.name_len)
}

/// Byte range `[offset, offset + len)` if it lies within `limit`.
fn bounded_span(offset: u32, len: u32, limit: usize) -> Option<Range<usize>> {
    let start = offset as usize;
    let end = start.checked_add(len as usize)?;
    (end <= limit).then_some(start..end)
}

/// Validates one directory entry against the data region.
fn check_entry<'a>(
    index: usize,
    entry: &DirectoryEntry,
    data: &'a [u8],
) -> IntegrityResult<(&'a str, TypeTag, Range<usize>)> {
    if entry.reserved != 0 {
        return Err(IntegrityError::bad_entry(
            index,
            "reserved byte 0",
            entry.reserved.to_string(),
        ));
    }

    let tag = TypeTag::from_u8(entry.type_tag).ok_or_else(|| {
        IntegrityError::bad_entry(index, "known type tag", format!("{:#04x}", entry.type_tag))
    })?;

    if entry.name_len == 0 {
        return Err(IntegrityError::bad_entry(index, "non-empty name", "empty name"));
    }

    let name_range = bounded_span(entry.name_offset, u32::from(entry.name_len), data.len())
        .ok_or_else(|| {
            IntegrityError::bad_entry(
                index,
                format!("name within {} data bytes", data.len()),
                format!("offset {} length {}", entry.name_offset, entry.name_len),
            )
        })?;

    let value_range = bounded_span(entry.value_offset, entry.value_len, data.len()).ok_or_else(|| {
        IntegrityError::bad_entry(
            index,
            format!("value within {} data bytes", data.len()),
            format!("offset {} length {}", entry.value_offset, entry.value_len),
        )
    })?;

    let name = std::str::from_utf8(&data[name_range])
        .map_err(|_| IntegrityError::bad_entry(index, "UTF-8 name", "invalid UTF-8"))?;

    Ok((name, tag, value_range))
}

/// Rejects overlapping ranges and unreferenced data bytes.
///
/// A zero-length range strictly inside another range counts as overlap.
fn check_coverage(spans: &mut [(Range<usize>, usize)], data_len: usize) -> IntegrityResult<()> {
    spans.sort_by_key(|(range, _)| (range.start, range.end));

    let mut max_end = 0usize;
    let mut owner = 0usize;
    let mut referenced = 0usize;

    for (range, index) in spans.iter() {
        if range.start < max_end {
            return Err(IntegrityError::overlap(owner, *index));
        }
        if range.end > max_end {
            max_end = range.end;
            owner = *index;
        }
        referenced += range.len();
    }

    if referenced != data_len {
        return Err(IntegrityError::slack(referenced, data_len));
    }
    Ok(())
}

fn decode_value<'a>(name: &str, tag: TypeTag, bytes: &'a [u8]) -> IntegrityResult<Value<'a>> {
    match tag {
        TypeTag::Array => decode_array(name, bytes),
        scalar => decode_scalar(name, scalar, bytes),
    }
}

fn decode_scalar<'a>(location: &str, tag: TypeTag, bytes: &'a [u8]) -> IntegrityResult<Value<'a>> {
    let width_error = |expected: &str| {
        IntegrityError::malformed_value(location, expected, format!("{} bytes", bytes.len()))
    };

    match tag {
        TypeTag::Int => le_8(bytes)
            .map(|b| Value::Int(i64::from_le_bytes(b)))
            .ok_or_else(|| width_error("8-byte int")),
        TypeTag::Float => {
            let v = f64::from_le_bytes(le_8(bytes).ok_or_else(|| width_error("8-byte float"))?);
            if !v.is_finite() {
                return Err(IntegrityError::malformed_value(location, "finite float", v.to_string()));
            }
            Ok(Value::Float(v))
        }
        TypeTag::Bool => match bytes {
            [0] => Ok(Value::Bool(false)),
            [1] => Ok(Value::Bool(true)),
            [other] => Err(IntegrityError::malformed_value(location, "bool byte 0 or 1", other.to_string())),
            _ => Err(width_error("1-byte bool")),
        },
        TypeTag::String => std::str::from_utf8(bytes)
            .map(Value::Str)
            .map_err(|_| IntegrityError::malformed_value(location, "UTF-8 string", "invalid UTF-8")),
        TypeTag::Bytes => Ok(Value::Bytes(bytes)),
        TypeTag::Array => Err(IntegrityError::malformed_value(location, "scalar element", "nested array")),
    }
}

/// Array payload: element tag byte, then `len u32 + item` repeated to the end.
fn decode_array<'a>(name: &str, bytes: &'a [u8]) -> IntegrityResult<Value<'a>> {
    let (&element_byte, mut rest) = bytes
        .split_first()
        .ok_or_else(|| IntegrityError::malformed_value(name, "array element tag", "empty payload"))?;

    let element = TypeTag::from_u8(element_byte)
        .filter(|tag| tag.is_scalar())
        .ok_or_else(|| {
            IntegrityError::malformed_value(name, "scalar element tag", format!("{:#04x}", element_byte))
        })?;

    let mut items = Vec::new();
    while !rest.is_empty() {
        let location = format!("{}[{}]", name, items.len());
        let len = le_u32(rest, 0).ok_or_else(|| {
            IntegrityError::malformed_value(&location, "4-byte item length", format!("{} trailing bytes", rest.len()))
        })? as usize;
        let end = 4usize
            .checked_add(len)
            .filter(|end| *end <= rest.len())
            .ok_or_else(|| IntegrityError::truncated(location.clone(), len, rest.len() - 4))?;

        items.push(decode_scalar(&location, element, &rest[4..end])?);
        rest = &rest[end..];
    }

    Ok(Value::Array(ArrayValue::new(element, items)))
}
