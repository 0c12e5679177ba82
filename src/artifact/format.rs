//! PDSA artifact container layout
//!
//! All integers are little-endian.
//!
//! ```text
//! +---------------------------+ 0
//! | Magic "PDSA"              | (4 bytes)
//! | Version                   | (u8, = 1)
//! | Flags                     | (u8, bit0 = CRC32 trailer present)
//! | Entry Count               | (u16)
//! | Total Length              | (u32, whole artifact)
//! | Data Length               | (u32, data region)
//! +---------------------------+ 16
//! | Directory                 | (Entry Count x 16 bytes)
//! +---------------------------+
//! | Data Region               | (Data Length bytes)
//! +---------------------------+
//! | Checksum                  | (u32, only if flag bit0)
//! +---------------------------+
//! ```
//!
//! Directory entry:
//!
//! ```text
//! | name_offset u32 | name_len u16 | type_tag u8 | reserved u8 | value_offset u32 | value_len u32 |
//! ```
//!
//! Offsets are relative to the start of the data region. The checksum covers
//! every byte before it.

use std::fmt;

/// Container magic.
pub const MAGIC: [u8; 4] = *b"PDSA";
/// Only supported format version.
pub const FORMAT_VERSION: u8 = 1;
/// Fixed header size.
pub const HEADER_LEN: usize = 16;
/// Fixed directory entry size.
pub const ENTRY_LEN: usize = 16;
/// Checksum trailer size.
pub const CHECKSUM_LEN: usize = 4;
/// Flag bit: CRC32 trailer present.
pub const FLAG_CHECKSUM: u8 = 0x01;
/// Every flag bit this version understands.
pub const KNOWN_FLAGS: u8 = FLAG_CHECKSUM;

/// Runtime type tag carried by every directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// 8-byte signed integer
    Int = 0x01,
    /// 8-byte IEEE-754 double, finite
    Float = 0x02,
    /// 1 byte, 0 or 1
    Bool = 0x03,
    /// UTF-8 text
    String = 0x04,
    /// Opaque bytes
    Bytes = 0x05,
    /// Element tag byte followed by length-prefixed items
    Array = 0x06,
}

impl TypeTag {
    /// Decodes a tag byte. Unknown tags return `None`.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(TypeTag::Int),
            0x02 => Some(TypeTag::Float),
            0x03 => Some(TypeTag::Bool),
            0x04 => Some(TypeTag::String),
            0x05 => Some(TypeTag::Bytes),
            0x06 => Some(TypeTag::Array),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Tags that may appear as array elements.
    pub fn is_scalar(self) -> bool {
        !matches!(self, TypeTag::Array)
    }

    /// Returns the type name for error messages
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::String => "string",
            TypeTag::Bytes => "bytes",
            TypeTag::Array => "array",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub version: u8,
    pub flags: u8,
    pub entry_count: u16,
    pub total_len: u32,
    pub data_len: u32,
}

impl Header {
    /// Reads the header fields. Magic is checked separately.
    pub fn read(bytes: &[u8]) -> Option<Self> {
        Some(Self {
            version: *bytes.get(4)?,
            flags: *bytes.get(5)?,
            entry_count: le_u16(bytes, 6)?,
            total_len: le_u32(bytes, 8)?,
            data_len: le_u32(bytes, 12)?,
        })
    }

    pub fn has_checksum(&self) -> bool {
        self.flags & FLAG_CHECKSUM != 0
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.push(self.version);
        out.push(self.flags);
        out.extend_from_slice(&self.entry_count.to_le_bytes());
        out.extend_from_slice(&self.total_len.to_le_bytes());
        out.extend_from_slice(&self.data_len.to_le_bytes());
    }
}

/// Decoded directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DirectoryEntry {
    pub name_offset: u32,
    pub name_len: u16,
    pub type_tag: u8,
    pub reserved: u8,
    pub value_offset: u32,
    pub value_len: u32,
}

impl DirectoryEntry {
    pub fn read(bytes: &[u8], at: usize) -> Option<Self> {
        Some(Self {
            name_offset: le_u32(bytes, at)?,
            name_len: le_u16(bytes, at + 4)?,
            type_tag: *bytes.get(at + 6)?,
            reserved: *bytes.get(at + 7)?,
            value_offset: le_u32(bytes, at + 8)?,
            value_len: le_u32(bytes, at + 12)?,
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.name_offset.to_le_bytes());
        out.extend_from_slice(&self.name_len.to_le_bytes());
        out.push(self.type_tag);
        out.push(self.reserved);
        out.extend_from_slice(&self.value_offset.to_le_bytes());
        out.extend_from_slice(&self.value_len.to_le_bytes());
    }
}

/// Bounds-checked little-endian u16 read.
pub(crate) fn le_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes(raw.try_into().ok()?))
}

/// Bounds-checked little-endian u32 read.
pub(crate) fn le_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes(raw.try_into().ok()?))
}

/// Bounds-checked little-endian 8-byte read.
pub(crate) fn le_8(bytes: &[u8]) -> Option<[u8; 8]> {
    bytes.try_into().ok()
}
