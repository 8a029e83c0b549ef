//! The runtime value domain and the Z-Machine version table. Shared by the
//! macro processor (constant folding is not done here, but `ZValue` is the
//! currency symbols resolve to), the instruction encoder (operand values),
//! and the memory-layout engine (packed-address arithmetic).

use std::fmt;

/// An object number in the object table. Not validated against a version's
/// object count here — that is the memory-layout engine's job.
pub type ObjectId = u16;
pub type RoutineId = u32;

#[derive(Debug, Clone, PartialEq)]
pub enum ZValue {
    Null,
    Number(i16),
    Str(String),
    Atom(String),
    Object(ObjectId),
    Routine(RoutineId),
}

impl ZValue {
    /// `null` and `number(0)` are false; everything else, including the
    /// empty string, is true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, ZValue::Null | ZValue::Number(0))
    }

    pub fn as_number(&self) -> Option<i16> {
        match self {
            ZValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ZValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            ZValue::Atom(name) => Some(name),
            _ => None,
        }
    }
}

/// An address that may or may not be packed. Packed addresses are divided
/// by a version-specific multiplier so a 16-bit field can reach all of high
/// memory; raw addresses are plain byte offsets. The two never cross code
/// paths unmarked — `packed` is load-bearing, not decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZAddress {
    pub raw: u32,
    pub packed: bool,
}

impl ZAddress {
    pub fn raw(raw: u32) -> Self {
        ZAddress { raw, packed: false }
    }

    pub fn packed(raw: u32) -> Self {
        ZAddress { raw, packed: true }
    }

    /// Convert a raw byte address into its packed form for `version`.
    pub fn pack(byte_address: u32, version: ZMachineVersion) -> Self {
        ZAddress {
            raw: byte_address / version.packed_address_multiplier(),
            packed: true,
        }
    }

    /// Convert a packed address back into a raw byte address for `version`.
    pub fn unpack(&self, version: ZMachineVersion) -> u32 {
        if self.packed {
            self.raw * version.packed_address_multiplier()
        } else {
            self.raw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZMachineVersion {
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
}

impl ZMachineVersion {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            3 => Some(ZMachineVersion::V3),
            4 => Some(ZMachineVersion::V4),
            5 => Some(ZMachineVersion::V5),
            6 => Some(ZMachineVersion::V6),
            7 => Some(ZMachineVersion::V7),
            8 => Some(ZMachineVersion::V8),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            ZMachineVersion::V3 => 3,
            ZMachineVersion::V4 => 4,
            ZMachineVersion::V5 => 5,
            ZMachineVersion::V6 => 6,
            ZMachineVersion::V7 => 7,
            ZMachineVersion::V8 => 8,
        }
    }

    /// Maximum total story-file size, in bytes.
    pub fn max_memory_size(&self) -> usize {
        match self {
            ZMachineVersion::V3 => 128 * 1024,
            ZMachineVersion::V4 | ZMachineVersion::V5 => 256 * 1024,
            ZMachineVersion::V6 | ZMachineVersion::V7 | ZMachineVersion::V8 => 512 * 1024,
        }
    }

    /// Bytes per object-table entry (attribute flags + tree links + header).
    pub fn object_entry_size(&self) -> usize {
        match self {
            ZMachineVersion::V3 => 9,
            _ => 14,
        }
    }

    pub fn attribute_count(&self) -> usize {
        match self {
            ZMachineVersion::V3 => 32,
            _ => 48,
        }
    }

    /// Inclusive range of valid property numbers.
    pub fn property_number_range(&self) -> std::ops::RangeInclusive<u8> {
        match self {
            ZMachineVersion::V3 => 1..=31,
            _ => 1..=63,
        }
    }

    pub fn packed_address_multiplier(&self) -> u32 {
        match self {
            ZMachineVersion::V3 => 2,
            ZMachineVersion::V4 | ZMachineVersion::V5 | ZMachineVersion::V7 | ZMachineVersion::V8 => 4,
            ZMachineVersion::V6 => 8,
        }
    }

    /// Divisor applied to the file length before it is stored in the header
    /// (spec.md §4.7, header bytes 26-27).
    pub fn file_length_divisor(&self) -> usize {
        match self {
            ZMachineVersion::V3 => 2,
            ZMachineVersion::V4 | ZMachineVersion::V5 => 4,
            ZMachineVersion::V6 | ZMachineVersion::V7 | ZMachineVersion::V8 => 8,
        }
    }

    pub fn has_sound(&self) -> bool {
        !matches!(self, ZMachineVersion::V3)
    }

    pub fn has_color(&self) -> bool {
        matches!(
            self,
            ZMachineVersion::V5 | ZMachineVersion::V6 | ZMachineVersion::V7 | ZMachineVersion::V8
        )
    }

    pub fn has_graphics(&self) -> bool {
        matches!(self, ZMachineVersion::V6)
    }

    pub fn has_unicode(&self) -> bool {
        matches!(
            self,
            ZMachineVersion::V5 | ZMachineVersion::V6 | ZMachineVersion::V7 | ZMachineVersion::V8
        )
    }

    pub fn has_extended_instructions(&self) -> bool {
        matches!(
            self,
            ZMachineVersion::V5 | ZMachineVersion::V6 | ZMachineVersion::V7 | ZMachineVersion::V8
        )
    }

    /// Number of property-default words at the start of the object table
    /// (spec.md §4.7).
    pub fn property_defaults_count(&self) -> usize {
        match self {
            ZMachineVersion::V3 => 31,
            _ => 63,
        }
    }
}

impl fmt::Display for ZMachineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_byte())
    }
}
