//! Assembles all story-file regions into one buffer: globals, object
//! table, property tables, dictionary, strings, and high memory, then
//! patches the header once every address is known. Grounded in
//! `grue_compiler::codegen_headers`'s fixed-offset header patching and
//! `zobject_v3`'s property-table byte layout, generalized from "one
//! fixed target version" to the full v3-v8 range and from "patch
//! addresses gathered during codegen" to a region allocator that hands
//! callers real addresses as they build the program.

use std::fmt;

use log::debug;

use crate::bytestream::{ByteStream, StreamError};
use crate::zvalue::{ZAddress, ZMachineVersion};

const HEADER_SIZE: usize = 64;
const GLOBALS_BASE: usize = 0x40;
const GLOBALS_COUNT: usize = 240;
const GLOBALS_SIZE: usize = GLOBALS_COUNT * 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    NoOpenObject,
    ObjectAlreadyOpen(String),
    UnknownObject(String),
    AbbreviationsFinalized,
    TooManyGlobals,
    TooManyObjects,
    PropertyNumberOutOfRange(u8),
    PropertyDataTooLarge(u8, usize),
    ObjectTableFinalized,
    DictionaryFinalized,
    StringTableFinalized,
    RegionOverlap(String, String),
    FileTooLarge(usize, usize),
    Stream(StreamError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NoOpenObject => write!(f, "no object is currently open"),
            LayoutError::ObjectAlreadyOpen(name) => write!(f, "object '{}' is already open", name),
            LayoutError::UnknownObject(name) => write!(f, "no object named '{}'", name),
            LayoutError::AbbreviationsFinalized => write!(f, "abbreviations must be added before the first object is allocated"),
            LayoutError::TooManyGlobals => write!(f, "more than {} globals were allocated", GLOBALS_COUNT),
            LayoutError::TooManyObjects => write!(f, "object table slot exhausted"),
            LayoutError::PropertyNumberOutOfRange(n) => write!(f, "property number {} is out of range", n),
            LayoutError::PropertyDataTooLarge(n, len) => {
                write!(f, "property {} data length {} does not fit in its header form", n, len)
            }
            LayoutError::ObjectTableFinalized => {
                write!(f, "object table is finalized; no further objects or properties may be added")
            }
            LayoutError::DictionaryFinalized => write!(f, "dictionary is finalized; no further words may be added"),
            LayoutError::StringTableFinalized => write!(f, "string table is finalized; no further strings may be added"),
            LayoutError::RegionOverlap(a, b) => write!(f, "region '{}' overlaps region '{}'", a, b),
            LayoutError::FileTooLarge(actual, max) => {
                write!(f, "story file size {} exceeds the version maximum of {}", actual, max)
            }
            LayoutError::Stream(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LayoutError {}

impl From<StreamError> for LayoutError {
    fn from(e: StreamError) -> Self {
        LayoutError::Stream(e)
    }
}

#[derive(Debug, Clone, Default)]
struct ObjectRecord {
    name: String,
    attributes: Vec<bool>,
    parent: u16,
    sibling: u16,
    child: u16,
    properties: Vec<(u8, Vec<u8>)>,
}

#[derive(Debug, Clone)]
struct StringRecord {
    label: String,
    address: u16,
    bytes: Vec<u8>,
}

/// ASCII alphabet-2 characters, excluding space and the two z-chars (6,
/// 7) reserved for the escape and newline codes.
const A2_CHARS: &str = "0123456789.,!?_#'\"/\\-:()";

fn to_zchars(text: &str) -> Vec<u8> {
    let mut zchars = Vec::new();
    for c in text.chars() {
        match c {
            ' ' => zchars.push(0),
            '\n' => {
                zchars.push(5);
                zchars.push(7);
            }
            'a'..='z' => zchars.push(6 + (c as u8 - b'a')),
            'A'..='Z' => {
                zchars.push(4);
                zchars.push(6 + (c as u8 - b'A'));
            }
            c if A2_CHARS.contains(c) => {
                let idx = A2_CHARS.find(c).expect("checked by contains") as u8;
                zchars.push(5);
                zchars.push(8 + idx);
            }
            c if (32..=126).contains(&(c as u32)) => {
                zchars.push(5);
                zchars.push(6);
                let code = c as u8;
                zchars.push(code >> 5);
                zchars.push(code & 0x1F);
            }
            _ => zchars.push(0),
        }
    }
    zchars
}

fn pack_zchars(zchars: &[u8]) -> Vec<u8> {
    let mut words: Vec<u16> = zchars
        .chunks(3)
        .map(|c| ((c[0] as u16) << 10) | ((c[1] as u16) << 5) | (c[2] as u16))
        .collect();
    if let Some(last) = words.last_mut() {
        *last |= 0x8000;
    }
    let mut bytes = Vec::with_capacity(words.len() * 2);
    for w in words {
        bytes.push((w >> 8) as u8);
        bytes.push((w & 0xFF) as u8);
    }
    bytes
}

/// Encodes `text` with no truncation, padding to a multiple of three
/// z-chars with shift-5 filler.
fn encode_string(text: &str) -> Vec<u8> {
    let mut zchars = to_zchars(text);
    while zchars.len() % 3 != 0 {
        zchars.push(5);
    }
    pack_zchars(&zchars)
}

/// Encodes a dictionary entry, truncated (or padded) to the version's
/// fixed z-char count: 6 in v3, 9 in v4+.
fn encode_dictionary_word(word: &str, version: ZMachineVersion) -> Vec<u8> {
    let limit = if version == ZMachineVersion::V3 { 6 } else { 9 };
    let mut zchars = to_zchars(word);
    zchars.truncate(limit);
    while zchars.len() < limit {
        zchars.push(5);
    }
    pack_zchars(&zchars)
}

/// Allocates regions and emits the final story file. Globals and
/// object-entry addresses are available the instant they are
/// allocated; dictionary and string addresses become available once
/// the object table is finalized, which happens implicitly on the
/// first call that needs to know where static memory begins. Once
/// finalized, no further objects, properties, or abbreviations may be
/// added — `start_object`/`add_property`/`allocate_object` return
/// `ObjectTableFinalized` instead.
pub struct MemoryLayoutManager {
    version: ZMachineVersion,
    globals: Vec<String>,
    abbreviations: Vec<String>,
    objects: Vec<ObjectRecord>,
    current_object: Option<usize>,
    dictionary: Vec<String>,
    strings: Vec<StringRecord>,
    routines: Vec<(String, Vec<u8>)>,
    object_table_locked: bool,
    dictionary_locked: bool,
    string_table_locked: bool,
    initial_pc: u16,
    debug_tracing: bool,
}

impl MemoryLayoutManager {
    pub fn new(version: ZMachineVersion) -> Self {
        MemoryLayoutManager {
            version,
            globals: Vec::new(),
            abbreviations: Vec::new(),
            objects: Vec::new(),
            current_object: None,
            dictionary: Vec::new(),
            strings: Vec::new(),
            routines: Vec::new(),
            object_table_locked: false,
            dictionary_locked: false,
            string_table_locked: false,
            initial_pc: 0,
            debug_tracing: false,
        }
    }

    pub fn set_debug_tracing(&mut self, enabled: bool) {
        self.debug_tracing = enabled;
    }

    pub fn set_initial_pc(&mut self, pc: u16) {
        self.initial_pc = pc;
    }

    // -- globals ----------------------------------------------------------

    /// Assigns `name` a sequential 2-byte slot. Re-allocating an
    /// already-known name returns the existing address.
    pub fn allocate_global(&mut self, name: &str) -> Result<u16, LayoutError> {
        if let Some(index) = self.globals.iter().position(|g| g == name) {
            return Ok((GLOBALS_BASE + index * 2) as u16);
        }
        if self.globals.len() >= GLOBALS_COUNT {
            return Err(LayoutError::TooManyGlobals);
        }
        self.globals.push(name.to_string());
        let address = (GLOBALS_BASE + (self.globals.len() - 1) * 2) as u16;
        if self.debug_tracing {
            debug!("global '{}' allocated at {:#06x}", name, address);
        }
        Ok(address)
    }

    // -- abbreviations ------------------------------------------------------

    pub fn add_abbreviation(&mut self, text: &str) -> Result<u8, LayoutError> {
        if self.object_table_locked {
            return Err(LayoutError::ObjectTableFinalized);
        }
        if !self.objects.is_empty() {
            return Err(LayoutError::AbbreviationsFinalized);
        }
        self.abbreviations.push(text.to_string());
        Ok((self.abbreviations.len() - 1) as u8)
    }

    fn abbreviation_table_size(&self) -> usize {
        self.abbreviations.len() * 2
    }

    // -- objects ------------------------------------------------------------

    fn object_entries_addr(&self) -> usize {
        GLOBALS_BASE + GLOBALS_SIZE + self.abbreviation_table_size() + self.version.property_defaults_count() * 2
    }

    /// Assigns `name` a sequential object-table slot and returns its
    /// address immediately; the entry's byte content is filled in at
    /// `generate_story_file` time, so later `add_property` calls for
    /// this object do not move its address.
    pub fn allocate_object(&mut self, name: &str) -> Result<u16, LayoutError> {
        if self.object_table_locked {
            return Err(LayoutError::ObjectTableFinalized);
        }
        if let Some(index) = self.objects.iter().position(|o| o.name == name) {
            return self.object_address(index);
        }
        let index = self.objects.len();
        self.objects.push(ObjectRecord {
            name: name.to_string(),
            attributes: vec![false; self.version.attribute_count()],
            ..Default::default()
        });
        self.object_address(index)
    }

    fn object_address(&self, index: usize) -> Result<u16, LayoutError> {
        let addr = self.object_entries_addr() + index * self.version.object_entry_size();
        u16::try_from(addr).map_err(|_| LayoutError::TooManyObjects)
    }

    fn find_object(&self, name: &str) -> Result<usize, LayoutError> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .ok_or_else(|| LayoutError::UnknownObject(name.to_string()))
    }

    pub fn start_object(&mut self, name: &str) -> Result<(), LayoutError> {
        if self.object_table_locked {
            return Err(LayoutError::ObjectTableFinalized);
        }
        if let Some(open) = self.current_object {
            return Err(LayoutError::ObjectAlreadyOpen(self.objects[open].name.clone()));
        }
        let index = self.find_object(name)?;
        self.current_object = Some(index);
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<(), LayoutError> {
        if self.current_object.take().is_none() {
            return Err(LayoutError::NoOpenObject);
        }
        Ok(())
    }

    /// Records property `number` with `data` on the currently open
    /// object. Property number must fall within the version's valid
    /// range, and the encoded data must fit the header-byte form: up
    /// to 8 bytes in v3, up to 64 in v4+.
    pub fn add_property(&mut self, number: u8, data: Vec<u8>) -> Result<(), LayoutError> {
        if self.object_table_locked {
            return Err(LayoutError::ObjectTableFinalized);
        }
        let index = self.current_object.ok_or(LayoutError::NoOpenObject)?;
        if !self.version.property_number_range().contains(&number) {
            return Err(LayoutError::PropertyNumberOutOfRange(number));
        }
        let max_len = if self.version == ZMachineVersion::V3 { 8 } else { 64 };
        if data.is_empty() || data.len() > max_len {
            return Err(LayoutError::PropertyDataTooLarge(number, data.len()));
        }
        self.objects[index].properties.push((number, data));
        Ok(())
    }

    pub fn set_attribute(&mut self, object_name: &str, attribute: usize, value: bool) -> Result<(), LayoutError> {
        if self.object_table_locked {
            return Err(LayoutError::ObjectTableFinalized);
        }
        let index = self.find_object(object_name)?;
        let record = &mut self.objects[index];
        if attribute >= record.attributes.len() {
            return Err(LayoutError::PropertyNumberOutOfRange(attribute as u8));
        }
        record.attributes[attribute] = value;
        Ok(())
    }

    pub fn set_tree_links(&mut self, object_name: &str, parent: u16, sibling: u16, child: u16) -> Result<(), LayoutError> {
        if self.object_table_locked {
            return Err(LayoutError::ObjectTableFinalized);
        }
        let index = self.find_object(object_name)?;
        let record = &mut self.objects[index];
        record.parent = parent;
        record.sibling = sibling;
        record.child = child;
        Ok(())
    }

    fn property_table_bytes(record: &ObjectRecord, version: ZMachineVersion) -> Result<Vec<u8>, LayoutError> {
        let mut bytes = vec![0u8]; // no short-name text
        let mut sorted = record.properties.clone();
        sorted.sort_by(|a, b| b.0.cmp(&a.0));
        for (number, data) in &sorted {
            if version == ZMachineVersion::V3 {
                let header = ((data.len() as u8 - 1) << 5) | (number & 0x1F);
                bytes.push(header);
            } else {
                bytes.push(0x80 | (number & 0x3F));
                bytes.push(0x80 | ((data.len() as u8 - 1) & 0x3F));
            }
            bytes.extend_from_slice(data);
        }
        bytes.push(0); // terminator
        Ok(bytes)
    }

    fn property_tables_total_size(&self) -> Result<usize, LayoutError> {
        let mut total = 0;
        for record in &self.objects {
            total += Self::property_table_bytes(record, self.version)?.len();
        }
        Ok(total)
    }

    fn static_memory_base(&self) -> Result<usize, LayoutError> {
        Ok(self.object_entries_addr() + self.objects.len() * self.version.object_entry_size() + self.property_tables_total_size()?)
    }

    /// Finalizes the object table if it is not already, returning an
    /// error if an object is still open.
    fn ensure_object_table_locked(&mut self) -> Result<(), LayoutError> {
        if self.object_table_locked {
            return Ok(());
        }
        if self.current_object.is_some() {
            return Err(LayoutError::ObjectAlreadyOpen(
                self.objects[self.current_object.unwrap()].name.clone(),
            ));
        }
        self.object_table_locked = true;
        Ok(())
    }

    // -- dictionary ---------------------------------------------------------

    pub fn add_dictionary_word(&mut self, word: &str) -> Result<(), LayoutError> {
        self.ensure_object_table_locked()?;
        if self.dictionary_locked {
            return Err(LayoutError::DictionaryFinalized);
        }
        if !self.dictionary.iter().any(|w| w == word) {
            self.dictionary.push(word.to_string());
        }
        Ok(())
    }

    fn sorted_dictionary(&self) -> Vec<String> {
        let mut words = self.dictionary.clone();
        words.sort();
        words
    }

    fn dictionary_entry_size(&self) -> usize {
        if self.version == ZMachineVersion::V3 {
            4
        } else {
            6
        }
    }

    fn dictionary_bytes(&self) -> Vec<u8> {
        let separators = ".,\"";
        let entry_size = self.dictionary_entry_size();
        let mut bytes = vec![separators.len() as u8];
        bytes.extend(separators.bytes());
        bytes.push(entry_size as u8);
        let words = self.sorted_dictionary();
        bytes.push((words.len() >> 8) as u8);
        bytes.push((words.len() & 0xFF) as u8);
        for word in &words {
            bytes.extend(encode_dictionary_word(word, self.version));
        }
        bytes
    }

    fn dictionary_size(&self) -> usize {
        // separator count byte + separators + entry-length byte + word-count word
        1 + 3 + 1 + 2 + self.dictionary.len() * self.dictionary_entry_size()
    }

    // -- strings --------------------------------------------------------------

    /// Appends `content` to the static-memory string table and returns
    /// its address. Finalizes the object table and the dictionary as a
    /// side effect, since both precede the string table in region
    /// order.
    pub fn add_string(&mut self, label: &str, content: &str) -> Result<ZAddress, LayoutError> {
        self.ensure_object_table_locked()?;
        self.dictionary_locked = true;
        if self.string_table_locked {
            return Err(LayoutError::StringTableFinalized);
        }
        if let Some(existing) = self.strings.iter().find(|s| s.label == label) {
            return Ok(ZAddress::raw(existing.address as u32));
        }
        let strings_base = self.static_memory_base()? + self.dictionary_size();
        let offset: usize = self.strings.iter().map(|s| s.bytes.len()).sum();
        let address = u16::try_from(strings_base + offset).map_err(|_| LayoutError::FileTooLarge(strings_base + offset, self.version.max_memory_size()))?;
        let bytes = encode_string(content);
        if self.debug_tracing {
            debug!("string '{}' ({} bytes) placed at {:#06x}", label, bytes.len(), address);
        }
        self.strings.push(StringRecord {
            label: label.to_string(),
            address,
            bytes,
        });
        Ok(ZAddress::raw(address as u32))
    }

    fn strings_total_size(&self) -> usize {
        self.strings.iter().map(|s| s.bytes.len()).sum()
    }

    // -- routines (high memory) ----------------------------------------------

    /// Appends a finished routine's bytes to high memory and returns
    /// its packed address. Finalizes the string table as a side
    /// effect.
    pub fn add_routine(&mut self, label: &str, bytes: Vec<u8>) -> Result<ZAddress, LayoutError> {
        self.ensure_object_table_locked()?;
        self.dictionary_locked = true;
        self.string_table_locked = true;

        let multiplier = self.version.packed_address_multiplier() as usize;
        let mut address = self.static_memory_base()? + self.dictionary_size() + self.strings_total_size();
        for (_, existing_bytes) in &self.routines {
            if address % multiplier != 0 {
                address += multiplier - (address % multiplier);
            }
            address += existing_bytes.len();
        }
        if address % multiplier != 0 {
            address += multiplier - (address % multiplier);
        }
        self.routines.push((label.to_string(), bytes));
        Ok(ZAddress::pack(address as u32, self.version))
    }

    // -- emission -------------------------------------------------------------

    /// Writes header, dynamic memory, static memory, then high memory;
    /// computes file length and checksum and patches the header
    /// fields. Fails if any region overlaps another or the resulting
    /// file exceeds the version's maximum size.
    pub fn generate_story_file(&mut self) -> Result<Vec<u8>, LayoutError> {
        self.ensure_object_table_locked()?;
        self.dictionary_locked = true;
        self.string_table_locked = true;

        let mut stream = ByteStream::with_capacity(HEADER_SIZE * 4);
        stream.seek(0);
        for _ in 0..HEADER_SIZE {
            stream.write_byte(0);
        }

        // globals: fixed-size region, slots beyond those allocated stay zero.
        stream.seek(GLOBALS_BASE);
        stream.pad_to(GLOBALS_BASE + GLOBALS_SIZE, 0);

        // abbreviation address table: no abbreviation content is emitted
        // beyond the pointer slots themselves (abbreviations default to
        // empty and are not otherwise referenced by emitted strings).
        let abbrev_addr = GLOBALS_BASE + GLOBALS_SIZE;
        for _ in 0..self.abbreviations.len() {
            stream.write_word(0);
        }

        // property defaults: all zero; callers have no API to override
        // a default property value in this toolchain.
        let object_table_addr = stream.current_position();
        for _ in 0..self.version.property_defaults_count() {
            stream.write_word(0);
        }

        let object_entries_addr = stream.current_position();
        if object_entries_addr != self.object_entries_addr() {
            return Err(LayoutError::RegionOverlap("property-defaults".into(), "object-entries".into()));
        }

        let mut property_table_addrs = Vec::with_capacity(self.objects.len());
        let mut property_tables = Vec::with_capacity(self.objects.len());
        let mut running_addr = object_entries_addr + self.objects.len() * self.version.object_entry_size();
        for record in &self.objects {
            let bytes = Self::property_table_bytes(record, self.version)?;
            property_table_addrs.push(running_addr);
            running_addr += bytes.len();
            property_tables.push(bytes);
        }

        for (index, record) in self.objects.iter().enumerate() {
            if self.version == ZMachineVersion::V3 {
                let mut flags: u32 = 0;
                for (i, set) in record.attributes.iter().enumerate() {
                    if *set {
                        flags |= 1 << (31 - i);
                    }
                }
                stream.write_dword(flags);
                stream.write_byte(record.parent as u8);
                stream.write_byte(record.sibling as u8);
                stream.write_byte(record.child as u8);
            } else {
                let mut hi: u32 = 0;
                let mut lo: u32 = 0;
                for (i, set) in record.attributes.iter().enumerate() {
                    if !*set {
                        continue;
                    }
                    if i < 32 {
                        hi |= 1 << (31 - i);
                    } else {
                        lo |= 1 << (47 - i);
                    }
                }
                stream.write_dword(hi);
                stream.write_word(lo as u16);
                stream.write_word(record.parent);
                stream.write_word(record.sibling);
                stream.write_word(record.child);
            }
            stream.write_word(property_table_addrs[index] as u16);
        }

        for bytes in &property_tables {
            for byte in bytes {
                stream.write_byte(*byte);
            }
        }

        let static_memory_base = stream.current_position();
        if static_memory_base != self.static_memory_base()? {
            return Err(LayoutError::RegionOverlap("object-region".into(), "static-memory".into()));
        }

        let dictionary_bytes = self.dictionary_bytes();
        for byte in &dictionary_bytes {
            stream.write_byte(*byte);
        }

        let mut string_addrs = Vec::with_capacity(self.strings.len());
        for record in &self.strings {
            string_addrs.push((record.label.clone(), stream.current_position() as u16));
            for byte in &record.bytes {
                stream.write_byte(*byte);
            }
        }
        // every address handed out by add_string must match where the
        // bytes actually land.
        for (label, actual) in &string_addrs {
            if let Some(record) = self.strings.iter().find(|s| &s.label == label) {
                if record.address != *actual {
                    return Err(LayoutError::RegionOverlap("dictionary".into(), "strings".into()));
                }
            }
        }

        let multiplier = self.version.packed_address_multiplier() as usize;
        stream.pad_to(multiplier, 0);
        let high_memory_base = stream.current_position();

        for (_, bytes) in &self.routines {
            stream.pad_to(multiplier, 0);
            for byte in bytes {
                stream.write_byte(*byte);
            }
        }

        let file_length = stream.length();
        let max_size = self.version.max_memory_size();
        if file_length > max_size {
            return Err(LayoutError::FileTooLarge(file_length, max_size));
        }

        // patch header fields now that every address is known.
        stream.patch_byte(0, self.version.as_byte())?;
        stream.patch_word(4, high_memory_base as u16)?;
        if self.version == ZMachineVersion::V3 {
            stream.patch_word(6, self.initial_pc)?;
        } else {
            let packed_pc = ZAddress::pack(self.initial_pc as u32, self.version);
            stream.patch_word(6, packed_pc.raw as u16)?;
        }
        stream.patch_word(8, static_memory_base as u16)?;
        stream.patch_word(10, object_table_addr as u16)?;
        stream.patch_word(12, GLOBALS_BASE as u16)?;
        stream.patch_word(14, static_memory_base as u16)?;
        stream.patch_word(24, abbrev_addr as u16)?;

        let divisor = self.version.file_length_divisor();
        stream.patch_word(26, (file_length / divisor) as u16)?;

        let checksum = stream.sum_range(HEADER_SIZE, file_length);
        stream.patch_word(28, checksum)?;

        debug!(
            "story file assembled: {} bytes, high memory at {:#06x}, checksum {:#06x}",
            file_length, high_memory_base, checksum
        );

        Ok(stream.into_bytes())
    }

    /// Returns warning strings describing anything wrong with an
    /// already-generated story file. Never fails outright — mirrors
    /// `generateStoryFile`'s "inspectable partial artifact" contract.
    pub fn validate_story_file(&self, bytes: &[u8]) -> Vec<String> {
        let mut warnings = Vec::new();

        if bytes.len() < HEADER_SIZE {
            warnings.push(format!("story file is only {} bytes, smaller than the 64-byte header", bytes.len()));
            return warnings;
        }

        let version_byte = bytes[0];
        if ZMachineVersion::from_byte(version_byte) != Some(self.version) {
            warnings.push(format!("header version byte {} does not match the target version {}", version_byte, self.version));
        }

        let stream = ByteStream::from_bytes(bytes.to_vec());
        let static_base = stream.peek_word_at(14).unwrap_or(0) as usize;
        let high_base = stream.peek_word_at(4).unwrap_or(0) as usize;
        if static_base > bytes.len() || high_base > bytes.len() {
            warnings.push("header region address points past the end of the file".to_string());
        }
        if static_base > high_base {
            warnings.push("static memory base falls after high memory base".to_string());
        }

        let initial_pc_field = stream.peek_word_at(6).unwrap_or(0) as usize;
        let pc = if self.version == ZMachineVersion::V3 {
            initial_pc_field
        } else {
            initial_pc_field * self.version.packed_address_multiplier() as usize
        };
        if pc < high_base {
            warnings.push("initial PC does not lie in the high-memory region".to_string());
        }

        let recorded_checksum = stream.peek_word_at(28).unwrap_or(0);
        let computed_checksum = stream.sum_range(HEADER_SIZE, bytes.len());
        if recorded_checksum != computed_checksum {
            warnings.push(format!(
                "checksum mismatch: header says {:#06x}, computed {:#06x}",
                recorded_checksum, computed_checksum
            ));
        }

        warnings
    }
}

#[cfg(test)]
#[path = "memory_layout_tests.rs"]
mod tests;
