//! The read-only view a running interpreter would have of a loaded
//! story file: a parsed header and raw access to dynamic/static/high
//! memory. Grounded in `header.rs`'s `Header` (a parsed view over the
//! same 64-byte layout `memory_layout` writes) and `game.rs`'s
//! `GameFile` (the struct that owns the raw bytes and answers variable
//! lookups), generalized from "only a v3 adventure" to the full
//! v3-v8 header field set this crate's assembler emits.

use std::fmt;

use crate::bytestream::ByteStream;
use crate::diagnostic::Severity;
use crate::zvalue::ZMachineVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    CorruptedStoryFile(String),
    InvalidMemoryAccess(usize),
    UnsupportedOperation(String),
}

impl RuntimeError {
    /// `corruptedStoryFile` is the only fatal runtime error;
    /// `unsupportedOperation` is the only warning. Everything else is
    /// an ordinary error (spec.md §7).
    pub fn severity(&self) -> Severity {
        match self {
            RuntimeError::CorruptedStoryFile(_) => Severity::Fatal,
            RuntimeError::UnsupportedOperation(_) => Severity::Warning,
            RuntimeError::InvalidMemoryAccess(_) => Severity::Error,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::CorruptedStoryFile(msg) => write!(f, "corrupted story file: {}", msg),
            RuntimeError::InvalidMemoryAccess(addr) => write!(f, "invalid memory access at {:#06x}", addr),
            RuntimeError::UnsupportedOperation(msg) => write!(f, "unsupported operation: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// A parsed view over a story file's 64-byte header. Field offsets
/// match what `memory_layout::MemoryLayoutManager::generate_story_file`
/// writes.
#[derive(Debug, Clone)]
pub struct Header {
    pub version: ZMachineVersion,
    pub release: u16,
    pub high_mem_base: u16,
    pub initial_pc: u16,
    pub dictionary_addr: u16,
    pub object_table_addr: u16,
    pub global_variables_addr: u16,
    pub static_mem_base: u16,
    pub abbrev_table_addr: u16,
    pub file_length: usize,
    pub checksum: u16,
}

impl Header {
    pub fn parse(bytes: &[u8]) -> Result<Self, RuntimeError> {
        if bytes.len() < 64 {
            return Err(RuntimeError::CorruptedStoryFile(format!(
                "story file is only {} bytes, smaller than the 64-byte header",
                bytes.len()
            )));
        }
        let version = ZMachineVersion::from_byte(bytes[0])
            .ok_or_else(|| RuntimeError::CorruptedStoryFile(format!("unrecognized version byte {}", bytes[0])))?;
        let stream = ByteStream::from_bytes(bytes.to_vec());
        let word = |offset: usize| -> u16 { stream.peek_word_at(offset).unwrap_or(0) };

        Ok(Header {
            version,
            release: word(2),
            high_mem_base: word(4),
            initial_pc: word(6),
            dictionary_addr: word(8),
            object_table_addr: word(10),
            global_variables_addr: word(12),
            static_mem_base: word(14),
            abbrev_table_addr: word(24),
            file_length: word(26) as usize * version.file_length_divisor(),
            checksum: word(28),
        })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Z-code version:           {}\n\
             Release number:           {}\n\
             High memory base:         {:#06x}\n\
             Initial PC:               {:#06x}\n\
             Dictionary address:       {:#06x}\n\
             Object table address:     {:#06x}\n\
             Global variables address: {:#06x}\n\
             Static memory base:       {:#06x}\n\
             Abbreviations address:    {:#06x}\n\
             File length:              {:#06x}\n\
             Checksum:                 {:#06x}\n",
            self.version,
            self.release,
            self.high_mem_base,
            self.initial_pc,
            self.dictionary_addr,
            self.object_table_addr,
            self.global_variables_addr,
            self.static_mem_base,
            self.abbrev_table_addr,
            self.file_length,
            self.checksum,
        )
    }
}

/// Exposes a loaded story file's memory to an interpreter: the parsed
/// header, the raw bytes, and variable resolution (stack / local /
/// global). Does not execute instructions — that is outside this
/// crate's scope.
#[derive(Default)]
pub struct ZMachine {
    header: Option<Header>,
    story_data: Vec<u8>,
}

impl ZMachine {
    pub fn new() -> Self {
        ZMachine {
            header: None,
            story_data: Vec::new(),
        }
    }

    /// Parses `bytes` as a story file. The header must parse and the
    /// computed checksum over `bytes[64..]` must match the header's
    /// checksum word, or this fails with `CorruptedStoryFile`.
    pub fn load_story_file(&mut self, bytes: Vec<u8>) -> Result<(), RuntimeError> {
        let header = Header::parse(&bytes)?;
        let stream = ByteStream::from_bytes(bytes.clone());
        let computed = stream.sum_range(64, bytes.len());
        if computed != header.checksum {
            return Err(RuntimeError::CorruptedStoryFile(format!(
                "checksum mismatch: header says {:#06x}, computed {:#06x}",
                header.checksum, computed
            )));
        }
        self.header = Some(header);
        self.story_data = bytes;
        Ok(())
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn story_data(&self) -> &[u8] {
        &self.story_data
    }

    /// `0` pops the stack (unmodeled here, so it reads as 0), `1..=15`
    /// reads a local (also unmodeled), `16..=255` reads global variable
    /// `index - 16` from the loaded story file. An unloaded VM reads
    /// every index as 0.
    pub fn get_variable(&self, index: u8) -> u16 {
        if self.header.is_none() {
            return 0;
        }
        match index {
            0..=15 => 0,
            global => {
                let header = self.header.as_ref().expect("checked above");
                let addr = header.global_variables_addr as usize + (global as usize - 16) * 2;
                let stream = ByteStream::from_bytes(self.story_data.clone());
                stream.peek_word_at(addr).unwrap_or(0)
            }
        }
    }

    /// Cross-checks the header's region addresses against the loaded
    /// bytes: every address must point inside the buffer, and static
    /// memory must not begin after high memory. On an unloaded VM the
    /// result is implementation-defined (spec.md §9 open question);
    /// this implementation returns `false`.
    pub fn validate_memory_management(&self) -> bool {
        let header = match &self.header {
            Some(h) => h,
            None => return false,
        };
        let len = self.story_data.len();
        if header.static_mem_base as usize > len || header.high_mem_base as usize > len {
            return false;
        }
        if header.static_mem_base > header.high_mem_base {
            return false;
        }
        if header.object_table_addr as usize >= len || header.dictionary_addr as usize >= len {
            return false;
        }
        true
    }

    pub fn get_max_memory_size(version: ZMachineVersion) -> usize {
        version.max_memory_size()
    }
}

#[cfg(test)]
#[path = "vm_memory_tests.rs"]
mod tests;
