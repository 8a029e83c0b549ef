//! Compiler session configuration. Holds the knobs that are genuinely
//! configuration rather than spec-mandated behavior, serialized with
//! `serde` and loaded from TOML the way the teacher's settings types
//! do — a plain derive, no custom (de)serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::zvalue::ZMachineVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Toml(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Toml(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A serializable stand-in for `ZMachineVersion` — `serde` needs a
/// plain derive target, and the raw version byte is what a TOML file
/// actually spells (`target_version = 3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
struct VersionByte(ZMachineVersion);

impl TryFrom<u8> for VersionByte {
    type Error = String;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        ZMachineVersion::from_byte(byte)
            .map(VersionByte)
            .ok_or_else(|| format!("{} is not a valid z-machine version", byte))
    }
}

impl From<VersionByte> for u8 {
    fn from(v: VersionByte) -> u8 {
        v.0.as_byte()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    target_version: VersionByte,
    pub max_macro_expansion_depth: usize,
    pub warnings_as_errors: bool,
    pub debug_tracing: bool,
}

impl CompilerConfig {
    pub fn target_version(&self) -> ZMachineVersion {
        self.target_version.0
    }

    pub fn set_target_version(&mut self, version: ZMachineVersion) {
        self.target_version = VersionByte(version);
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Toml(e.to_string()))
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            target_version: VersionByte(ZMachineVersion::V3),
            max_macro_expansion_depth: 64,
            warnings_as_errors: false,
            debug_tracing: false,
        }
    }
}
