use super::*;
use crate::memory_layout::MemoryLayoutManager;

/// A minimal, hand-built v3 story file: a 64-byte header plus 6 bytes
/// of dynamic memory holding one global variable (global 0 == 1234),
/// with every region address pointing at offset 64 and a correct
/// checksum.
fn sample_bytes() -> Vec<u8> {
    let mut bytes = vec![0u8; 70];
    bytes[0] = 3;
    for offset in [4, 6, 8, 10, 12, 14] {
        bytes[offset] = 0x00;
        bytes[offset + 1] = 0x40;
    }
    bytes[64] = (1234u16 >> 8) as u8;
    bytes[65] = (1234u16 & 0xFF) as u8;

    let len_div = (bytes.len() as u16) / 2;
    bytes[26] = (len_div >> 8) as u8;
    bytes[27] = (len_div & 0xFF) as u8;

    let sum: u32 = bytes[64..].iter().map(|b| *b as u32).sum();
    let checksum = (sum & 0xFFFF) as u16;
    bytes[28] = (checksum >> 8) as u8;
    bytes[29] = (checksum & 0xFF) as u8;
    bytes
}

#[test]
fn parsing_a_short_buffer_is_a_corrupted_story_file_error() {
    let err = Header::parse(&[0u8; 10]).unwrap_err();
    assert!(matches!(err, RuntimeError::CorruptedStoryFile(_)));
}

#[test]
fn header_fields_are_parsed_from_known_offsets() {
    let header = Header::parse(&sample_bytes()).unwrap();
    assert_eq!(header.version, ZMachineVersion::V3);
    assert_eq!(header.high_mem_base, 0x40);
    assert_eq!(header.dictionary_addr, 0x40);
    assert_eq!(header.object_table_addr, 0x40);
    assert_eq!(header.global_variables_addr, 0x40);
    assert_eq!(header.static_mem_base, 0x40);
}

#[test]
fn load_story_file_rejects_a_checksum_mismatch() {
    let mut bytes = sample_bytes();
    bytes[65] ^= 0xFF; // corrupt a dynamic-memory byte without fixing the checksum
    let mut vm = ZMachine::new();
    let err = vm.load_story_file(bytes).unwrap_err();
    assert!(matches!(err, RuntimeError::CorruptedStoryFile(_)));
}

#[test]
fn load_story_file_accepts_a_matching_checksum() {
    let mut vm = ZMachine::new();
    vm.load_story_file(sample_bytes()).unwrap();
    assert!(vm.header().is_some());
}

#[test]
fn unloaded_vm_reads_every_variable_as_zero() {
    let vm = ZMachine::new();
    assert_eq!(vm.get_variable(0), 0);
    assert_eq!(vm.get_variable(16), 0);
    assert_eq!(vm.get_variable(255), 0);
}

#[test]
fn get_variable_reads_a_global_from_loaded_story_data() {
    let mut vm = ZMachine::new();
    vm.load_story_file(sample_bytes()).unwrap();
    assert_eq!(vm.get_variable(16), 1234); // global 0, index 16
}

#[test]
fn stack_and_local_indices_read_as_zero() {
    let mut vm = ZMachine::new();
    vm.load_story_file(sample_bytes()).unwrap();
    assert_eq!(vm.get_variable(0), 0);
    assert_eq!(vm.get_variable(5), 0);
}

#[test]
fn unloaded_vm_fails_memory_validation() {
    let vm = ZMachine::new();
    assert!(!vm.validate_memory_management());
}

#[test]
fn a_story_file_built_by_the_memory_layout_engine_validates() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    mgr.add_routine("GO", vec![0xB0]).unwrap();
    let bytes = mgr.generate_story_file().unwrap();

    let mut vm = ZMachine::new();
    vm.load_story_file(bytes).unwrap();
    assert!(vm.validate_memory_management());
}

#[test]
fn max_memory_size_matches_the_version_table() {
    assert_eq!(ZMachine::get_max_memory_size(ZMachineVersion::V3), 131_072);
    assert_eq!(ZMachine::get_max_memory_size(ZMachineVersion::V5), 262_144);
}

#[test]
fn runtime_error_severities_match_the_spec() {
    assert_eq!(RuntimeError::CorruptedStoryFile("x".into()).severity(), Severity::Fatal);
    assert_eq!(RuntimeError::UnsupportedOperation("x".into()).severity(), Severity::Warning);
    assert_eq!(RuntimeError::InvalidMemoryAccess(0).severity(), Severity::Error);
}
