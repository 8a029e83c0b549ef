use super::*;

#[test]
fn allocate_global_returns_sequential_addresses() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    assert_eq!(mgr.allocate_global("SCORE").unwrap(), 64);
    assert_eq!(mgr.allocate_global("MOVES").unwrap(), 66);
    assert_eq!(mgr.allocate_global("HERE").unwrap(), 68);
}

#[test]
fn reallocating_a_global_returns_its_existing_address() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    let first = mgr.allocate_global("SCORE").unwrap();
    mgr.allocate_global("MOVES").unwrap();
    assert_eq!(mgr.allocate_global("SCORE").unwrap(), first);
}

#[test]
fn object_addresses_respect_version_entry_size() {
    let mut v3 = MemoryLayoutManager::new(ZMachineVersion::V3);
    let a = v3.allocate_object("ROOM-A").unwrap();
    let b = v3.allocate_object("ROOM-B").unwrap();
    assert_eq!(b - a, 9);

    let mut v4 = MemoryLayoutManager::new(ZMachineVersion::V4);
    let a = v4.allocate_object("ROOM-A").unwrap();
    let b = v4.allocate_object("ROOM-B").unwrap();
    assert_eq!(b - a, 14);
}

#[test]
fn starting_an_already_open_object_is_rejected() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    mgr.allocate_object("ROOM").unwrap();
    mgr.allocate_object("HALL").unwrap();
    mgr.start_object("ROOM").unwrap();
    let err = mgr.start_object("HALL").unwrap_err();
    assert_eq!(err, LayoutError::ObjectAlreadyOpen("ROOM".to_string()));
}

#[test]
fn adding_a_property_with_no_open_object_is_rejected() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    let err = mgr.add_property(5, vec![1]).unwrap_err();
    assert_eq!(err, LayoutError::NoOpenObject);
}

#[test]
fn property_number_out_of_range_is_rejected() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    mgr.allocate_object("ROOM").unwrap();
    mgr.start_object("ROOM").unwrap();
    let err = mgr.add_property(32, vec![1]).unwrap_err();
    assert_eq!(err, LayoutError::PropertyNumberOutOfRange(32));
}

#[test]
fn v3_property_data_over_eight_bytes_is_rejected() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    mgr.allocate_object("ROOM").unwrap();
    mgr.start_object("ROOM").unwrap();
    let err = mgr.add_property(5, vec![0; 9]).unwrap_err();
    assert_eq!(err, LayoutError::PropertyDataTooLarge(5, 9));
}

#[test]
fn emitted_property_table_matches_the_object_entrys_pointer() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    let addr = mgr.allocate_object("ROOM").unwrap() as usize;
    mgr.start_object("ROOM").unwrap();
    mgr.add_property(5, vec![0xAA, 0xBB]).unwrap();
    mgr.end_object().unwrap();

    let bytes = mgr.generate_story_file().unwrap();
    let prop_ptr = (((bytes[addr + 7] as u16) << 8) | bytes[addr + 8] as u16) as usize;

    assert_eq!(bytes[prop_ptr], 0); // no short name text
    assert_eq!(bytes[prop_ptr + 1], 0x25); // (2-1)<<5 | 5
    assert_eq!(&bytes[prop_ptr + 2..prop_ptr + 4], &[0xAA, 0xBB]);
    assert_eq!(bytes[prop_ptr + 4], 0); // terminator
}

#[test]
fn properties_emit_in_descending_number_order() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    let addr = mgr.allocate_object("ROOM").unwrap() as usize;
    mgr.start_object("ROOM").unwrap();
    mgr.add_property(3, vec![0x01]).unwrap();
    mgr.add_property(9, vec![0x02]).unwrap();
    mgr.end_object().unwrap();

    let bytes = mgr.generate_story_file().unwrap();
    let prop_ptr = (((bytes[addr + 7] as u16) << 8) | bytes[addr + 8] as u16) as usize;

    assert_eq!(&bytes[prop_ptr..prop_ptr + 6], &[0x00, 0x09, 0x02, 0x03, 0x01, 0x00]);
}

#[test]
fn add_string_returns_monotonically_increasing_addresses() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    let first = mgr.add_string("GREETING", "hello").unwrap();
    let second = mgr.add_string("FAREWELL", "bye").unwrap();
    assert!(second.raw > first.raw);
}

#[test]
fn add_string_is_idempotent_for_the_same_label() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    let first = mgr.add_string("GREETING", "hello").unwrap();
    let again = mgr.add_string("GREETING", "hello").unwrap();
    assert_eq!(first, again);
}

#[test]
fn adding_an_abbreviation_after_an_object_exists_is_rejected() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    mgr.allocate_object("ROOM").unwrap();
    let err = mgr.add_abbreviation("THE ").unwrap_err();
    assert_eq!(err, LayoutError::AbbreviationsFinalized);
}

#[test]
fn adding_a_dictionary_word_after_a_string_is_rejected() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    mgr.add_string("GREETING", "hello").unwrap();
    let err = mgr.add_dictionary_word("north").unwrap_err();
    assert_eq!(err, LayoutError::DictionaryFinalized);
}

#[test]
fn generated_story_file_has_no_validation_warnings() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    let pc = mgr.add_routine("GO", vec![0xB0]).unwrap();
    mgr.set_initial_pc(pc.unpack(ZMachineVersion::V3) as u16);

    let bytes = mgr.generate_story_file().unwrap();
    let warnings = mgr.validate_story_file(&bytes);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[test]
fn validate_story_file_flags_a_truncated_buffer() {
    let mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    let warnings = mgr.validate_story_file(&[0u8; 10]);
    assert!(warnings.iter().any(|w| w.contains("64-byte header")));
}

#[test]
fn validate_story_file_flags_a_version_mismatch() {
    let mut v3 = MemoryLayoutManager::new(ZMachineVersion::V3);
    v3.add_routine("GO", vec![0xB0]).unwrap();
    let bytes = v3.generate_story_file().unwrap();

    let v4 = MemoryLayoutManager::new(ZMachineVersion::V4);
    let warnings = v4.validate_story_file(&bytes);
    assert!(warnings.iter().any(|w| w.contains("version")));
}

#[test]
fn exhausting_the_global_table_is_rejected() {
    let mut mgr = MemoryLayoutManager::new(ZMachineVersion::V3);
    for i in 0..240 {
        mgr.allocate_global(&format!("G{}", i)).unwrap();
    }
    let err = mgr.allocate_global("ONE-TOO-MANY").unwrap_err();
    assert_eq!(err, LayoutError::TooManyGlobals);
}
