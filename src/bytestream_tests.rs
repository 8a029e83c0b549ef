use super::*;

#[test]
fn byte_round_trip() {
    let mut s = ByteStream::new();
    s.write_byte(0xAB);
    s.rewind();
    assert_eq!(s.read_byte().unwrap(), 0xAB);
}

#[test]
fn word_round_trip() {
    let mut s = ByteStream::new();
    s.write_word(0xBEEF);
    s.rewind();
    assert_eq!(s.read_word().unwrap(), 0xBEEF);
}

#[test]
fn dword_round_trip() {
    let mut s = ByteStream::new();
    s.write_dword(0xDEADBEEF);
    s.rewind();
    assert_eq!(s.read_dword().unwrap(), 0xDEADBEEF);
}

#[test]
fn signed_round_trip() {
    let mut s = ByteStream::new();
    s.write_i16(-1234);
    s.write_i32(-123_456_789);
    s.rewind();
    assert_eq!(s.read_i16().unwrap(), -1234);
    assert_eq!(s.read_i32().unwrap(), -123_456_789);
}

#[test]
fn string_round_trip() {
    let mut s = ByteStream::new();
    s.write_string("hello", false);
    s.rewind();
    assert_eq!(s.read_string(5).unwrap(), "hello");
}

#[test]
fn null_terminated_string_round_trip() {
    let mut s = ByteStream::new();
    s.write_string("hello", true);
    s.write_byte(0x42);
    s.rewind();
    assert_eq!(s.read_null_terminated_string().unwrap(), "hello");
    assert_eq!(s.read_byte().unwrap(), 0x42);
}

#[test]
fn var_int_round_trip() {
    for value in [0u32, 1, 127, 128, 300, 16384, u32::from(u16::MAX), 5_000_000] {
        let mut s = ByteStream::new();
        s.write_var_int(value);
        s.rewind();
        assert_eq!(s.read_var_int().unwrap(), value, "value={value}");
    }
}

#[test]
fn read_past_end_fails_with_end_of_stream() {
    let mut s = ByteStream::new();
    s.write_byte(1);
    s.rewind();
    s.read_byte().unwrap();
    assert_eq!(s.read_byte(), Err(StreamError::EndOfStream));
}

#[test]
fn peek_does_not_advance_position() {
    let mut s = ByteStream::new();
    s.write_word(0x1234);
    s.write_word(0x5678);
    s.rewind();
    let before = s.current_position();
    let _ = s.peek_byte();
    let _ = s.peek_word();
    let _ = s.peek_word_at(2);
    assert_eq!(s.current_position(), before);
    assert_eq!(s.read_word().unwrap(), 0x1234);
}

#[test]
fn patch_overwrites_without_moving_cursor() {
    let mut s = ByteStream::new();
    s.write_word(0x0000);
    s.write_word(0x0000);
    s.rewind();
    s.read_word().unwrap();
    let pos_before = s.current_position();
    s.patch_word(0, 0xCAFE).unwrap();
    assert_eq!(s.current_position(), pos_before);
    assert_eq!(s.peek_word_at(0).unwrap(), 0xCAFE);
}

#[test]
fn patch_out_of_range_fails() {
    let mut s = ByteStream::new();
    s.write_byte(1);
    assert_eq!(s.patch_word(5, 0xFFFF), Err(StreamError::InvalidRange));
}

#[test]
fn get_data_copies_a_window() {
    let mut s = ByteStream::new();
    for b in 0..8u8 {
        s.write_byte(b);
    }
    assert_eq!(s.get_data(2, 3).unwrap(), vec![2, 3, 4]);
    assert_eq!(s.get_data(6, 4), Err(StreamError::InvalidRange));
}

#[test]
fn checksum_is_additive_mod_2_16() {
    let mut s = ByteStream::new();
    for _ in 0..3 {
        s.write_byte(0xFF);
    }
    assert_eq!(s.sum(), (0xFF * 3) as u16);
}

#[test]
fn partial_checksum_respects_range() {
    let mut s = ByteStream::new();
    s.write_byte(10);
    s.write_byte(20);
    s.write_byte(30);
    assert_eq!(s.sum_range(1, 3), 50);
}

#[test]
fn align_to_advances_without_writing() {
    let mut s = ByteStream::new();
    s.write_byte(1);
    s.align_to(4);
    assert_eq!(s.current_position(), 4);
    assert_eq!(s.length(), 1);
}

#[test]
fn pad_to_writes_fill_bytes() {
    let mut s = ByteStream::new();
    s.write_byte(1);
    s.pad_to(4, 0xAA);
    assert_eq!(s.current_position(), 4);
    assert_eq!(s.as_bytes(), &[1, 0xAA, 0xAA, 0xAA]);
}

#[test]
fn is_at_end_tracks_cursor() {
    let mut s = ByteStream::new();
    s.write_byte(1);
    s.rewind();
    assert!(!s.is_at_end());
    s.read_byte().unwrap();
    assert!(s.is_at_end());
}
