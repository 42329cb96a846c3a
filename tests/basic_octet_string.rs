
use test_utils::*;

#[test]
fn test_fixed_short_string_keeps_shift() {
    let mut octets = FixedOctetString::new(2, true);
    decode_and_check_cursor(&mut octets, &[0x51, 0x80, 0x07, 0x08], 4, &[0x07, 0x08], 4);
    assert_eq!(&[0x18, 0x00], octets.value());
}

#[test]
fn test_fixed_long_string_aligns() {
    let mut octets = FixedOctetString::new(4, true);
    decode_and_check_cursor(
        &mut octets,
        &[0xe0, 0xde, 0xad, 0xbe, 0xef, 0x01],
        3,
        &[0x01],
        0,
    );
    assert_eq!(vec![0xde, 0xad, 0xbe, 0xef], octets.into_value());
}

#[test]
fn test_constrained_3_to_8_full() {
    let data = [0xa0, 0xaf, 0x20, 0x60, 0x52, 0xf0, 0x99, 0x03, 0xb3];
    let mut octets = ConstrainedOctetString::new(3, 8, true);
    decode_and_check_cursor(&mut octets, &data, 0, &[], 0);
    assert_eq!(
        &[0xaf, 0x20, 0x60, 0x52, 0xf0, 0x99, 0x03, 0xb3],
        octets.value()
    );
}

#[test]
fn test_constrained_3_to_8_partial() {
    let data = [0x40, 0xaf, 0x20, 0x60, 0x52, 0xf0, 0x99, 0x03, 0xb3];
    let mut octets = ConstrainedOctetString::new(3, 8, true);
    decode_and_check_cursor(&mut octets, &data, 0, &[0x99, 0x03, 0xb3], 0);
    assert_eq!(&[0xaf, 0x20, 0x60, 0x52, 0xf0], octets.value());
}

#[test]
fn test_constrained_unaligned_string_follows_the_length() {
    // size 1..=2 in one bit, then two octets at shift 1
    let data = [0b1101_0101, 0b0111_1111, 0b1000_0000];
    let mut octets = ConstrainedOctetString::new(1, 2, false);
    decode_and_check_cursor(&mut octets, &data, 0, &data[2..], 1);
    assert_eq!(&[0xaa, 0xff], octets.value());
}

#[test]
fn test_constrained_decoder_is_reusable() {
    let mut octets = ConstrainedOctetString::new(3, 8, true);
    octets
        .decode(&[0xa0, 0xaf, 0x20, 0x60, 0x52, 0xf0, 0x99, 0x03, 0xb3], 0)
        .unwrap();
    octets.decode(&[0x00, 0x01, 0x02, 0x03], 0).unwrap();
    assert_eq!(&[0x01, 0x02, 0x03], octets.value());
}

#[test]
fn test_constrained_errors() {
    assert_eq!(
        ErrorKind::InputParameters,
        decode_err(&mut ConstrainedOctetString::new(9, 8, true), &[], 0)
    );
    assert!(matches!(
        decode_err(&mut ConstrainedOctetString::new(3, 8, true), &[], 0),
        ErrorKind::BufferTooShort { .. }
    ));
    assert_eq!(
        ErrorKind::ShiftIncorrect(12),
        decode_err(&mut FixedOctetString::new(3, true), &[0x00; 4], 12)
    );
}
