//! # Value Conversion Tests
//!
//! Formatting raw bits into each `ValueFormat` and parsing written values
//! back into bits.

use proptest::prelude::*;
use rstest::rstest;

use vpisim_core::design::mask;
use vpisim_core::vpi::{ValueFormat, VpiValue};

#[rstest]
#[case(0xA5, 8, ValueFormat::Int, VpiValue::Int(0xA5))]
#[case(0xA5, 8, ValueFormat::Scalar, VpiValue::Scalar(true))]
#[case(0xA4, 8, ValueFormat::Scalar, VpiValue::Scalar(false))]
#[case(0x5, 6, ValueFormat::BinStr, VpiValue::BinStr("000101".into()))]
#[case(0xA5, 12, ValueFormat::HexStr, VpiValue::HexStr("0a5".into()))]
#[case(0xA5, 8, ValueFormat::DecStr, VpiValue::DecStr("165".into()))]
#[case(0x1FF, 8, ValueFormat::DecStr, VpiValue::DecStr("255".into()))]
fn test_from_bits(
    #[case] bits: u64,
    #[case] width: u32,
    #[case] format: ValueFormat,
    #[case] expected: VpiValue,
) {
    let value = VpiValue::from_bits(bits, width, format);
    assert_eq!(value, expected);
    assert_eq!(value.format(), format);
}

#[test]
fn test_int_view_is_low_32_bits_signed() {
    assert_eq!(
        VpiValue::from_bits(0xFFFF_FFFF, 32, ValueFormat::Int),
        VpiValue::Int(-1)
    );
    assert_eq!(
        VpiValue::from_bits(0x1_0000_0002, 40, ValueFormat::Int),
        VpiValue::Int(2)
    );
}

#[rstest]
#[case(VpiValue::Int(-1), 8, 0xFF)]
#[case(VpiValue::Int(-1), 64, u64::MAX)]
#[case(VpiValue::Int(300), 8, 44)]
#[case(VpiValue::Scalar(true), 1, 1)]
#[case(VpiValue::BinStr("1010_1010".into()), 8, 0xAA)]
#[case(VpiValue::HexStr("dead_BEEF".into()), 32, 0xDEAD_BEEF)]
#[case(VpiValue::DecStr("1000".into()), 8, 1000 & 0xFF)]
fn test_to_bits(#[case] value: VpiValue, #[case] width: u32, #[case] expected: u64) {
    assert_eq!(value.to_bits(width), Ok(expected));
}

#[rstest]
#[case(VpiValue::BinStr(String::new()))]
#[case(VpiValue::BinStr("__".into()))]
#[case(VpiValue::BinStr("102".into()))]
#[case(VpiValue::HexStr("xyz".into()))]
#[case(VpiValue::DecStr("-4".into()))]
#[case(VpiValue::HexStr("1_0000_0000_0000_0000".into()))]
fn test_to_bits_rejects_bad_strings(#[case] value: VpiValue) {
    assert!(value.to_bits(64).is_err());
}

#[rstest]
#[case(VpiValue::BinStr("+101".into()))]
#[case(VpiValue::HexStr("+ff".into()))]
#[case(VpiValue::DecStr("+7".into()))]
#[case(VpiValue::DecStr("-0".into()))]
fn test_to_bits_rejects_sign_characters(#[case] value: VpiValue) {
    let err = value.to_bits(8).unwrap_err();
    assert!(err.contains("invalid digit"), "{err}");
}

#[test]
fn test_display_marks_radix() {
    assert_eq!(VpiValue::Int(-3).to_string(), "-3");
    assert_eq!(VpiValue::Scalar(true).to_string(), "1");
    assert_eq!(VpiValue::BinStr("01".into()).to_string(), "'b01");
    assert_eq!(VpiValue::HexStr("ff".into()).to_string(), "'hff");
    assert_eq!(VpiValue::DecStr("9".into()).to_string(), "'d9");
}

#[test]
fn test_as_int_only_for_int_values() {
    assert_eq!(VpiValue::Int(7).as_int(), Some(7));
    assert_eq!(VpiValue::Scalar(true).as_int(), None);
}

proptest! {
    #[test]
    fn string_views_preserve_masked_bits(bits in any::<u64>(), width in 1u32..=64) {
        for format in [ValueFormat::BinStr, ValueFormat::HexStr, ValueFormat::DecStr] {
            let value = VpiValue::from_bits(bits, width, format);
            prop_assert_eq!(value.to_bits(width), Ok(bits & mask(width)));
        }
    }

    #[test]
    fn binary_string_length_matches_width(bits in any::<u64>(), width in 1u32..=64) {
        match VpiValue::from_bits(bits, width, ValueFormat::BinStr) {
            VpiValue::BinStr(s) => {
                prop_assert_eq!(s.len(), width as usize);
            }
            other => {
                prop_assert!(false, "unexpected value {:?}", other);
            }
        }
    }
}
