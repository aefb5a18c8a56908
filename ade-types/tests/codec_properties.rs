//! Width/range enforcement properties across the full closed type set
//! (spec.md §8).

use ade_types::{AtomValue, CodecError, TypeCode, TypeRegistry};

#[test]
fn every_fixed_width_type_rejects_wrong_length() {
    for code in TypeRegistry::codes() {
        let descriptor = TypeRegistry::get(code).unwrap();
        if let ade_types::Width::Fixed(want) = descriptor.width {
            if want == 0 {
                continue; // NULL: zero-width, nothing shorter to test.
            }
            let too_short = vec![0u8; want - 1];
            let err = AtomValue::from_raw(code, too_short).unwrap_err();
            match err {
                CodecError::ByteCount { got, want: w, .. } => {
                    assert_eq!(w, want);
                    assert_eq!(got, want.saturating_sub(1));
                }
                other => panic!("expected ByteCount for {code}, got {other:?}"),
            }
        }
    }
}

#[test]
fn ip32_decode_rejects_lengths_between_4_and_8() {
    // IP32 is a single address (4 bytes) or an address range (8 bytes); the
    // registry's structural-minimum width rule alone would wrongly accept
    // 5, 6, or 7 bytes, so a dedicated range validator enforces the exact
    // set {4, 8} (spec.md §4.1's payload column for IP32).
    for len in [5, 6, 7, 9] {
        let err = AtomValue::from_raw(TypeCode::IP32, vec![0u8; len]).unwrap_err();
        assert!(matches!(err, CodecError::ByteCount { .. }), "len {len}: {err:?}");
    }
    assert!(AtomValue::from_raw(TypeCode::IP32, vec![0u8; 4]).is_ok());
    assert!(AtomValue::from_raw(TypeCode::IP32, vec![0u8; 8]).is_ok());
}

#[test]
fn ui01_decode_range_error_has_exact_value() {
    // spec.md §8 / §4.1 scenario 5: decoding 0x00000002 as UI01 is a width
    // match (4 bytes) but a range violation (value 2 > 1).
    let err = AtomValue::from_raw(TypeCode::UI01, vec![0, 0, 0, 2]).unwrap_err();
    match err {
        CodecError::Range { value, .. } => assert_eq!(value, "2"),
        other => panic!("expected Range error, got {other:?}"),
    }
}

#[test]
fn setters_leave_bytes_untouched_on_range_error() {
    let mut v = AtomValue::default_for(TypeCode::UI08);
    v.set_from_uint64(10).unwrap();
    let before = v.raw_bytes().to_vec();
    assert!(v.set_from_uint64(999).is_err());
    assert_eq!(v.raw_bytes(), before.as_slice());
}

#[test]
fn binary_total_length_scenario_for_ui32() {
    // spec.md §8 scenario 6 uses a BVER:UI32:6 atom inside a container; this
    // checks only the leaf value's width/round-trip half of that scenario.
    let mut v = AtomValue::default_for(TypeCode::UI32);
    v.set_from_uint64(6).unwrap();
    assert_eq!(v.raw_bytes(), &6u32.to_be_bytes());
    assert_eq!(v.to_text(), "6");
}

#[test]
fn fourcc_roundtrips_through_all_registered_codes() {
    for code in TypeRegistry::codes() {
        let v = AtomValue::default_for(code);
        let text = v.to_text();
        // Every registered type must format without panicking; re-parsing
        // into a fresh value of the same type must succeed for non-NULL
        // types carrying the canonical empty/zero payload.
        let mut v2 = AtomValue::default_for(code);
        if code == TypeCode::CONT {
            continue; // containers have no direct value text form.
        }
        v2.set_from_text(&text).unwrap();
    }
}
