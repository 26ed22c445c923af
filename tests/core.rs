//! End-to-end encode/decode of built-in types against the public `encode`/
//! `decode`/`validate` entry points.

use cbor_codec::{decode, encode, validate, BigInt, DecodeMode, EncodeMode, ErrorCode, Value};

fn mode() -> DecodeMode {
    DecodeMode::default()
}

#[test]
fn roundtrips_primitives() {
    let enc = EncodeMode::default();
    let dec = mode();

    let bytes = encode(&42u64, &enc).unwrap();
    assert_eq!(bytes, vec![0x18, 0x2a]);
    assert_eq!(decode::<u64>(&bytes, &dec).unwrap(), 42);

    let bytes = encode(&true, &enc).unwrap();
    assert_eq!(decode::<bool>(&bytes, &dec).unwrap(), true);

    let bytes = encode(&"hello".to_string(), &enc).unwrap();
    assert_eq!(decode::<String>(&bytes, &dec).unwrap(), "hello");
}

#[test]
fn roundtrips_vec_and_option() {
    let enc = EncodeMode::default();
    let dec = mode();

    let v: Vec<u8> = vec![1, 2, 3];
    let bytes = encode(&v, &enc).unwrap();
    assert_eq!(decode::<Vec<u8>>(&bytes, &dec).unwrap(), v);

    let bytes = encode(&None::<u64>, &enc).unwrap();
    assert_eq!(decode::<Option<u64>>(&bytes, &dec).unwrap(), None);

    let bytes = encode(&Some(7u64), &enc).unwrap();
    assert_eq!(decode::<Option<u64>>(&bytes, &dec).unwrap(), Some(7));
}

// Scenario 1: 1bffffffffffffffff into a generic destination yields u64::MAX.
#[test]
fn max_u64_decodes_to_generic_uint() {
    let bytes = [0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    let v: Value = decode(&bytes, &mode()).unwrap();
    assert_eq!(v.as_u64(), Some(u64::MAX));
}

// Scenario 2: 3bffffffffffffffff into a generic destination yields the
// bignum -18446744073709551616, one past i64/u64 range.
#[test]
fn negative_int_beyond_i64_promotes_to_bigint() {
    let bytes = [0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    let v: Value = decode(&bytes, &mode()).unwrap();
    match v {
        Value::BigInt(b) => {
            assert!(b.is_negative());
            assert_eq!(b.to_i64(), None);
            // wire-style magnitude: the represented value is -1 - magnitude,
            // so -2^64 stores magnitude 2^64 - 1, not the absolute value 2^64.
            assert_eq!(b.magnitude(), &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        }
        other => panic!("expected BigInt, got {other:?}"),
    }
}

// Scenario 5: 7fff (indefinite-length empty text string) decodes to "".
#[test]
fn indefinite_empty_text_decodes_empty() {
    let bytes = [0x7f, 0xff];
    let dec = DecodeMode::builder()
        .indefinite_length(cbor_codec::IndefiniteLength::Allowed)
        .build()
        .unwrap();
    assert_eq!(decode::<String>(&bytes, &dec).unwrap(), "");
}

// Scenario 6: 5fc64401020304ff — an indefinite byte string whose first chunk
// is itself tagged, not a definite-length byte-string chunk.
#[test]
fn indefinite_bytes_rejects_wrongly_typed_chunk() {
    let bytes = [0x5f, 0xc6, 0x44, 0x01, 0x02, 0x03, 0x04, 0xff];
    let dec = DecodeMode::builder()
        .indefinite_length(cbor_codec::IndefiniteLength::Allowed)
        .build()
        .unwrap();
    let err = validate(&bytes, &dec).unwrap_err();
    assert_eq!(err.code, ErrorCode::IndefiniteChunkInvalid);
}

// Scenario 9: empty input is never a well-formed item.
#[test]
fn empty_input_is_unexpected_eof() {
    let err = validate(&[], &mode()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedEof);
}

// Scenario 10: 33 levels of nested single-element arrays exceeds the default
// 32-level depth cap.
#[test]
fn deep_nesting_exceeds_default_depth_cap() {
    let mut bytes = vec![0xf6]; // null
    for _ in 0..33 {
        let mut wrapped = vec![0x81]; // array of 1
        wrapped.extend_from_slice(&bytes);
        bytes = wrapped;
    }
    let err = validate(&bytes, &mode()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
}

#[test]
fn bigint_rejects_non_canonical_magnitude() {
    let err = BigInt::new(false, &[0x00, 0x01]).unwrap_err();
    assert_eq!(err.code, ErrorCode::BignumNotCanonical);
    let err = BigInt::new(false, &[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::BignumNotCanonical);
}

#[test]
fn integer_minimality_picks_smallest_head() {
    let enc = EncodeMode::default();
    assert_eq!(encode(&0u64, &enc).unwrap(), vec![0x00]);
    assert_eq!(encode(&23u64, &enc).unwrap(), vec![0x17]);
    assert_eq!(encode(&24u64, &enc).unwrap(), vec![0x18, 0x18]);
    assert_eq!(encode(&256u64, &enc).unwrap(), vec![0x19, 0x01, 0x00]);
}
