//! Built-in tag bindings (bignum tags 2/3, epoch time tag 1) and the
//! self-describe tag's always-transparent behavior.

use cbor_codec::{decode, diagnose, encode, BigInt, DecodeMode, DiagnoseMode, EncodeMode, EpochTime, TimeTagMode, Value};

#[test]
fn bigint_roundtrips_through_bignum_tags() {
    let b = BigInt::new(false, &[0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap();
    let bytes = encode(&b, &EncodeMode::default()).unwrap();
    // positive bignum: tag 2 over a byte string.
    assert_eq!(bytes[0], 0xc2);
    let back: BigInt = decode(&bytes, &DecodeMode::default()).unwrap();
    assert_eq!(b, back);
}

#[test]
fn negative_bigint_uses_tag_3() {
    let b = BigInt::new(true, &[0x01]).unwrap();
    let bytes = encode(&b, &EncodeMode::default()).unwrap();
    assert_eq!(bytes[0], 0xc3);
}

// Scenario 7: c074323031332d30332d32315432303a30343a30305a, tag 0 (text time)
// over an RFC 3339 string. Decoding into the generic `Value` destination
// preserves it as an untyped Tag rather than interpreting it as a time.
#[test]
fn text_time_tag_is_preserved_as_a_tagged_value() {
    let bytes = [
        0xc0, 0x74, b'2', b'0', b'1', b'3', b'-', b'0', b'3', b'-', b'2', b'1', b'T', b'2', b'0',
        b':', b'0', b'4', b':', b'0', b'0', b'Z',
    ];
    let v: Value = decode(&bytes, &DecodeMode::default()).unwrap();
    match v {
        Value::Tag(0, inner) => assert_eq!(inner.as_text(), Some("2013-03-21T20:04:00Z")),
        other => panic!("expected tag 0, got {other:?}"),
    }
}

#[test]
fn text_time_tag_decodes_into_epoch_time() {
    let bytes = [
        0xc0, 0x74, b'2', b'0', b'1', b'3', b'-', b'0', b'3', b'-', b'2', b'1', b'T', b'2', b'0',
        b':', b'0', b'4', b':', b'0', b'0', b'Z',
    ];
    let mode = DecodeMode::builder().time_tag(TimeTagMode::Required).build().unwrap();
    let t: EpochTime = decode(&bytes, &mode).unwrap();
    assert_eq!(t.as_seconds(), 1_363_896_240.0);
}

#[test]
fn epoch_time_required_rejects_untagged_number() {
    let mode = DecodeMode::builder().time_tag(TimeTagMode::Required).build().unwrap();
    let err = decode::<EpochTime>(&[0x00], &mode).unwrap_err();
    assert_eq!(err.code, cbor_codec::ErrorCode::TagRequired);
}

#[test]
fn epoch_time_round_trips_through_tag_1() {
    let t = EpochTime::from_seconds(1_363_896_240.0);
    let enc_mode = EncodeMode::builder().time_tag(cbor_codec::EncodeTimeTag::Tag1Epoch).build();
    let bytes = encode(&t, &enc_mode).unwrap();
    assert_eq!(bytes[0], 0xc1);
    let back: EpochTime = decode(&bytes, &DecodeMode::default()).unwrap();
    assert_eq!(back.as_seconds(), t.as_seconds());
}

#[test]
fn self_describe_tag_is_transparent_to_tag_policy() {
    // tag 55799 wrapping the integer 1, under a mode that forbids tags.
    let bytes = [0xd9, 0xd9, 0xf7, 0x01];
    let dec = DecodeMode::builder()
        .tags(cbor_codec::TagPolicyMode::Forbidden)
        .build()
        .unwrap();
    let diag_mode = DiagnoseMode::builder().build();
    // Diagnostic notation still prints the tag explicitly; it is only
    // encode/decode's tag-forbidden policy that treats 55799 as transparent.
    let _ = diagnose(&bytes, &diag_mode).unwrap();
    let v: Value = decode(&bytes, &dec).unwrap();
    match v {
        Value::Tag(55799, inner) => assert_eq!(inner.as_u64(), Some(1)),
        other => panic!("expected self-describe tag, got {other:?}"),
    }
}
