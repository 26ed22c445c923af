//! `#[derive(CborEncode, CborDecode)]` end-to-end coverage: map layout,
//! array layout (`toarray`), renames, `keyasint`, `omitempty`, `embed`, and
//! `deny_unknown`.

use cbor_codec::{decode, encode, CborDecode, CborEncode, CborStruct, DecodeMode, EncodeMode, ErrorCode, KeyOrder};

#[derive(Debug, PartialEq, CborEncode, CborDecode)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(Debug, PartialEq, CborEncode, CborDecode)]
#[cbor(toarray)]
struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, PartialEq, CborEncode, CborDecode)]
struct Profile {
    #[cbor(rename = "n")]
    name: String,
    #[cbor(keyasint = 1)]
    age: u64,
    #[cbor(omitempty)]
    nickname: String,
}

#[derive(Debug, PartialEq, CborEncode, CborDecode)]
#[cbor(deny_unknown)]
struct Strict {
    a: u64,
}

#[derive(Debug, PartialEq, Default, CborEncode, CborDecode)]
struct Extra {
    city: String,
    zip: String,
}

#[derive(Debug, PartialEq, CborEncode, CborDecode)]
struct Person {
    name: String,
    #[cbor(embed)]
    extra: Extra,
}

fn dmode() -> DecodeMode {
    DecodeMode::default()
}

#[test]
fn map_layout_roundtrips() {
    let p = Point { x: -3, y: 5 };
    let bytes = encode(&p, &EncodeMode::default()).unwrap();
    let back: Point = decode(&bytes, &dmode()).unwrap();
    assert_eq!(p, back);
}

#[test]
fn map_layout_sorts_fields_by_length_first() {
    let p = Point { x: 1, y: 2 };
    let bytes = encode(&p, &EncodeMode::default()).unwrap();
    // canonical map of 2 entries, keys "x" (0x61 78) and "y" (0x61 79), same
    // length so length-first falls back to byte order: x before y.
    assert_eq!(
        bytes,
        vec![0xa2, 0x61, b'x', 0x01, 0x61, b'y', 0x02]
    );
}

#[test]
fn array_layout_roundtrips_positionally() {
    let v = Vector3 { x: 1.0, y: 2.0, z: 3.0 };
    let bytes = encode(&v, &EncodeMode::default()).unwrap();
    assert_eq!(bytes[0], 0x83);
    let back: Vector3 = decode(&bytes, &dmode()).unwrap();
    assert_eq!(v, back);
}

#[test]
fn rename_keyasint_and_omitempty() {
    let p = Profile {
        name: "ada".into(),
        age: 36,
        nickname: String::new(),
    };
    let bytes = encode(&p, &EncodeMode::default()).unwrap();
    let back: Profile = decode(&bytes, &dmode()).unwrap();
    assert_eq!(p, back);

    // omitempty drops the entry for a default value, keyasint uses an
    // integer key, rename swaps the text key. Only 2 entries should remain.
    assert_eq!(bytes[0], 0xa2);

    let full = Profile {
        name: "ada".into(),
        age: 36,
        nickname: "ace".into(),
    };
    let bytes = encode(&full, &EncodeMode::default()).unwrap();
    assert_eq!(bytes[0], 0xa3);
    let back: Profile = decode(&bytes, &dmode()).unwrap();
    assert_eq!(full, back);
}

#[test]
fn deny_unknown_rejects_unrecognized_key() {
    // {"a": 1, "b": 2} — "b" is not a field of Strict.
    let bytes = [0xa2, 0x61, b'a', 0x01, 0x61, b'b', 0x02];
    let err = decode::<Strict>(&bytes, &dmode()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownFieldRejected);
}

#[test]
fn embed_splices_fields_into_parent_map() {
    let person = Person {
        name: "grace".into(),
        extra: Extra {
            city: "nyc".into(),
            zip: "10001".into(),
        },
    };
    let bytes = encode(&person, &EncodeMode::default()).unwrap();
    // 3 top-level entries: name, city, zip — embed doesn't nest.
    assert_eq!(bytes[0], 0xa3);
    let back: Person = decode(&bytes, &dmode()).unwrap();
    assert_eq!(person, back);
}

#[test]
fn descriptor_reports_field_metadata() {
    assert_eq!(Point::DESCRIPTOR.type_name, "Point");
    assert_eq!(Point::DESCRIPTOR.fields.len(), 2);
    assert_eq!(Strict::DESCRIPTOR.deny_unknown_fields, true);
}

#[test]
fn encode_honors_runtime_key_order_choice() {
    #[derive(Debug, PartialEq, CborEncode, CborDecode)]
    struct Keys {
        bb: u8,
        a: u8,
        ccc: u8,
    }
    let v = Keys { bb: 2, a: 1, ccc: 3 };

    let length_first = EncodeMode::builder().key_order(KeyOrder::LengthFirst).build();
    let bytes = encode(&v, &length_first).unwrap();
    // "a" (len 1) < "bb" (len 2) < "ccc" (len 3).
    assert_eq!(bytes[1], b'a');

    let bytewise = EncodeMode::builder().key_order(KeyOrder::Bytewise).build();
    let bytes = encode(&v, &bytewise).unwrap();
    // pure lexicographic: "a" < "bb" < "ccc" too, but via a different
    // comparator — exercise it decodes back the same either way.
    let back: Keys = decode(&bytes, &DecodeMode::default()).unwrap();
    assert_eq!(v, back);
}
