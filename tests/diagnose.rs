//! RFC 8949 §8 diagnostic-notation rendering, via the `diagnose`/
//! `diagnose_first`/`diagnose_value` entry points.

use cbor_codec::{decode, diagnose, diagnose_first, diagnose_value, DecodeMode, DiagnoseMode, IndefiniteLength, Value};

fn dmode() -> DiagnoseMode {
    DiagnoseMode::default()
}

#[test]
fn prints_integers_and_negative_integers() {
    assert_eq!(diagnose(&[0x00], &dmode()).unwrap(), "0");
    assert_eq!(diagnose(&[0x18, 0x2a], &dmode()).unwrap(), "42");
    assert_eq!(diagnose(&[0x20], &dmode()).unwrap(), "-1");
    assert_eq!(diagnose(&[0x38, 0x63], &dmode()).unwrap(), "-100");
}

#[test]
fn prints_byte_and_text_strings() {
    assert_eq!(diagnose(&[0x44, 0x01, 0x02, 0x03, 0x04], &dmode()).unwrap(), "h'01020304'");
    assert_eq!(diagnose(&[0x65, b'h', b'e', b'l', b'l', b'o'], &dmode()).unwrap(), "\"hello\"");
}

#[test]
fn escapes_quotes_and_backslashes_in_text() {
    let bytes = [0x62, b'"', b'\\'];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "\"\\\"\\\\\"");
}

#[test]
fn prints_arrays_and_maps() {
    // [1, 2, 3]
    let bytes = [0x83, 0x01, 0x02, 0x03];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "[1, 2, 3]");

    // {1: 2}
    let bytes = [0xa1, 0x01, 0x02];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "{1: 2}");
}

#[test]
fn prints_indefinite_containers_with_underscore_marker() {
    let mode = DiagnoseMode::builder()
        .indefinite_length(IndefiniteLength::Allowed)
        .build();

    // indefinite array [_ 1, 2]
    let bytes = [0x9f, 0x01, 0x02, 0xff];
    assert_eq!(diagnose(&bytes, &mode).unwrap(), "[_ 1, 2]");

    // indefinite map {_ 1: 2}
    let bytes = [0xbf, 0x01, 0x02, 0xff];
    assert_eq!(diagnose(&bytes, &mode).unwrap(), "{_ 1: 2}");

    // indefinite byte string (_ h'0102', h'03')
    let bytes = [0x5f, 0x42, 0x01, 0x02, 0x41, 0x03, 0xff];
    assert_eq!(diagnose(&bytes, &mode).unwrap(), "(_ h'0102', h'03')");
}

#[test]
fn prints_tags_as_function_application() {
    // tag 1 over an unsigned int.
    let bytes = [0xc1, 0x18, 0x2a];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "1(42)");
}

#[test]
fn prints_simple_values_and_floats() {
    assert_eq!(diagnose(&[0xf4], &dmode()).unwrap(), "false");
    assert_eq!(diagnose(&[0xf5], &dmode()).unwrap(), "true");
    assert_eq!(diagnose(&[0xf6], &dmode()).unwrap(), "null");
    assert_eq!(diagnose(&[0xf7], &dmode()).unwrap(), "undefined");

    // single-precision 1.5
    let bytes = [0xfa, 0x3f, 0xc0, 0x00, 0x00];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "1.5");
}

#[test]
fn prints_non_finite_floats_as_bare_words() {
    // double-precision NaN
    let bytes = [0xfb, 0x7f, 0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "NaN");

    // double-precision +Infinity
    let bytes = [0xfb, 0x7f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "Infinity");

    // double-precision -Infinity
    let bytes = [0xfb, 0xff, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "-Infinity");

    // double-precision -0.0
    let bytes = [0xfb, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "-0.0");
}

#[test]
fn diagnose_first_ignores_trailing_bytes_and_reports_length() {
    let bytes = [0x01, 0x02, 0x03];
    let (text, consumed) = diagnose_first(&bytes, &dmode()).unwrap();
    assert_eq!(text, "1");
    assert_eq!(consumed, 1);
}

#[test]
fn diagnose_value_renders_a_decoded_tree_without_reparsing_bytes() {
    let bytes = [0x82, 0x01, 0x65, b'h', b'e', b'l', b'l', b'o'];
    let v: Value = decode(&bytes, &DecodeMode::default()).unwrap();
    assert_eq!(diagnose_value(&v), "[1, \"hello\"]");
}

#[test]
fn self_describe_tag_prints_as_its_own_tag_number() {
    // tag 55799 wrapping 1, default (non-forbidding) diagnose mode.
    let bytes = [0xd9, 0xd9, 0xf7, 0x01];
    assert_eq!(diagnose(&bytes, &dmode()).unwrap(), "55799(1)");
}
