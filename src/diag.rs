//! Diagnostic notation: component G (`SPEC_FULL.md` 4.G).
//!
//! Renders a well-formed CBOR item as RFC 8949 §8 diagnostic notation,
//! following the RFC text directly: integers and floats print as Rust would,
//! byte strings as `h'...'`, indefinite-length containers as `(_ ...)`, tags
//! as `N(...)`, and
//! non-finite floats as the bare words `Infinity`/`-Infinity`/`NaN` (RFC 8949
//! §8, since diagnostic notation is not valid CBOR-in-JSON and has no quoting
//! rule for those).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::error::{CborError, ErrorCode};
use crate::mode::{ByteStringEncoding, DiagnoseMode, IndefiniteLength, TagPolicyMode};
use crate::value::{BigInt, Value};
use crate::wire::{self, Head, AI_INDEFINITE};

/// Render `bytes` (exactly one well-formed CBOR item) as diagnostic notation.
///
/// # Errors
///
/// Returns an error if `bytes` is not a single well-formed item under the
/// mode's decode-side options, or if an unsupported construct is found.
pub fn diagnose(bytes: &[u8], mode: &DiagnoseMode) -> Result<String, CborError> {
    let decode_mode = decode_mode_for(mode);
    if !mode.cbor_sequence {
        crate::scanner::validate_item(bytes, &decode_mode)?;
        let mut printer = Printer {
            data: bytes,
            pos: 0,
            mode,
        };
        let mut out = String::new();
        printer.print_value(&mut out)?;
        return Ok(out);
    }

    let mut out = String::new();
    let mut offset = 0;
    let mut first = true;
    while offset < bytes.len() {
        let end = crate::scanner::skip_one(bytes, offset, 0, &decode_mode)?;
        if !first {
            out.push_str(", ");
        }
        first = false;
        let mut printer = Printer {
            data: &bytes[..end],
            pos: offset,
            mode,
        };
        printer.print_value(&mut out)?;
        offset = end;
    }
    Ok(out)
}

/// Render only the first well-formed CBOR item in `bytes`, ignoring any
/// trailing bytes, and report how many bytes it consumed.
///
/// # Errors
///
/// Returns an error if no well-formed item starts at offset 0.
pub fn diagnose_first(bytes: &[u8], mode: &DiagnoseMode) -> Result<(String, usize), CborError> {
    let decode_mode = decode_mode_for(mode);
    let end = crate::scanner::skip_one(bytes, 0, 0, &decode_mode)?;
    let mut printer = Printer {
        data: &bytes[..end],
        pos: 0,
        mode,
    };
    let mut out = String::new();
    printer.print_value(&mut out)?;
    Ok((out, end))
}

fn decode_mode_for(mode: &DiagnoseMode) -> crate::mode::DecodeMode {
    crate::mode::DecodeMode::builder()
        .indefinite_length(mode.decode.indefinite_length)
        .tags(mode.decode.tags)
        .build()
        .expect("DiagnoseMode only carries options DecodeMode already validates")
}

struct Printer<'a> {
    data: &'a [u8],
    pos: usize,
    mode: &'a DiagnoseMode,
}

impl<'a> Printer<'a> {
    fn read_head(&mut self) -> Result<Head, CborError> {
        wire::read_head(self.data, &mut self.pos)
    }

    fn print_value(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.peek_head()?;
        match head.major {
            0 | 1 => self.print_int(out),
            2 => self.print_bytes(out),
            3 => self.print_text(out),
            4 => self.print_array(out),
            5 => self.print_map(out),
            6 => self.print_tag(out),
            7 => self.print_simple_or_float(out),
            _ => unreachable!("major type is a 3-bit field"),
        }
    }

    fn peek_head(&self) -> Result<Head, CborError> {
        let mut p = self.pos;
        wire::read_head(self.data, &mut p)
    }

    fn print_int(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        let v = wire::read_uint(self.data, &mut self.pos, head.ai, head.offset)?;
        if head.major == 0 {
            let _ = write!(out, "{v}");
        } else {
            let _ = write!(out, "{}", -1_i128 - i128::from(v));
        }
        Ok(())
    }

    fn print_bytes(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        if head.ai == AI_INDEFINITE {
            out.push_str("(_ ");
            let mut first = true;
            loop {
                if self.data.get(self.pos) == Some(&0xFF) {
                    self.pos += 1;
                    break;
                }
                if !first {
                    out.push_str(", ");
                }
                first = false;
                self.print_definite_bytes(out)?;
            }
            out.push(')');
            return Ok(());
        }
        self.pos = head.offset;
        self.print_definite_bytes(out)
    }

    fn print_definite_bytes(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        let len = wire::read_uint(self.data, &mut self.pos, head.ai, head.offset)?;
        let len = wire::len_to_usize(len, head.offset)?;
        let bytes = wire::read_exact(self.data, &mut self.pos, len)?;
        render_bytes(bytes, self.mode, out);
        Ok(())
    }

    fn print_text(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        if head.ai == AI_INDEFINITE {
            out.push_str("(_ ");
            let mut first = true;
            loop {
                if self.data.get(self.pos) == Some(&0xFF) {
                    self.pos += 1;
                    break;
                }
                if !first {
                    out.push_str(", ");
                }
                first = false;
                self.print_definite_text(out)?;
            }
            out.push(')');
            return Ok(());
        }
        self.pos = head.offset;
        self.print_definite_text(out)
    }

    fn print_definite_text(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        let len = wire::read_uint(self.data, &mut self.pos, head.ai, head.offset)?;
        let len = wire::len_to_usize(len, head.offset)?;
        let bytes = wire::read_exact(self.data, &mut self.pos, len)?;
        let s = crate::utf8::validate(bytes).map_err(|()| CborError::new(ErrorCode::Utf8Invalid, head.offset))?;
        out.push('"');
        for ch in s.chars() {
            match ch {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
        out.push('"');
        Ok(())
    }

    fn print_array(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        if head.ai == AI_INDEFINITE {
            out.push_str("[_ ");
            let mut first = true;
            loop {
                if self.data.get(self.pos) == Some(&0xFF) {
                    self.pos += 1;
                    break;
                }
                if !first {
                    out.push_str(", ");
                }
                first = false;
                self.print_value(out)?;
            }
            out.push(']');
            return Ok(());
        }
        let len = wire::read_uint(self.data, &mut self.pos, head.ai, head.offset)?;
        let len = wire::len_to_usize(len, head.offset)?;
        out.push('[');
        for i in 0..len {
            if i > 0 {
                out.push_str(", ");
            }
            self.print_value(out)?;
        }
        out.push(']');
        Ok(())
    }

    fn print_map(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        if head.ai == AI_INDEFINITE {
            out.push_str("{_ ");
            let mut first = true;
            loop {
                if self.data.get(self.pos) == Some(&0xFF) {
                    self.pos += 1;
                    break;
                }
                if !first {
                    out.push_str(", ");
                }
                first = false;
                self.print_value(out)?;
                out.push_str(": ");
                self.print_value(out)?;
            }
            out.push('}');
            return Ok(());
        }
        let len = wire::read_uint(self.data, &mut self.pos, head.ai, head.offset)?;
        let len = wire::len_to_usize(len, head.offset)?;
        out.push('{');
        for i in 0..len {
            if i > 0 {
                out.push_str(", ");
            }
            self.print_value(out)?;
            out.push_str(": ");
            self.print_value(out)?;
        }
        out.push('}');
        Ok(())
    }

    fn print_tag(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        let tag = wire::read_uint(self.data, &mut self.pos, head.ai, head.offset)?;
        if self.mode.decode.tags == TagPolicyMode::Forbidden && tag != crate::tag::TAG_SELF_DESCRIBE {
            return Err(CborError::new(ErrorCode::TagForbidden, head.offset));
        }
        let _ = write!(out, "{tag}(");
        self.print_value(out)?;
        out.push(')');
        Ok(())
    }

    fn print_simple_or_float(&mut self, out: &mut String) -> Result<(), CborError> {
        let head = self.read_head()?;
        match head.ai {
            20 => out.push_str("false"),
            21 => out.push_str("true"),
            22 => out.push_str("null"),
            23 => out.push_str("undefined"),
            24 => {
                let code = wire::read_u8(self.data, &mut self.pos)?;
                let _ = write!(out, "simple({code})");
            }
            25 => {
                let bits = wire::read_be_u16(self.data, &mut self.pos)?;
                let v = crate::float::f64_from_f16_bits(bits);
                print_float(out, v);
                self.push_precision_suffix(out, 1);
            }
            26 => {
                let bits = wire::read_be_u32(self.data, &mut self.pos)?;
                print_float(out, f64::from(f32::from_bits(bits)));
                self.push_precision_suffix(out, 2);
            }
            27 => {
                let bits = wire::read_be_u64(self.data, &mut self.pos)?;
                print_float(out, f64::from_bits(bits));
                self.push_precision_suffix(out, 3);
            }
            0..=19 => {
                let _ = write!(out, "simple({})", head.ai);
            }
            _ => return Err(CborError::new(ErrorCode::ReservedAdditionalInfo, head.offset)),
        }
        Ok(())
    }

    /// Append a `_1`/`_2`/`_3` precision suffix (half/single/double) when
    /// `float_precision_indicator` is on, per RFC 8949 §8's diagnostic-notation
    /// convention for distinguishing the wire width of a printed float.
    fn push_precision_suffix(&self, out: &mut String, width: u8) {
        if self.mode.float_precision_indicator {
            let _ = write!(out, "_{width}");
        }
    }
}

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const BASE32HEX_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";
const BASE64_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// RFC 4648 base32 (or base32hex with `alphabet` swapped), with `=` padding.
fn encode_base32(bytes: &[u8], alphabet: &[u8; 32], out: &mut String) {
    for chunk in bytes.chunks(5) {
        let mut buf = [0u8; 5];
        buf[..chunk.len()].copy_from_slice(chunk);
        let n = u64::from(buf[0]) << 32
            | u64::from(buf[1]) << 24
            | u64::from(buf[2]) << 16
            | u64::from(buf[3]) << 8
            | u64::from(buf[4]);
        let chars_for_len = match chunk.len() {
            1 => 2,
            2 => 4,
            3 => 5,
            4 => 7,
            _ => 8,
        };
        for i in 0..8 {
            if i < chars_for_len {
                let shift = 35 - i * 5;
                let idx = (n >> shift) & 0x1f;
                out.push(alphabet[idx as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
}

/// RFC 4648 base64, with `=` padding.
fn encode_base64(bytes: &[u8], out: &mut String) {
    for chunk in bytes.chunks(3) {
        let mut buf = [0u8; 3];
        buf[..chunk.len()].copy_from_slice(chunk);
        let n = u32::from(buf[0]) << 16 | u32::from(buf[1]) << 8 | u32::from(buf[2]);
        let chars_for_len = match chunk.len() {
            1 => 2,
            2 => 3,
            _ => 4,
        };
        for i in 0..4 {
            if i < chars_for_len {
                let shift = 18 - i * 6;
                let idx = (n >> shift) & 0x3f;
                out.push(BASE64_ALPHABET[idx as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
}

fn render_bytes(bytes: &[u8], mode: &DiagnoseMode, out: &mut String) {
    match mode.byte_string_encoding {
        ByteStringEncoding::Base16 => {
            out.push_str("h'");
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out.push('\'');
        }
        ByteStringEncoding::Base16Ws => {
            out.push_str("h'");
            for (i, b) in bytes.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{b:02x}");
            }
            out.push('\'');
        }
        ByteStringEncoding::Base32 => {
            out.push_str("b32'");
            encode_base32(bytes, BASE32_ALPHABET, out);
            out.push('\'');
        }
        ByteStringEncoding::Base32Hex => {
            out.push_str("h32'");
            encode_base32(bytes, BASE32HEX_ALPHABET, out);
            out.push('\'');
        }
        ByteStringEncoding::Base64 => {
            out.push_str("b64'");
            encode_base64(bytes, out);
            out.push('\'');
        }
        ByteStringEncoding::EmbeddedCbor => {
            let decode_mode = decode_mode_for(mode);
            if crate::scanner::validate_item(bytes, &decode_mode).is_ok() {
                out.push_str("<< ");
                let mut printer = Printer {
                    data: bytes,
                    pos: 0,
                    mode,
                };
                // validated above; a print failure here would mean the printer and
                // validator disagree on well-formedness.
                let _ = printer.print_value(out);
                out.push_str(" >>");
            } else {
                render_bytes(
                    bytes,
                    &DiagnoseMode {
                        byte_string_encoding: ByteStringEncoding::Base16,
                        ..mode.clone()
                    },
                    out,
                );
            }
        }
        ByteStringEncoding::AsciiIfPrintable => {
            if bytes.iter().all(|&b| (0x20..0x7f).contains(&b)) {
                out.push('\'');
                for &b in bytes {
                    match b {
                        b'\'' => out.push_str("\\'"),
                        b'\\' => out.push_str("\\\\"),
                        _ => out.push(b as char),
                    }
                }
                out.push('\'');
            } else {
                render_bytes(
                    bytes,
                    &DiagnoseMode {
                        byte_string_encoding: ByteStringEncoding::Base16,
                        ..mode.clone()
                    },
                    out,
                );
            }
        }
    }
}

fn print_float(out: &mut String, v: f64) {
    if v.is_nan() {
        out.push_str("NaN");
    } else if v.is_infinite() {
        out.push_str(if v.is_sign_positive() { "Infinity" } else { "-Infinity" });
    } else if v == 0.0 && v.is_sign_negative() {
        out.push_str("-0.0");
    } else {
        let _ = write!(out, "{v}");
    }
}

/// Render an already-decoded [`Value`] tree as diagnostic notation, for
/// callers that have a `Value` in hand rather than raw bytes.
#[must_use]
pub fn diagnose_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Undefined => out.push_str("undefined"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Uint(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::BigInt(b) => write_bigint(b, out),
        Value::Float(f) => print_float(out, *f),
        Value::Bytes(bytes) => {
            out.push_str("h'");
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out.push('\'');
        }
        Value::Text(s) => {
            out.push('"');
            for ch in s.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    _ => out.push(ch),
                }
            }
            out.push('"');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Map(entries) => {
            out.push('{');
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(k, out);
                out.push_str(": ");
                write_value(v, out);
            }
            out.push('}');
        }
        Value::Tag(t, inner) => {
            let _ = write!(out, "{t}(");
            write_value(inner, out);
            out.push(')');
        }
        Value::Simple(code) => {
            let _ = write!(out, "simple({code})");
        }
    }
}

fn write_bigint(b: &BigInt, out: &mut String) {
    if b.is_negative() {
        out.push('-');
    }
    if b.magnitude().is_empty() {
        out.push('0');
        return;
    }
    let mut digits: Vec<u8> = alloc::vec![0];
    for &byte in b.magnitude() {
        let mut carry = u32::from(byte);
        for d in &mut digits {
            let v = u32::from(*d) * 256 + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    for d in digits.iter().rev() {
        let _ = write!(out, "{d}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::DiagnoseMode;

    #[test]
    fn diagnoses_uint_and_array() {
        let mode = DiagnoseMode::builder().build();
        assert_eq!(diagnose(&[0x00], &mode).unwrap(), "0");
        assert_eq!(diagnose(&[0x83, 0x01, 0x02, 0x03], &mode).unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn diagnoses_text_and_bytes() {
        let mode = DiagnoseMode::builder().build();
        assert_eq!(diagnose(&[0x63, b'a', b'b', b'c'], &mode).unwrap(), "\"abc\"");
        assert_eq!(diagnose(&[0x42, 0xde, 0xad], &mode).unwrap(), "h'dead'");
    }

    #[test]
    fn diagnoses_tag() {
        let mode = DiagnoseMode::builder().build();
        // tag 1 over uint 0
        assert_eq!(diagnose(&[0xc1, 0x00], &mode).unwrap(), "1(0)");
    }

    #[test]
    fn diagnoses_negative_float_zero() {
        let mode = DiagnoseMode::builder().build();
        // -0.0 as float64
        let bytes = [0xfb, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(diagnose(&bytes, &mode).unwrap(), "-0.0");
    }

    #[test]
    fn renders_precision_indicator() {
        let mode = DiagnoseMode::builder().float_precision_indicator(true).build();
        // 0.0 as float64
        let bytes = [0xfb, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(diagnose(&bytes, &mode).unwrap(), "0_3");
    }

    #[test]
    fn renders_byte_string_as_base64() {
        let mode = DiagnoseMode::builder()
            .byte_string_encoding(ByteStringEncoding::Base64)
            .build();
        assert_eq!(diagnose(&[0x42, 0xde, 0xad], &mode).unwrap(), "b64'3q0='");
    }

    #[test]
    fn renders_byte_string_as_ascii_when_printable() {
        let mode = DiagnoseMode::builder()
            .byte_string_encoding(ByteStringEncoding::AsciiIfPrintable)
            .build();
        assert_eq!(diagnose(&[0x43, b'h', b'i', b'!'], &mode).unwrap(), "'hi!'");
    }

    #[test]
    fn renders_cbor_sequence() {
        let mode = DiagnoseMode::builder().cbor_sequence(true).build();
        assert_eq!(diagnose(&[0x01, 0x02, 0x03], &mode).unwrap(), "1, 2, 3");
    }
}
