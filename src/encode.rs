//! Encoder: component E (`SPEC_FULL.md` 4.E).
//!
//! A streaming `Encoder`/`ArrayEncoder`/`MapEncoder` closures-over-builder
//! API: writing a container reserves its
//! length head up front, tracks a `remaining` countdown as the closure emits
//! elements, and rolls the output buffer back to its pre-call length on any
//! error — including a canonical-order violation detected mid-map — so a
//! partially-written container never leaks into the output.

use alloc::vec::Vec;

use crate::error::{CborError, ErrorCode};
use crate::float::{self, FloatWidth};
use crate::mode::{EncodeMode, EncodeTimeTag, IndefiniteLength};
use crate::order::KeyOrder;
use crate::time::EpochTime;
use crate::value::{BigInt, Value};

/// Streaming encoder writing canonical (or mode-configured) CBOR into an
/// internal buffer.
pub struct Encoder<'m> {
    buf: Vec<u8>,
    depth: usize,
    root_written: bool,
    mode: &'m EncodeMode,
}

impl<'m> Encoder<'m> {
    fn new(mode: &'m EncodeMode) -> Self {
        Self {
            buf: Vec::new(),
            depth: 0,
            root_written: false,
            mode,
        }
    }

    fn begin_value(&mut self) -> Result<(), CborError> {
        if self.depth == 0 && self.root_written {
            return Err(CborError::new(ErrorCode::TrailingBytes, self.buf.len()));
        }
        Ok(())
    }

    fn finish_root_if_top(&mut self) {
        if self.depth == 0 {
            self.root_written = true;
        }
    }

    fn reserve(&mut self, n: usize) -> Result<(), CborError> {
        self.buf
            .try_reserve(n)
            .map_err(|_| crate::alloc_util::alloc_failed(self.buf.len()))
    }

    fn push_head(&mut self, major: u8, arg: u64) -> Result<(), CborError> {
        self.reserve(9)?;
        if arg < 24 {
            self.buf.push((major << 5) | arg as u8);
        } else if arg <= 0xff {
            self.buf.push((major << 5) | 24);
            self.buf.push(arg as u8);
        } else if arg <= 0xffff {
            self.buf.push((major << 5) | 25);
            self.buf.extend_from_slice(&(arg as u16).to_be_bytes());
        } else if arg <= 0xffff_ffff {
            self.buf.push((major << 5) | 26);
            self.buf.extend_from_slice(&(arg as u32).to_be_bytes());
        } else {
            self.buf.push((major << 5) | 27);
            self.buf.extend_from_slice(&arg.to_be_bytes());
        }
        Ok(())
    }

    pub fn null(&mut self) -> Result<(), CborError> {
        self.begin_value()?;
        self.reserve(1)?;
        self.buf.push(0xf6);
        self.finish_root_if_top();
        Ok(())
    }

    pub fn undefined(&mut self) -> Result<(), CborError> {
        self.begin_value()?;
        self.reserve(1)?;
        self.buf.push(0xf7);
        self.finish_root_if_top();
        Ok(())
    }

    pub fn bool(&mut self, v: bool) -> Result<(), CborError> {
        self.begin_value()?;
        self.reserve(1)?;
        self.buf.push(if v { 0xf5 } else { 0xf4 });
        self.finish_root_if_top();
        Ok(())
    }

    pub fn u64_value(&mut self, v: u64) -> Result<(), CborError> {
        self.begin_value()?;
        self.push_head(0, v)?;
        self.finish_root_if_top();
        Ok(())
    }

    pub fn i64_value(&mut self, v: i64) -> Result<(), CborError> {
        self.begin_value()?;
        if v >= 0 {
            self.push_head(0, v as u64)?;
        } else {
            let n = (-1_i128 - i128::from(v)) as u64;
            self.push_head(1, n)?;
        }
        self.finish_root_if_top();
        Ok(())
    }

    pub fn bigint(&mut self, b: &BigInt) -> Result<(), CborError> {
        self.begin_value()?;
        let binding = self.mode.registry.binding_for::<BigInt>();
        let tag = if b.is_negative() {
            binding.and_then(|bd| bd.tags.get(1).copied()).unwrap_or(crate::tag::TAG_BIGNUM_NEG)
        } else {
            binding.and_then(|bd| bd.tags.first().copied()).unwrap_or(crate::tag::TAG_BIGNUM_POS)
        };
        self.push_head(6, tag)?;
        self.push_head(2, b.magnitude().len() as u64)?;
        self.reserve(b.magnitude().len())?;
        self.buf.extend_from_slice(b.magnitude());
        self.finish_root_if_top();
        Ok(())
    }

    /// Encode a time value per `EncodeMode::time_tag`: a bare numeric
    /// epoch-seconds value, tag 1 over the same, or tag 0 over an RFC 3339
    /// string — tag numbers taken from the registered `EpochTime` binding.
    pub fn epoch_time(&mut self, t: &EpochTime) -> Result<(), CborError> {
        let binding = self.mode.registry.binding_for::<EpochTime>();
        match self.mode.time_tag {
            EncodeTimeTag::None => self.f64_value(t.as_seconds()),
            EncodeTimeTag::Tag1Epoch => {
                let tag = binding
                    .and_then(|bd| bd.tags.get(1).copied())
                    .unwrap_or(crate::tag::TAG_EPOCH_TIME);
                let secs = t.as_seconds();
                self.tag(tag, |e| e.f64_value(secs))
            }
            EncodeTimeTag::Tag0Rfc3339 => {
                let tag = binding
                    .and_then(|bd| bd.tags.first().copied())
                    .unwrap_or(crate::tag::TAG_TEXT_TIME);
                let text = crate::time::format_rfc3339(t.as_seconds());
                self.tag(tag, move |e| e.text(&text))
            }
        }
    }

    pub fn f64_value(&mut self, v: f64) -> Result<(), CborError> {
        self.begin_value()?;
        let width = if self.mode.shrink_floats {
            float::narrowest_width(v)
        } else {
            FloatWidth::Double
        };
        self.reserve(9)?;
        match width {
            FloatWidth::Half => {
                self.buf.push((7 << 5) | 25);
                self.buf
                    .extend_from_slice(&float::f16_bits_from_f64(v).to_be_bytes());
            }
            FloatWidth::Single => {
                self.buf.push((7 << 5) | 26);
                self.buf.extend_from_slice(&(v as f32).to_be_bytes());
            }
            FloatWidth::Double => {
                self.buf.push((7 << 5) | 27);
                self.buf.extend_from_slice(&v.to_bits().to_be_bytes());
            }
        }
        self.finish_root_if_top();
        Ok(())
    }

    pub fn text(&mut self, s: &str) -> Result<(), CborError> {
        self.begin_value()?;
        self.push_head(3, s.len() as u64)?;
        self.reserve(s.len())?;
        self.buf.extend_from_slice(s.as_bytes());
        self.finish_root_if_top();
        Ok(())
    }

    pub fn bytes(&mut self, b: &[u8]) -> Result<(), CborError> {
        self.begin_value()?;
        self.push_head(2, b.len() as u64)?;
        self.reserve(b.len())?;
        self.buf.extend_from_slice(b);
        self.finish_root_if_top();
        Ok(())
    }

    /// Splice already-well-formed CBOR bytes verbatim (used for
    /// [`crate::value::RawCbor`]).
    pub fn raw(&mut self, bytes: &[u8]) -> Result<(), CborError> {
        self.begin_value()?;
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        self.finish_root_if_top();
        Ok(())
    }

    pub fn simple(&mut self, code: u8) -> Result<(), CborError> {
        self.begin_value()?;
        self.reserve(2)?;
        if code < 24 {
            self.buf.push((7 << 5) | code);
        } else {
            self.buf.push((7 << 5) | 24);
            self.buf.push(code);
        }
        self.finish_root_if_top();
        Ok(())
    }

    /// Encode a tag number followed by the tagged value written by `f`.
    pub fn tag<F: FnOnce(&mut Self) -> Result<(), CborError>>(
        &mut self,
        tag: u64,
        f: F,
    ) -> Result<(), CborError> {
        self.begin_value()?;
        self.push_head(6, tag)?;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result?;
        self.finish_root_if_top();
        Ok(())
    }

    fn check_indefinite_allowed(&self) -> Result<(), CborError> {
        if self.mode.indefinite_length != IndefiniteLength::Allowed {
            return Err(CborError::new(ErrorCode::IndefiniteLengthForbidden, self.buf.len()));
        }
        Ok(())
    }

    /// Emit an indefinite-length array (major type 4, additional info 31),
    /// terminated by a break byte. Rolled back on any inner error, the same
    /// way [`Encoder::array`] rolls back a length mismatch.
    pub fn indefinite_array<F>(&mut self, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut IndefiniteArrayEncoder<'_, 'm>) -> Result<(), CborError>,
    {
        self.begin_value()?;
        self.check_indefinite_allowed()?;
        let start = self.buf.len();
        self.reserve(1)?;
        self.buf.push((4 << 5) | 31);
        self.depth += 1;
        let mut a = IndefiniteArrayEncoder { enc: self };
        let result = f(&mut a);
        self.depth -= 1;
        if let Err(e) = result {
            self.buf.truncate(start);
            return Err(e);
        }
        self.reserve(1)?;
        self.buf.push(0xFF);
        self.finish_root_if_top();
        Ok(())
    }

    /// Emit an indefinite-length map (major type 5, additional info 31),
    /// terminated by a break byte.
    pub fn indefinite_map<F>(&mut self, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut IndefiniteMapEncoder<'_, 'm>) -> Result<(), CborError>,
    {
        self.begin_value()?;
        self.check_indefinite_allowed()?;
        let start = self.buf.len();
        self.reserve(1)?;
        self.buf.push((5 << 5) | 31);
        self.depth += 1;
        let mut m = IndefiniteMapEncoder { enc: self };
        let result = f(&mut m);
        self.depth -= 1;
        if let Err(e) = result {
            self.buf.truncate(start);
            return Err(e);
        }
        self.reserve(1)?;
        self.buf.push(0xFF);
        self.finish_root_if_top();
        Ok(())
    }

    /// Emit an indefinite-length byte string (major type 2, additional info
    /// 31) as a sequence of definite-length chunks, terminated by a break
    /// byte.
    pub fn indefinite_bytes<F>(&mut self, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut IndefiniteBytesEncoder<'_, 'm>) -> Result<(), CborError>,
    {
        self.begin_value()?;
        self.check_indefinite_allowed()?;
        let start = self.buf.len();
        self.reserve(1)?;
        self.buf.push((2 << 5) | 31);
        self.depth += 1;
        let mut b = IndefiniteBytesEncoder { enc: self };
        let result = f(&mut b);
        self.depth -= 1;
        if let Err(e) = result {
            self.buf.truncate(start);
            return Err(e);
        }
        self.reserve(1)?;
        self.buf.push(0xFF);
        self.finish_root_if_top();
        Ok(())
    }

    /// Emit an indefinite-length text string (major type 3, additional info
    /// 31) as a sequence of definite-length chunks, terminated by a break
    /// byte.
    pub fn indefinite_text<F>(&mut self, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut IndefiniteTextEncoder<'_, 'm>) -> Result<(), CborError>,
    {
        self.begin_value()?;
        self.check_indefinite_allowed()?;
        let start = self.buf.len();
        self.reserve(1)?;
        self.buf.push((3 << 5) | 31);
        self.depth += 1;
        let mut t = IndefiniteTextEncoder { enc: self };
        let result = f(&mut t);
        self.depth -= 1;
        if let Err(e) = result {
            self.buf.truncate(start);
            return Err(e);
        }
        self.reserve(1)?;
        self.buf.push(0xFF);
        self.finish_root_if_top();
        Ok(())
    }

    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut ArrayEncoder<'_, 'm>) -> Result<(), CborError>,
    {
        self.begin_value()?;
        let start = self.buf.len();
        self.push_head(4, len as u64)?;
        self.depth += 1;
        let mut a = ArrayEncoder {
            enc: self,
            remaining: len,
        };
        let result = f(&mut a);
        let remaining = a.remaining;
        self.depth -= 1;

        if result.is_err() || remaining != 0 {
            self.buf.truncate(start);
            return result.and_then(|()| Err(CborError::new(ErrorCode::ArrayLenMismatch, start)));
        }
        self.finish_root_if_top();
        Ok(())
    }

    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut MapEncoder<'_, 'm>) -> Result<(), CborError>,
    {
        self.begin_value()?;
        let start = self.buf.len();
        self.push_head(5, len as u64)?;
        self.depth += 1;
        let mut m = MapEncoder {
            enc: self,
            remaining: len,
            prev_key: None,
        };
        let result = f(&mut m);
        let remaining = m.remaining;
        self.depth -= 1;

        if result.is_err() || remaining != 0 {
            self.buf.truncate(start);
            return result.and_then(|()| Err(CborError::new(ErrorCode::MapLenMismatch, start)));
        }
        self.finish_root_if_top();
        Ok(())
    }

    /// Encode a [`Value`] tree generically.
    pub fn value_dyn(&mut self, v: &Value) -> Result<(), CborError> {
        match v {
            Value::Null => self.null(),
            Value::Undefined => self.undefined(),
            Value::Bool(b) => self.bool(*b),
            Value::Uint(n) => self.u64_value(*n),
            Value::Int(n) => self.i64_value(*n),
            Value::BigInt(b) => self.bigint(b),
            Value::Float(f) => self.f64_value(*f),
            Value::Bytes(b) => self.bytes(b),
            Value::Text(s) => self.text(s),
            Value::Array(items) => {
                let len = items.len();
                self.array(len, |a| {
                    for item in items {
                        a.value(item)?;
                    }
                    Ok(())
                })
            }
            Value::Map(entries) => {
                let len = entries.len();
                self.map(len, |m| {
                    for (k, v) in entries {
                        m.entry_dyn(k, v)?;
                    }
                    Ok(())
                })
            }
            Value::Tag(t, inner) => self.tag(*t, |e| e.value_dyn(inner)),
            Value::Simple(code) => self.simple(*code),
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// The mode this encoder was constructed with, for code (such as a
    /// derived struct encode) that needs to sort or re-encode sub-values
    /// under the same options.
    #[must_use]
    pub const fn mode(&self) -> &'m EncodeMode {
        self.mode
    }
}

/// Guard handed to an `Encoder::array` closure; tracks the declared element
/// count against what the closure actually writes.
pub struct ArrayEncoder<'a, 'm> {
    enc: &'a mut Encoder<'m>,
    remaining: usize,
}

impl<'a, 'm> ArrayEncoder<'a, 'm> {
    fn consume_one(&mut self) -> Result<(), CborError> {
        self.remaining = self
            .remaining
            .checked_sub(1)
            .ok_or_else(|| CborError::new(ErrorCode::ArrayLenMismatch, self.enc.buf.len()))?;
        Ok(())
    }

    pub fn value<T: crate::codec::CborEncode>(&mut self, v: &T) -> Result<(), CborError> {
        self.consume_one()?;
        v.encode(self.enc)
    }

    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut ArrayEncoder<'_, 'm>) -> Result<(), CborError>,
    {
        self.consume_one()?;
        self.enc.array(len, f)
    }

    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut MapEncoder<'_, 'm>) -> Result<(), CborError>,
    {
        self.consume_one()?;
        self.enc.map(len, f)
    }
}

/// Guard handed to an `Encoder::map` closure; additionally enforces the
/// mode's canonical key ordering, rolling back the whole map (via
/// `Encoder::map`'s own rollback) if a key is out of order or duplicated.
pub struct MapEncoder<'a, 'm> {
    enc: &'a mut Encoder<'m>,
    remaining: usize,
    prev_key: Option<Vec<u8>>,
}

impl<'a, 'm> MapEncoder<'a, 'm> {
    fn consume_one(&mut self) -> Result<(), CborError> {
        self.remaining = self
            .remaining
            .checked_sub(2)
            .ok_or_else(|| CborError::new(ErrorCode::MapLenMismatch, self.enc.buf.len()))?;
        Ok(())
    }

    fn check_order(&mut self, key_bytes: &[u8], off: usize) -> Result<(), CborError> {
        let order = self.enc.mode.key_order;
        if let Some(prev) = &self.prev_key {
            if order.cmp(prev, key_bytes) == core::cmp::Ordering::Equal {
                return Err(CborError::new(ErrorCode::DuplicateMapKey, off));
            }
            if !order.is_strictly_increasing(prev, key_bytes) {
                return Err(CborError::new(ErrorCode::NonCanonicalMapOrder, off));
            }
        }
        if order != KeyOrder::None {
            self.prev_key = Some(key_bytes.to_vec());
        }
        Ok(())
    }

    /// Write one text-keyed entry.
    pub fn entry<F>(&mut self, key: &str, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Encoder<'m>) -> Result<(), CborError>,
    {
        self.consume_one()?;
        let entry_start = self.enc.buf.len();
        self.enc.text(key)?;
        let key_bytes = self.enc.buf[entry_start..].to_vec();
        if let Err(e) = self.check_order(&key_bytes, entry_start) {
            self.enc.buf.truncate(entry_start);
            return Err(e);
        }
        if let Err(e) = f(self.enc) {
            self.enc.buf.truncate(entry_start);
            return Err(e);
        }
        Ok(())
    }

    /// Write one integer-keyed entry (`#[cbor(keyasint)]` fields).
    pub fn entry_keyasint<F>(&mut self, key: i64, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Encoder<'m>) -> Result<(), CborError>,
    {
        self.consume_one()?;
        let entry_start = self.enc.buf.len();
        self.enc.i64_value(key)?;
        let key_bytes = self.enc.buf[entry_start..].to_vec();
        if let Err(e) = self.check_order(&key_bytes, entry_start) {
            self.enc.buf.truncate(entry_start);
            return Err(e);
        }
        if let Err(e) = f(self.enc) {
            self.enc.buf.truncate(entry_start);
            return Err(e);
        }
        Ok(())
    }

    fn entry_dyn(&mut self, key: &Value, value: &Value) -> Result<(), CborError> {
        self.consume_one()?;
        let entry_start = self.enc.buf.len();
        self.enc.value_dyn(key)?;
        let key_bytes = self.enc.buf[entry_start..].to_vec();
        if let Err(e) = self.check_order(&key_bytes, entry_start) {
            self.enc.buf.truncate(entry_start);
            return Err(e);
        }
        if let Err(e) = self.enc.value_dyn(value) {
            self.enc.buf.truncate(entry_start);
            return Err(e);
        }
        Ok(())
    }
}

/// Guard handed to an [`Encoder::indefinite_array`] closure.
pub struct IndefiniteArrayEncoder<'a, 'm> {
    enc: &'a mut Encoder<'m>,
}

impl<'a, 'm> IndefiniteArrayEncoder<'a, 'm> {
    pub fn value<T: crate::codec::CborEncode>(&mut self, v: &T) -> Result<(), CborError> {
        v.encode(self.enc)
    }
}

/// Guard handed to an [`Encoder::indefinite_map`] closure. Indefinite-length
/// maps are an explicitly non-canonical escape hatch, so unlike
/// [`MapEncoder`] this does not enforce the mode's key ordering.
pub struct IndefiniteMapEncoder<'a, 'm> {
    enc: &'a mut Encoder<'m>,
}

impl<'a, 'm> IndefiniteMapEncoder<'a, 'm> {
    /// Write one text-keyed entry.
    pub fn entry<F>(&mut self, key: &str, f: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Encoder<'m>) -> Result<(), CborError>,
    {
        self.enc.text(key)?;
        f(self.enc)
    }
}

/// Guard handed to an [`Encoder::indefinite_bytes`] closure; each `chunk`
/// call writes one definite-length byte-string chunk.
pub struct IndefiniteBytesEncoder<'a, 'm> {
    enc: &'a mut Encoder<'m>,
}

impl<'a, 'm> IndefiniteBytesEncoder<'a, 'm> {
    pub fn chunk(&mut self, bytes: &[u8]) -> Result<(), CborError> {
        self.enc.bytes(bytes)
    }
}

/// Guard handed to an [`Encoder::indefinite_text`] closure; each `chunk`
/// call writes one definite-length text-string chunk.
pub struct IndefiniteTextEncoder<'a, 'm> {
    enc: &'a mut Encoder<'m>,
}

impl<'a, 'm> IndefiniteTextEncoder<'a, 'm> {
    pub fn chunk(&mut self, s: &str) -> Result<(), CborError> {
        self.enc.text(s)
    }
}

/// Encode any [`crate::codec::CborEncode`] value into a fresh byte vector.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_to_vec<T: crate::codec::CborEncode>(
    value: &T,
    mode: &EncodeMode,
) -> Result<Vec<u8>, CborError> {
    let mut enc = Encoder::new(mode);
    value.encode(&mut enc)?;
    Ok(enc.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::EncodeMode;

    #[test]
    fn encodes_small_uint() {
        let mode = EncodeMode::default();
        assert_eq!(encode_to_vec(&0u64, &mode).unwrap(), alloc::vec![0x00]);
        assert_eq!(encode_to_vec(&23u64, &mode).unwrap(), alloc::vec![0x17]);
        assert_eq!(encode_to_vec(&24u64, &mode).unwrap(), alloc::vec![0x18, 0x18]);
    }

    #[test]
    fn encodes_negative_int() {
        let mode = EncodeMode::default();
        assert_eq!(encode_to_vec(&-1i64, &mode).unwrap(), alloc::vec![0x20]);
        assert_eq!(encode_to_vec(&-10i64, &mode).unwrap(), alloc::vec![0x29]);
    }

    #[test]
    fn indefinite_length_forbidden_by_default() {
        let mode = EncodeMode::default();
        let mut enc = Encoder::new(&mode);
        let err = enc.indefinite_array(|_| Ok(())).unwrap_err();
        assert_eq!(err.code, ErrorCode::IndefiniteLengthForbidden);
    }

    #[test]
    fn indefinite_array_round_trips_through_decode() {
        let mode = EncodeMode::builder()
            .indefinite_length(crate::mode::IndefiniteLength::Allowed)
            .build();
        let mut enc = Encoder::new(&mode);
        enc.indefinite_array(|a| {
            a.value(&1u64)?;
            a.value(&2u64)?;
            a.value(&3u64)
        })
        .unwrap();
        let bytes = enc.into_bytes();
        assert_eq!(bytes.first(), Some(&0x9f));
        assert_eq!(bytes.last(), Some(&0xff));

        let dec_mode = crate::mode::DecodeMode::builder()
            .indefinite_length(crate::mode::IndefiniteLength::Allowed)
            .build()
            .unwrap();
        let v: Vec<u64> = crate::decode::decode_from_slice(&bytes, &dec_mode).unwrap();
        assert_eq!(v, alloc::vec![1, 2, 3]);
    }

    #[test]
    fn indefinite_bytes_chunks_round_trip() {
        let mode = EncodeMode::builder()
            .indefinite_length(crate::mode::IndefiniteLength::Allowed)
            .build();
        let mut enc = Encoder::new(&mode);
        enc.indefinite_bytes(|b| {
            b.chunk(&[1, 2])?;
            b.chunk(&[3, 4])
        })
        .unwrap();
        let bytes = enc.into_bytes();
        assert_eq!(bytes.first(), Some(&0x5f));

        let dec_mode = crate::mode::DecodeMode::builder()
            .indefinite_length(crate::mode::IndefiniteLength::Allowed)
            .build()
            .unwrap();
        let mut dec = crate::decode::Decoder::new(&bytes, &dec_mode);
        assert_eq!(dec.read_bytes_owned().unwrap(), alloc::vec![1, 2, 3, 4]);
    }

    #[test]
    fn rolls_back_map_on_order_violation() {
        let mode = EncodeMode::default();
        let mut enc = Encoder::new(&mode);
        let start_len = enc.buf.len();
        let err = enc
            .map(2, |m| {
                m.entry("bb", |e| e.null())?;
                m.entry("a", |e| e.null())?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NonCanonicalMapOrder);
        assert_eq!(enc.buf.len(), start_len);
    }
}
