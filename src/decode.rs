//! Decoder: component D (`SPEC_FULL.md` 4.D).
//!
//! A single-pass reader over a borrowed `&[u8]`, mirroring the encoder's
//! transactional shape: containers are entered through a guard
//! (`ArrayDecoder`/`MapDecoder`) that tracks how many elements remain and
//! enforces the same depth/length/order rules the scanner checks, so typed
//! decoding stays safe even when called without a prior `validate` pass.
//! Unread trailing elements of a container are drained with
//! [`crate::scanner::skip_one`] rather than left dangling, the same way the
//! teacher's decoder skips unknown struct fields.

use alloc::string::String;
use alloc::vec::Vec;

use crate::codec::CborDecode;
use crate::error::{CborError, ErrorCode};
use crate::float;
use crate::int;
use crate::mode::{DecodeMode, IndefiniteLength, IntegerDecoding, TagPolicyMode, TimeTagMode, Utf8Policy};
use crate::tag::TagBinding;
use crate::time::EpochTime;
use crate::value::{BigInt, Value};
use crate::wire::{self, Head, AI_INDEFINITE};

/// Resolve which registered tag (by position: `[positive, negative]` for
/// `BigInt`, `[text, epoch]` for `EpochTime`) a decoded tag number is, or
/// `None` if it matches neither slot in the binding.
fn bignum_sign_for_tag(binding: Option<TagBinding>, tag: u64) -> Option<bool> {
    let binding = binding?;
    if binding.tags.first() == Some(&tag) {
        Some(false)
    } else if binding.tags.get(1) == Some(&tag) {
        Some(true)
    } else {
        None
    }
}

/// Streaming decoder reading CBOR out of a borrowed byte slice under a
/// [`DecodeMode`].
pub struct Decoder<'de> {
    data: &'de [u8],
    pos: usize,
    depth: usize,
    mode: &'de DecodeMode,
}

impl<'de> Decoder<'de> {
    #[must_use]
    pub const fn new(data: &'de [u8], mode: &'de DecodeMode) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
            mode,
        }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The mode this decoder was constructed with, for code (such as a
    /// derived struct decode) that needs to decode a sub-value against the
    /// same options.
    #[must_use]
    pub const fn mode(&self) -> &'de DecodeMode {
        self.mode
    }

    fn ensure_depth(&self, off: usize) -> Result<(), CborError> {
        if self.depth > self.mode.limits().max_depth {
            return Err(CborError::new(ErrorCode::DepthLimitExceeded, off));
        }
        Ok(())
    }

    fn peek_head(&self) -> Result<Head, CborError> {
        let mut p = self.pos;
        wire::read_head(self.data, &mut p)
    }

    fn read_head(&mut self) -> Result<Head, CborError> {
        wire::read_head(self.data, &mut self.pos)
    }

    /// Read a major-0/1 integer, or a tag-2/3 bignum, as an `i128`.
    fn read_integer_i128(&mut self) -> Result<i128, CborError> {
        let head = self.read_head()?;
        match head.major {
            0 => {
                let v = wire::read_uint(self.data, &mut self.pos, head.ai, head.offset)?;
                Ok(i128::from(v))
            }
            1 => {
                let v = wire::read_uint(self.data, &mut self.pos, head.ai, head.offset)?;
                Ok(-1_i128 - i128::from(v))
            }
            6 => {
                let tag = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
                let binding = self.mode.registry.binding_for::<BigInt>();
                match bignum_sign_for_tag(binding, tag) {
                    Some(negative) => {
                        let magnitude = self.read_bignum_payload(head.offset)?;
                        if magnitude.len() > 16 {
                            return Err(CborError::new(ErrorCode::IntegerOutOfRange, head.offset));
                        }
                        let mut buf = [0u8; 16];
                        buf[16 - magnitude.len()..].copy_from_slice(&magnitude);
                        let mag = u128::from_be_bytes(buf);
                        let value = if negative { -1_i128 - mag as i128 } else { mag as i128 };
                        Ok(value)
                    }
                    None => Err(CborError::new(ErrorCode::TypeMismatch, head.offset)),
                }
            }
            _ => Err(CborError::new(ErrorCode::TypeMismatch, head.offset)),
        }
    }

    fn read_bignum_payload(&mut self, tag_off: usize) -> Result<Vec<u8>, CborError> {
        let inner_off = self.pos;
        let head = self.read_head()?;
        if head.major != 2 {
            return Err(CborError::new(ErrorCode::TagPayloadMismatch, inner_off));
        }
        if head.ai == AI_INDEFINITE {
            return Err(CborError::new(ErrorCode::IndefiniteChunkInvalid, inner_off));
        }
        let len = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
        let len = wire::len_to_usize(len, head.offset)?;
        if len > self.mode.limits().max_bytes_len {
            return Err(CborError::new(ErrorCode::BytesLenLimitExceeded, tag_off));
        }
        let bytes = wire::read_exact(self.data, &mut self.pos, len)?;
        int::normalize_magnitude(bytes, inner_off)
    }

    pub fn read_u64(&mut self) -> Result<u64, CborError> {
        let off = self.pos;
        let v = self.read_integer_i128()?;
        u64::try_from(v).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))
    }

    pub fn read_i64(&mut self) -> Result<i64, CborError> {
        let off = self.pos;
        let v = self.read_integer_i128()?;
        i64::try_from(v).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))
    }

    pub fn read_u8(&mut self) -> Result<u8, CborError> {
        let off = self.pos;
        u8::try_from(self.read_u64()?).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))
    }

    pub fn read_u16(&mut self) -> Result<u16, CborError> {
        let off = self.pos;
        u16::try_from(self.read_u64()?).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))
    }

    pub fn read_u32(&mut self) -> Result<u32, CborError> {
        let off = self.pos;
        u32::try_from(self.read_u64()?).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))
    }

    pub fn read_i8(&mut self) -> Result<i8, CborError> {
        let off = self.pos;
        i8::try_from(self.read_i64()?).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))
    }

    pub fn read_i16(&mut self) -> Result<i16, CborError> {
        let off = self.pos;
        i16::try_from(self.read_i64()?).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))
    }

    pub fn read_i32(&mut self) -> Result<i32, CborError> {
        let off = self.pos;
        i32::try_from(self.read_i64()?).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))
    }

    pub fn read_bool(&mut self) -> Result<bool, CborError> {
        let head = self.read_head()?;
        match (head.major, head.ai) {
            (7, 20) => Ok(false),
            (7, 21) => Ok(true),
            _ => Err(CborError::new(ErrorCode::TypeMismatch, head.offset)),
        }
    }

    pub fn read_f64(&mut self) -> Result<f64, CborError> {
        let head = self.read_head()?;
        if head.major != 7 {
            return Err(CborError::new(ErrorCode::TypeMismatch, head.offset));
        }
        let v = match head.ai {
            25 => {
                let bits = wire::read_be_u16(self.data, &mut self.pos)?;
                float::f64_from_f16_bits(bits)
            }
            26 => {
                let bits = wire::read_be_u32(self.data, &mut self.pos)?;
                f64::from(f32::from_bits(bits))
            }
            27 => {
                let bits = wire::read_be_u64(self.data, &mut self.pos)?;
                f64::from_bits(bits)
            }
            _ => return Err(CborError::new(ErrorCode::TypeMismatch, head.offset)),
        };
        Ok(if v.is_nan() {
            f64::from_bits(float::canonicalize_nan(v.to_bits()))
        } else {
            v
        })
    }

    /// `true` if the next item is CBOR `null`, without consuming it.
    pub fn peek_is_null(&self) -> Result<bool, CborError> {
        let head = self.peek_head()?;
        Ok(head.major == 7 && head.ai == 22)
    }

    pub fn read_null(&mut self) -> Result<(), CborError> {
        let head = self.read_head()?;
        if head.major == 7 && head.ai == 22 {
            Ok(())
        } else {
            Err(CborError::new(ErrorCode::TypeMismatch, head.offset))
        }
    }

    fn check_indefinite_allowed(&self, off: usize) -> Result<(), CborError> {
        if self.mode.indefinite_length != IndefiniteLength::Allowed {
            return Err(CborError::new(ErrorCode::IndefiniteLengthForbidden, off));
        }
        Ok(())
    }

    pub fn read_bytes_owned(&mut self) -> Result<Vec<u8>, CborError> {
        let head = self.read_head()?;
        if head.major != 2 {
            return Err(CborError::new(ErrorCode::TypeMismatch, head.offset));
        }
        let mut out = Vec::new();
        if head.ai == AI_INDEFINITE {
            self.check_indefinite_allowed(head.offset)?;
            loop {
                if self.data.get(self.pos) == Some(&0xFF) {
                    self.pos += 1;
                    return Ok(out);
                }
                let chunk_off = self.pos;
                let chunk = self.read_head()?;
                if chunk.major != 2 || chunk.ai == AI_INDEFINITE {
                    return Err(CborError::new(ErrorCode::IndefiniteChunkInvalid, chunk_off));
                }
                let len = wire::read_uint_minimal(self.data, &mut self.pos, chunk.ai, chunk.offset)?;
                let len = wire::len_to_usize(len, chunk.offset)?;
                if out.len() + len > self.mode.limits().max_bytes_len {
                    return Err(CborError::new(ErrorCode::BytesLenLimitExceeded, chunk_off));
                }
                let bytes = wire::read_exact(self.data, &mut self.pos, len)?;
                out.try_reserve(len)
                    .map_err(|_| crate::alloc_util::alloc_failed(chunk_off))?;
                out.extend_from_slice(bytes);
            }
        }

        let len = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
        let len = wire::len_to_usize(len, head.offset)?;
        if len > self.mode.limits().max_bytes_len {
            return Err(CborError::new(ErrorCode::BytesLenLimitExceeded, head.offset));
        }
        let bytes = wire::read_exact(self.data, &mut self.pos, len)?;
        crate::alloc_util::try_vec_from_slice(bytes, head.offset)
    }

    fn decode_text_chunk(&self, bytes: &[u8], off: usize, out: &mut String) -> Result<(), CborError> {
        match self.mode.utf8 {
            Utf8Policy::RejectInvalid => {
                let s = crate::utf8::validate(bytes).map_err(|()| CborError::new(ErrorCode::Utf8Invalid, off))?;
                out.try_reserve(s.len())
                    .map_err(|_| crate::alloc_util::alloc_failed(off))?;
                out.push_str(s);
            }
            Utf8Policy::DecodeInvalid => {
                let cow = crate::utf8::decode_lossy(bytes);
                out.try_reserve(cow.len())
                    .map_err(|_| crate::alloc_util::alloc_failed(off))?;
                out.push_str(&cow);
            }
        }
        Ok(())
    }

    pub fn read_text_owned(&mut self) -> Result<String, CborError> {
        let head = self.read_head()?;
        if head.major != 3 {
            return Err(CborError::new(ErrorCode::TypeMismatch, head.offset));
        }
        let mut out = String::new();
        if head.ai == AI_INDEFINITE {
            self.check_indefinite_allowed(head.offset)?;
            loop {
                if self.data.get(self.pos) == Some(&0xFF) {
                    self.pos += 1;
                    return Ok(out);
                }
                let chunk_off = self.pos;
                let chunk = self.read_head()?;
                if chunk.major != 3 || chunk.ai == AI_INDEFINITE {
                    return Err(CborError::new(ErrorCode::IndefiniteChunkInvalid, chunk_off));
                }
                let len = wire::read_uint_minimal(self.data, &mut self.pos, chunk.ai, chunk.offset)?;
                let len = wire::len_to_usize(len, chunk.offset)?;
                if out.len() + len > self.mode.limits().max_text_len {
                    return Err(CborError::new(ErrorCode::TextLenLimitExceeded, chunk_off));
                }
                let bytes = wire::read_exact(self.data, &mut self.pos, len)?;
                self.decode_text_chunk(bytes, chunk_off, &mut out)?;
            }
        }

        let len = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
        let len = wire::len_to_usize(len, head.offset)?;
        if len > self.mode.limits().max_text_len {
            return Err(CborError::new(ErrorCode::TextLenLimitExceeded, head.offset));
        }
        let bytes = wire::read_exact(self.data, &mut self.pos, len)?;
        self.decode_text_chunk(bytes, head.offset, &mut out)?;
        Ok(out)
    }

    pub fn read_bigint(&mut self) -> Result<BigInt, CborError> {
        let off = self.pos;
        let head = self.peek_head()?;
        let binding = self.mode.registry.binding_for::<BigInt>();
        if head.major == 0 || head.major == 1 {
            if matches!(binding.map(|b| b.policy), Some(crate::tag::TagPolicy::DecTagRequired)) {
                return Err(CborError::new(ErrorCode::TagRequired, off));
            }
            let v = self.read_integer_i128()?;
            let negative = v < 0;
            let mag_u128 = if negative { (-1_i128 - v) as u128 } else { v as u128 };
            if mag_u128 == 0 {
                return Ok(BigInt::new_unchecked(false, Vec::new()));
            }
            let magnitude = int::magnitude_from_u128(mag_u128, off)?;
            return Ok(BigInt::new_unchecked(negative, magnitude));
        }
        if head.major != 6 {
            return Err(CborError::new(ErrorCode::TypeMismatch, off));
        }
        let _ = self.read_head()?;
        let tag = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
        let negative = bignum_sign_for_tag(binding, tag)
            .ok_or_else(|| CborError::new(ErrorCode::TagPayloadMismatch, off))?;
        let magnitude = self.read_bignum_payload(off)?;
        Ok(BigInt::new_unchecked(negative, magnitude))
    }

    /// Read a tag 0 (RFC 3339 text)/tag 1 (numeric epoch seconds) time, or —
    /// depending on `DecodeMode::time_tag` — a bare untagged number.
    pub fn read_epoch_time(&mut self) -> Result<EpochTime, CborError> {
        let off = self.pos;
        let head = self.peek_head()?;
        if head.major == 6 {
            let binding = self.mode.registry.binding_for::<EpochTime>();
            let _ = self.read_head()?;
            let tag = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
            let known = binding.is_some_and(|b| b.tags.contains(&tag));
            if self.mode.time_tag != TimeTagMode::Ignored && !known {
                return Err(CborError::new(ErrorCode::TagPayloadMismatch, head.offset));
            }
            return self.read_epoch_payload(head.offset);
        }
        if self.mode.time_tag == TimeTagMode::Required {
            return Err(CborError::new(ErrorCode::TagRequired, off));
        }
        self.read_epoch_payload(off)
    }

    fn read_epoch_payload(&mut self, off: usize) -> Result<EpochTime, CborError> {
        let head = self.peek_head()?;
        if head.major == 3 {
            let s = self.read_text_owned()?;
            let seconds = crate::time::parse_rfc3339(&s)
                .ok_or_else(|| CborError::new(ErrorCode::TagPayloadMismatch, off))?;
            Ok(EpochTime::from_seconds(seconds))
        } else {
            Ok(EpochTime::from_seconds(self.read_number_as_f64()?))
        }
    }

    fn read_number_as_f64(&mut self) -> Result<f64, CborError> {
        let head = self.peek_head()?;
        match head.major {
            0 | 1 => Ok(self.read_integer_i128()? as f64),
            7 => self.read_f64(),
            _ => Err(CborError::new(ErrorCode::TypeMismatch, head.offset)),
        }
    }

    /// Enter an array, yielding an [`ArrayDecoder`] to the closure. Any
    /// elements the closure doesn't consume are drained afterward.
    pub fn read_array<F, R>(&mut self, f: F) -> Result<R, CborError>
    where
        F: FnOnce(&mut ArrayDecoder<'_, 'de>) -> Result<R, CborError>,
    {
        let head = self.read_head()?;
        if head.major != 4 {
            return Err(CborError::new(ErrorCode::TypeMismatch, head.offset));
        }
        self.ensure_depth(head.offset)?;
        let remaining = if head.ai == AI_INDEFINITE {
            self.check_indefinite_allowed(head.offset)?;
            None
        } else {
            let len = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
            let len = wire::len_to_usize(len, head.offset)?;
            if len > self.mode.limits().max_array_elements {
                return Err(CborError::new(ErrorCode::ArrayLenLimitExceeded, head.offset));
            }
            Some(len)
        };

        self.depth += 1;
        let mut guard = ArrayDecoder {
            dec: self,
            remaining,
            finished: false,
        };
        let result = f(&mut guard);
        let finished = guard.finished;
        let remaining = guard.remaining;
        let drain_result = if result.is_ok() {
            Self::drain_array(self, remaining, finished)
        } else {
            Ok(())
        };
        self.depth -= 1;
        drain_result?;
        result
    }

    fn drain_array(dec: &mut Self, remaining: Option<usize>, finished: bool) -> Result<(), CborError> {
        if finished {
            return Ok(());
        }
        match remaining {
            Some(n) => {
                for _ in 0..n {
                    dec.pos = crate::scanner::skip_one(dec.data, dec.pos, dec.depth + 1, dec.mode)?;
                }
                Ok(())
            }
            None => loop {
                if dec.data.get(dec.pos) == Some(&0xFF) {
                    dec.pos += 1;
                    return Ok(());
                }
                dec.pos = crate::scanner::skip_one(dec.data, dec.pos, dec.depth + 1, dec.mode)?;
            },
        }
    }

    /// Enter a map, yielding a [`MapDecoder`] to the closure. Any entries the
    /// closure doesn't consume are drained afterward.
    pub fn read_map<F, R>(&mut self, f: F) -> Result<R, CborError>
    where
        F: FnOnce(&mut MapDecoder<'_, 'de>) -> Result<R, CborError>,
    {
        let head = self.read_head()?;
        if head.major != 5 {
            return Err(CborError::new(ErrorCode::TypeMismatch, head.offset));
        }
        self.ensure_depth(head.offset)?;
        let remaining = if head.ai == AI_INDEFINITE {
            self.check_indefinite_allowed(head.offset)?;
            None
        } else {
            let len = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
            let len = wire::len_to_usize(len, head.offset)?;
            if len > self.mode.limits().max_map_pairs {
                return Err(CborError::new(ErrorCode::MapLenLimitExceeded, head.offset));
            }
            Some(len)
        };

        self.depth += 1;
        let mut guard = MapDecoder {
            dec: self,
            remaining,
            finished: false,
            prev_key: None,
        };
        let result = f(&mut guard);
        let finished = guard.finished;
        let remaining = guard.remaining;
        let drain_result = if result.is_ok() {
            Self::drain_map(self, remaining, finished)
        } else {
            Ok(())
        };
        self.depth -= 1;
        drain_result?;
        result
    }

    fn drain_map(dec: &mut Self, remaining: Option<usize>, finished: bool) -> Result<(), CborError> {
        if finished {
            return Ok(());
        }
        match remaining {
            Some(n) => {
                for _ in 0..n {
                    dec.pos = crate::scanner::skip_one(dec.data, dec.pos, dec.depth + 1, dec.mode)?;
                    dec.pos = crate::scanner::skip_one(dec.data, dec.pos, dec.depth + 1, dec.mode)?;
                }
                Ok(())
            }
            None => loop {
                if dec.data.get(dec.pos) == Some(&0xFF) {
                    dec.pos += 1;
                    return Ok(());
                }
                dec.pos = crate::scanner::skip_one(dec.data, dec.pos, dec.depth + 1, dec.mode)?;
                dec.pos = crate::scanner::skip_one(dec.data, dec.pos, dec.depth + 1, dec.mode)?;
            },
        }
    }

    /// Decode any well-formed CBOR item into the generic [`Value`] tree.
    /// Tag 55799 (self-describe) is always transparent: it is consumed and
    /// the inner item returned directly, never wrapped as `Value::Tag`.
    pub fn read_value(&mut self) -> Result<Value, CborError> {
        self.ensure_depth(self.pos)?;
        let head = self.peek_head()?;
        match head.major {
            0 => {
                let off = head.offset;
                let v = self.read_u64()?;
                if self.mode.integer_decoding == IntegerDecoding::AlwaysSignedWithOverflowError {
                    i64::try_from(v).map_err(|_| CborError::new(ErrorCode::IntegerOutOfRange, off))?;
                }
                Ok(Value::Uint(v))
            }
            1 => {
                let v = self.read_integer_i128()?;
                match i64::try_from(v) {
                    Ok(n) => Ok(Value::Int(n)),
                    Err(_) => {
                        let negative = v < 0;
                        let mag = if negative { (-1_i128 - v) as u128 } else { v as u128 };
                        let magnitude = int::magnitude_from_u128(mag, head.offset)?;
                        Ok(Value::BigInt(BigInt::new_unchecked(negative, magnitude)))
                    }
                }
            }
            2 => Ok(Value::Bytes(self.read_bytes_owned()?)),
            3 => Ok(Value::Text(self.read_text_owned()?)),
            4 => self.read_array(|a| {
                let mut items = Vec::new();
                while a.next_if_any()?.is_some() {
                    let v = a.dec.read_value()?;
                    crate::alloc_util::try_push(&mut items, v, a.dec.pos)?;
                }
                Ok(Value::Array(items))
            }),
            5 => self.read_map(|m| {
                let mut entries = Vec::new();
                while let Some((k, v)) = m.next_value_entry()? {
                    crate::alloc_util::try_push(&mut entries, (k, v), m.dec.pos)?;
                }
                Ok(Value::Map(entries))
            }),
            6 => {
                let _ = self.read_head()?;
                let tag = wire::read_uint_minimal(self.data, &mut self.pos, head.ai, head.offset)?;
                if tag == crate::tag::TAG_SELF_DESCRIBE {
                    return self.read_value();
                }
                if self.mode.tags == TagPolicyMode::Forbidden {
                    return Err(CborError::new(ErrorCode::TagForbidden, head.offset));
                }
                let bigint_binding = self.mode.registry.binding_for::<BigInt>();
                if let Some(negative) = bignum_sign_for_tag(bigint_binding, tag) {
                    let magnitude = self.read_bignum_payload(head.offset)?;
                    return Ok(Value::BigInt(BigInt::new_unchecked(negative, magnitude)));
                }
                self.ensure_depth(head.offset)?;
                let inner = self.read_value()?;
                Ok(Value::Tag(tag, alloc::boxed::Box::new(inner)))
            }
            7 => self.read_simple_or_float_value(head),
            _ => unreachable!("major type is a 3-bit field"),
        }
    }

    fn read_simple_or_float_value(&mut self, head: Head) -> Result<Value, CborError> {
        match head.ai {
            20 | 21 => Ok(Value::Bool(self.read_bool()?)),
            22 => {
                self.read_null()?;
                Ok(Value::Null)
            }
            23 => {
                let _ = self.read_head()?;
                Ok(Value::Undefined)
            }
            25 | 26 | 27 => Ok(Value::Float(self.read_f64()?)),
            0..=19 => {
                let _ = self.read_head()?;
                Ok(Value::Simple(head.ai))
            }
            24 => {
                let _ = self.read_head()?;
                let code = wire::read_u8(self.data, &mut self.pos)?;
                if code < 32 {
                    return Err(CborError::new(ErrorCode::NonCanonicalEncoding, head.offset));
                }
                Ok(Value::Simple(code))
            }
            31 => Err(CborError::new(ErrorCode::UnexpectedBreak, head.offset)),
            _ => Err(CborError::new(ErrorCode::ReservedAdditionalInfo, head.offset)),
        }
    }
}

/// Guard handed to a [`Decoder::read_array`] closure.
pub struct ArrayDecoder<'a, 'de> {
    dec: &'a mut Decoder<'de>,
    remaining: Option<usize>,
    finished: bool,
}

impl<'a, 'de> ArrayDecoder<'a, 'de> {
    /// Returns `Some(())` if another element is available, `None` once the
    /// array is exhausted (consuming the break byte for indefinite arrays).
    ///
    /// # Errors
    ///
    /// Propagates any read error encountered while checking for a break byte.
    pub fn next_if_any(&mut self) -> Result<Option<()>, CborError> {
        if self.finished {
            return Ok(None);
        }
        match self.remaining {
            Some(0) => {
                self.finished = true;
                Ok(None)
            }
            Some(n) => {
                self.remaining = Some(n - 1);
                Ok(Some(()))
            }
            None => {
                if self.dec.data.get(self.dec.pos) == Some(&0xFF) {
                    self.dec.pos += 1;
                    self.finished = true;
                    Ok(None)
                } else {
                    Ok(Some(()))
                }
            }
        }
    }

    pub fn value<T: CborDecode<'de>>(&mut self) -> Result<T, CborError> {
        T::decode(self.dec)
    }
}

/// Guard handed to a [`Decoder::read_map`] closure. Enforces the mode's
/// canonical key order and duplicate-key policy as entries are read.
pub struct MapDecoder<'a, 'de> {
    dec: &'a mut Decoder<'de>,
    remaining: Option<usize>,
    finished: bool,
    prev_key: Option<&'de [u8]>,
}

impl<'a, 'de> MapDecoder<'a, 'de> {
    fn has_more(&mut self) -> Result<bool, CborError> {
        if self.finished {
            return Ok(false);
        }
        match self.remaining {
            Some(0) => {
                self.finished = true;
                Ok(false)
            }
            Some(_) => Ok(true),
            None => {
                if self.dec.data.get(self.dec.pos) == Some(&0xFF) {
                    self.dec.pos += 1;
                    self.finished = true;
                    Ok(false)
                } else {
                    Ok(true)
                }
            }
        }
    }

    fn check_order(&mut self, key_bytes: &'de [u8], off: usize) -> Result<(), CborError> {
        if let Some(prev) = self.prev_key {
            if prev == key_bytes {
                if self.dec.mode.duplicate_keys_reject {
                    return Err(CborError::new(ErrorCode::DuplicateMapKey, off));
                }
            } else if !self.dec.mode.key_order.is_strictly_increasing(prev, key_bytes) {
                return Err(CborError::new(ErrorCode::NonCanonicalMapOrder, off));
            }
        }
        self.prev_key = Some(key_bytes);
        Ok(())
    }

    /// Decode one key/value entry as concrete types, enforcing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the key/value fail to decode or violate the
    /// mode's duplicate/ordering policy.
    pub fn next_entry<K: CborDecode<'de>, V: CborDecode<'de>>(
        &mut self,
    ) -> Result<Option<(K, V)>, CborError> {
        if !self.has_more()? {
            return Ok(None);
        }
        if let Some(n) = self.remaining {
            self.remaining = Some(n - 2);
        }
        let key_start = self.dec.pos;
        let key = K::decode(self.dec)?;
        let key_bytes = &self.dec.data[key_start..self.dec.pos];
        self.check_order(key_bytes, key_start)?;
        let value = V::decode(self.dec)?;
        Ok(Some((key, value)))
    }

    fn next_value_entry(&mut self) -> Result<Option<(Value, Value)>, CborError> {
        if !self.has_more()? {
            return Ok(None);
        }
        if let Some(n) = self.remaining {
            self.remaining = Some(n - 2);
        }
        let key_start = self.dec.pos;
        let key = self.dec.read_value()?;
        let key_bytes = &self.dec.data[key_start..self.dec.pos];
        self.check_order(key_bytes, key_start)?;
        let value = self.dec.read_value()?;
        Ok(Some((key, value)))
    }
}

/// Decode a [`CborDecode`] value from a complete byte slice, requiring the
/// slice to contain exactly one well-formed CBOR item under `mode`.
///
/// # Errors
///
/// Returns an error if the bytes are not a single well-formed item, or if
/// decoding into `T` fails.
pub fn decode_from_slice<'de, T: CborDecode<'de>>(
    data: &'de [u8],
    mode: &'de DecodeMode,
) -> Result<T, CborError> {
    crate::scanner::validate_item(data, mode)?;
    let mut dec = Decoder::new(data, mode);
    let value = T::decode(&mut dec)?;
    if dec.pos != data.len() {
        return Err(CborError::new(ErrorCode::TrailingBytes, dec.pos));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::DecodeMode;

    #[test]
    fn decodes_small_uint() {
        let mode = DecodeMode::default();
        let v: u64 = decode_from_slice(&[0x00], &mode).unwrap();
        assert_eq!(v, 0);
        let v: u64 = decode_from_slice(&[0x18, 0x2a], &mode).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn decodes_negative_int() {
        let mode = DecodeMode::default();
        let v: i64 = decode_from_slice(&[0x29], &mode).unwrap();
        assert_eq!(v, -10);
    }

    #[test]
    fn decodes_text() {
        let mode = DecodeMode::default();
        let bytes = [0x63, b'a', b'b', b'c'];
        let v: alloc::string::String = decode_from_slice(&bytes, &mode).unwrap();
        assert_eq!(v, "abc");
    }

    #[test]
    fn decodes_array_of_uint() {
        let mode = DecodeMode::default();
        let bytes = [0x83, 0x01, 0x02, 0x03];
        let v: Vec<u64> = decode_from_slice(&bytes, &mode).unwrap();
        assert_eq!(v, alloc::vec![1, 2, 3]);
    }

    #[test]
    fn rejects_wrong_major_type() {
        let mode = DecodeMode::default();
        let err = decode_from_slice::<u64>(&[0x63, b'a', b'b', b'c'], &mode).unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeMismatch);
    }

    #[test]
    fn decodes_map_order_violation_rejected_under_enforced_order() {
        // key_order: None (the default) doesn't enforce an order at all, so
        // this needs an explicit ordering mode to exercise the rejection.
        let mode = DecodeMode::builder()
            .key_order(crate::order::KeyOrder::LengthFirst)
            .build()
            .unwrap();
        // {"bb": 1, "a": 2} -- wrong length-first order.
        let bytes = [0xa2, 0x62, b'b', b'b', 0x01, 0x61, b'a', 0x02];
        let err = decode_from_slice::<Value>(&bytes, &mode).unwrap_err();
        assert_eq!(err.code, ErrorCode::NonCanonicalMapOrder);
    }

    #[test]
    fn decodes_map_regardless_of_key_order_by_default() {
        let mode = DecodeMode::default();
        // {"bb": 1, "a": 2} -- not length-first order, but key_order: None
        // (the default) doesn't enforce one.
        let bytes = [0xa2, 0x62, b'b', b'b', 0x01, 0x61, b'a', 0x02];
        let v: Value = decode_from_slice(&bytes, &mode).unwrap();
        assert_eq!(v.as_map().map(|m| m.len()), Some(2));
    }
}
