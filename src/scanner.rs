//! Well-formedness validator: component B (`SPEC_FULL.md` 4.B).
//!
//! A single-pass, depth-tracked recursive descent over the wire bytes.
//! Depth is checked *before* recursing (not after), so stack usage is
//! bounded by `mode.limits().max_depth` regardless of what an adversarial
//! input claims — memory use is O(configured cap), not O(wire-supplied
//! depth). Generalized beyond a single fixed validation profile to the
//! mode-driven rule set in `SPEC_FULL.md` 4.B.

use crate::error::{CborError, ErrorCode};
use crate::mode::{DecodeMode, IndefiniteLength, TagPolicyMode, Utf8Policy};
use crate::wire::{self, AI_INDEFINITE};

/// Validate that `bytes` contains exactly one well-formed CBOR data item
/// under `mode`, returning the byte length of that item.
///
/// # Errors
///
/// Returns the specific [`ErrorCode`] for the first well-formedness
/// violation encountered, or [`ErrorCode::TrailingBytes`] if bytes remain
/// after the single item.
pub fn validate_item(bytes: &[u8], mode: &DecodeMode) -> Result<usize, CborError> {
    if bytes.len() > mode.limits().max_input_bytes {
        return Err(CborError::new(ErrorCode::MessageLenLimitExceeded, 0));
    }
    let mut s = Scanner {
        data: bytes,
        mode,
        items_seen: 0,
    };
    let end = s.skip_value(0, 0)?;
    if end != bytes.len() {
        return Err(CborError::new(ErrorCode::TrailingBytes, end));
    }
    Ok(end)
}

/// Validate and skip exactly one well-formed item starting at `start`,
/// without requiring it to consume the rest of `data`. Used by the decoder
/// to skip unknown/unwanted values.
pub(crate) fn skip_one(
    data: &[u8],
    start: usize,
    depth: usize,
    mode: &DecodeMode,
) -> Result<usize, CborError> {
    let mut s = Scanner {
        data,
        mode,
        items_seen: 0,
    };
    s.skip_value(start, depth)
}

struct Scanner<'a> {
    data: &'a [u8],
    mode: &'a DecodeMode,
    items_seen: usize,
}

impl Scanner<'_> {
    fn bump_items(&mut self, off: usize) -> Result<(), CborError> {
        self.items_seen += 1;
        if self.items_seen > self.mode.limits().max_input_bytes.max(1) {
            return Err(CborError::new(ErrorCode::TotalItemsLimitExceeded, off));
        }
        Ok(())
    }

    fn ensure_depth(&self, depth: usize, off: usize) -> Result<(), CborError> {
        if depth > self.mode.limits().max_depth {
            return Err(CborError::new(ErrorCode::DepthLimitExceeded, off));
        }
        Ok(())
    }

    fn check_text(&self, bytes: &[u8], off: usize) -> Result<(), CborError> {
        if bytes.len() > self.mode.limits().max_text_len {
            return Err(CborError::new(ErrorCode::TextLenLimitExceeded, off));
        }
        if matches!(self.mode.utf8, Utf8Policy::RejectInvalid)
            && crate::utf8::validate(bytes).is_err()
        {
            return Err(CborError::new(ErrorCode::Utf8Invalid, off));
        }
        Ok(())
    }

    /// Skip one value at `pos`, returning the position just past it.
    fn skip_value(&mut self, pos: usize, depth: usize) -> Result<usize, CborError> {
        self.ensure_depth(depth, pos)?;
        self.bump_items(pos)?;

        let mut pos = pos;
        let head = wire::read_head(self.data, &mut pos)?;
        let off = head.offset;

        match head.major {
            0 | 1 => {
                let _ = wire::read_uint_minimal(self.data, &mut pos, head.ai, off)?;
                Ok(pos)
            }
            2 | 3 => self
                .skip_string(&mut pos, head.ai, head.major, off)
                .map(|()| pos),
            4 => self.skip_array(&mut pos, head.ai, off, depth).map(|()| pos),
            5 => self.skip_map(&mut pos, head.ai, off, depth).map(|()| pos),
            6 => self.skip_tag(&mut pos, head.ai, off, depth).map(|()| pos),
            7 => self
                .skip_simple_or_float(&mut pos, head.ai, off)
                .map(|()| pos),
            _ => unreachable!("major type is a 3-bit field"),
        }
    }

    fn skip_string(
        &mut self,
        pos: &mut usize,
        ai: u8,
        major: u8,
        off: usize,
    ) -> Result<(), CborError> {
        if ai == AI_INDEFINITE {
            if self.mode.indefinite_length != IndefiniteLength::Allowed {
                return Err(CborError::new(ErrorCode::IndefiniteLengthForbidden, off));
            }
            loop {
                let chunk_off = *pos;
                if self.data.get(*pos) == Some(&0xFF) {
                    *pos += 1;
                    return Ok(());
                }
                let chunk_head = wire::read_head(self.data, pos)?;
                if chunk_head.major != major || chunk_head.ai == AI_INDEFINITE {
                    return Err(CborError::new(ErrorCode::IndefiniteChunkInvalid, chunk_off));
                }
                let len = wire::read_uint(self.data, pos, chunk_head.ai, chunk_head.offset)?;
                let len = wire::len_to_usize(len, chunk_head.offset)?;
                let bytes = wire::read_exact(self.data, pos, len)?;
                if major == 3 {
                    self.check_text(bytes, chunk_off)?;
                } else if len > self.mode.limits().max_bytes_len {
                    return Err(CborError::new(ErrorCode::BytesLenLimitExceeded, chunk_off));
                }
            }
        }

        let len = wire::read_uint_minimal(self.data, pos, ai, off)?;
        let len = wire::len_to_usize(len, off)?;
        let bytes = wire::read_exact(self.data, pos, len)?;
        if major == 3 {
            self.check_text(bytes, off)?;
        } else if len > self.mode.limits().max_bytes_len {
            return Err(CborError::new(ErrorCode::BytesLenLimitExceeded, off));
        }
        Ok(())
    }

    fn skip_array(
        &mut self,
        pos: &mut usize,
        ai: u8,
        off: usize,
        depth: usize,
    ) -> Result<(), CborError> {
        if ai == AI_INDEFINITE {
            if self.mode.indefinite_length != IndefiniteLength::Allowed {
                return Err(CborError::new(ErrorCode::IndefiniteLengthForbidden, off));
            }
            loop {
                if self.data.get(*pos) == Some(&0xFF) {
                    *pos += 1;
                    return Ok(());
                }
                *pos = self.skip_value(*pos, depth + 1)?;
            }
        }

        let len = wire::read_uint_minimal(self.data, pos, ai, off)?;
        let len = wire::len_to_usize(len, off)?;
        if len > self.mode.limits().max_array_elements {
            return Err(CborError::new(ErrorCode::ArrayLenLimitExceeded, off));
        }
        for _ in 0..len {
            *pos = self.skip_value(*pos, depth + 1)?;
        }
        Ok(())
    }

    fn skip_map(
        &mut self,
        pos: &mut usize,
        ai: u8,
        off: usize,
        depth: usize,
    ) -> Result<(), CborError> {
        let indefinite = ai == AI_INDEFINITE;
        if indefinite && self.mode.indefinite_length != IndefiniteLength::Allowed {
            return Err(CborError::new(ErrorCode::IndefiniteLengthForbidden, off));
        }

        let len = if indefinite {
            None
        } else {
            let n = wire::read_uint_minimal(self.data, pos, ai, off)?;
            let n = wire::len_to_usize(n, off)?;
            if n > self.mode.limits().max_map_pairs {
                return Err(CborError::new(ErrorCode::MapLenLimitExceeded, off));
            }
            Some(n)
        };

        let mut i = 0usize;
        loop {
            if indefinite && self.data.get(*pos) == Some(&0xFF) {
                *pos += 1;
                return Ok(());
            }
            if let Some(n) = len {
                if i >= n {
                    return Ok(());
                }
            }

            *pos = self.skip_value(*pos, depth + 1)?;
            *pos = self.skip_value(*pos, depth + 1)?;
            i += 1;
        }
    }

    fn skip_tag(
        &mut self,
        pos: &mut usize,
        ai: u8,
        off: usize,
        depth: usize,
    ) -> Result<(), CborError> {
        let tag_number = wire::read_uint_minimal(self.data, pos, ai, off)?;

        if self.mode.tags == TagPolicyMode::Forbidden && tag_number != crate::tag::TAG_SELF_DESCRIBE {
            return Err(CborError::new(ErrorCode::TagForbidden, off));
        }

        match tag_number {
            crate::tag::TAG_BIGNUM_POS | crate::tag::TAG_BIGNUM_NEG => {
                let inner_off = *pos;
                let head = wire::read_head(self.data, pos)?;
                if head.major != 2 {
                    return Err(CborError::new(ErrorCode::TagPayloadMismatch, inner_off));
                }
                let len = wire::read_uint_minimal(self.data, pos, head.ai, head.offset)?;
                let len = wire::len_to_usize(len, head.offset)?;
                let bytes = wire::read_exact(self.data, pos, len)?;
                if bytes.first() == Some(&0) {
                    return Err(CborError::new(ErrorCode::BignumNotCanonical, inner_off));
                }
                Ok(())
            }
            _ => {
                *pos = self.skip_value(*pos, depth + 1)?;
                Ok(())
            }
        }
    }

    fn skip_simple_or_float(
        &mut self,
        pos: &mut usize,
        ai: u8,
        off: usize,
    ) -> Result<(), CborError> {
        match ai {
            0..=23 => Ok(()),
            24 => {
                let code = wire::read_u8(self.data, pos)?;
                if code < 32 {
                    return Err(CborError::new(ErrorCode::NonCanonicalEncoding, off));
                }
                Ok(())
            }
            25 => {
                let _ = wire::read_be_u16(self.data, pos)?;
                Ok(())
            }
            26 => {
                let _ = wire::read_be_u32(self.data, pos)?;
                Ok(())
            }
            27 => {
                let _ = wire::read_be_u64(self.data, pos)?;
                Ok(())
            }
            31 => Err(CborError::new(ErrorCode::UnexpectedBreak, off)),
            _ => Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::DecodeMode;

    fn mode() -> DecodeMode {
        DecodeMode::builder()
            .indefinite_length(IndefiniteLength::Allowed)
            .build()
            .unwrap()
    }

    #[test]
    fn validates_small_uint() {
        assert_eq!(validate_item(&[0x00], &mode()).unwrap(), 1);
        assert_eq!(validate_item(&[0x18, 0x2a], &mode()).unwrap(), 2);
    }

    #[test]
    fn rejects_non_minimal_uint() {
        let err = validate_item(&[0x18, 0x05], &mode()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NonCanonicalEncoding);
    }

    #[test]
    fn rejects_trailing_bytes() {
        let err = validate_item(&[0x00, 0x00], &mode()).unwrap_err();
        assert_eq!(err.code, ErrorCode::TrailingBytes);
    }

    #[test]
    fn accepts_duplicate_map_keys_and_any_order() {
        // {"a": 1, "a": 2} — well-formed; duplicate-key and key-order policy
        // are a decode-time concern (MapDecoder::check_order), not validation.
        let bytes = [0xa2, 0x61, b'a', 0x01, 0x61, b'a', 0x02];
        assert_eq!(validate_item(&bytes, &mode()).unwrap(), bytes.len());

        // {"b": 1, "a": 2} — descending key order, still well-formed.
        let bytes = [0xa2, 0x61, b'b', 0x01, 0x61, b'a', 0x02];
        assert_eq!(validate_item(&bytes, &mode()).unwrap(), bytes.len());
    }

    #[test]
    fn accepts_indefinite_array_with_break() {
        // [_ 1, 2]
        let bytes = [0x9f, 0x01, 0x02, 0xff];
        assert_eq!(validate_item(&bytes, &mode()).unwrap(), 4);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let m = DecodeMode::builder()
            .limits(crate::limits::DecodeLimits {
                max_depth: 4,
                ..crate::limits::DecodeLimits::default()
            })
            .build()
            .unwrap();
        // [[[[[]]]]] — five levels deep, exceeds max_depth=4.
        let bytes = [0x81, 0x81, 0x81, 0x81, 0x80];
        let err = validate_item(&bytes, &m).unwrap_err();
        assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
    }
}
