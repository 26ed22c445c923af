//! Map-key ordering rules.
//!
//! CBOR defines two canonical orderings in common use:
//! - RFC 7049 §3.9 "length-first": shorter encoded key sorts first, ties
//!   broken lexicographically on the encoded bytes.
//! - CTAP2/RFC 8949 Appendix A "bytewise": pure lexicographic order on the
//!   encoded bytes, regardless of length.

use core::cmp::Ordering;

/// Length-first canonical order (RFC 7049 §3.9): shorter encoded key first,
/// then lexicographic.
#[inline]
#[must_use]
pub fn cmp_length_first(a: &[u8], b: &[u8]) -> Ordering {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

/// Bytewise canonical order (CTAP2): pure lexicographic comparison of the
/// encoded key bytes.
#[inline]
#[must_use]
pub fn cmp_bytewise(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// The map key-ordering discipline a mode enforces on encode/decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// No ordering requirement; maps are emitted/accepted in source order.
    #[default]
    None,
    /// RFC 7049 §3.9 length-first canonical order.
    LengthFirst,
    /// CTAP2 bytewise canonical order.
    Bytewise,
}

impl KeyOrder {
    #[must_use]
    pub fn cmp(self, a: &[u8], b: &[u8]) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::LengthFirst => cmp_length_first(a, b),
            Self::Bytewise => cmp_bytewise(a, b),
        }
    }

    #[must_use]
    pub fn is_strictly_increasing(self, prev: &[u8], curr: &[u8]) -> bool {
        match self {
            Self::None => true,
            ordered => ordered.cmp(prev, curr) == Ordering::Less,
        }
    }
}

/// Length in bytes of the canonical head encoding an unsigned length/integer
/// argument `n` would take: `n < 24` => 1 byte header, `<= 0xff` => 2, etc.
#[must_use]
pub const fn head_len(n: u64) -> usize {
    if n < 24 {
        1
    } else if n <= 0xff {
        2
    } else if n <= 0xffff {
        3
    } else if n <= 0xffff_ffff {
        5
    } else {
        9
    }
}
