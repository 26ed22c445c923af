//! The generic "any" destination: an owned tree that can represent any
//! well-formed CBOR item, used when a caller has no static Rust type to
//! decode into, or wants to inspect/build CBOR structurally.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::error::{CborError, ErrorCode};
use crate::int;

/// An arbitrary-precision integer outside the range of `i64`/`u64`,
/// represented as CBOR tags 2 (positive) / 3 (negative) are on the wire:
/// a sign flag plus a canonical (non-empty, no leading zero byte)
/// big-endian magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigInt {
    negative: bool,
    magnitude: Vec<u8>,
}

impl BigInt {
    /// Construct a `BigInt` from a sign and big-endian magnitude bytes,
    /// normalizing away any leading zero bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::BignumNotCanonical`] if the magnitude is all
    /// zero bytes (a bignum must not represent zero; encode `0` as a plain
    /// integer instead).
    pub fn new(negative: bool, magnitude: &[u8]) -> Result<Self, CborError> {
        let magnitude = int::normalize_magnitude(magnitude, 0)?;
        Ok(Self {
            negative,
            magnitude,
        })
    }

    /// Construct from an already-normalized magnitude, trusting the caller
    /// (used by the decoder after the scanner has validated canonicality).
    #[inline]
    #[must_use]
    pub(crate) const fn new_unchecked(negative: bool, magnitude: Vec<u8>) -> Self {
        Self {
            negative,
            magnitude,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }

    /// Narrow to an `i64` if the value fits, for ergonomic use by callers
    /// that don't care about the bignum/plain-integer wire distinction.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        int::try_narrow_to_i64(self.negative, &self.magnitude)
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => int::cmp_magnitude(&self.magnitude, &other.magnitude),
            (true, true) => int::cmp_magnitude(&other.magnitude, &self.magnitude),
        }
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// CBOR bytes known to already be one well-formed item, spliced verbatim on
/// encode and handed back verbatim on decode without being interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCbor(pub Vec<u8>);

impl RawCbor {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// An owned CBOR data item of any shape.
///
/// [`Value::Map`] equality (and the `Ord`-free `PartialEq`/`Eq` derived on
/// this type) ignores entry order, per RFC 8949's data model: two maps with
/// the same key/value pairs in different orders represent the same value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    /// A non-negative integer that fit in `u64` (major type 0).
    Uint(u64),
    /// A negative integer that fit in `i64` (major type 1).
    Int(i64),
    /// An integer outside `i64`/`u64` range (tag 2/3 bignum).
    BigInt(BigInt),
    Float(f64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// A tagged value that the tag registry did not claim for a specific
    /// Rust type; preserved as tag number + inner item.
    Tag(u64, Box<Value>),
    /// A CBOR simple value (major 7) outside `false`/`true`/`null`/
    /// `undefined`, by its numeric code.
    Simple(u8),
}

impl Value {
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Uint(v) => i64::try_from(*v).ok(),
            Self::Int(v) => Some(*v),
            Self::BigInt(b) => b.to_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Look up a text-keyed entry in a map value. Returns `None` if this is
    /// not a map or the key is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_text() == Some(key))
            .map(|(_, v)| v)
    }
}

fn map_eq(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .all(|(ak, av)| b.iter().any(|(bk, bv)| ak == bk && av == bv))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Undefined, Self::Undefined) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => map_eq(a, b),
            (Self::Tag(ta, a), Self::Tag(tb, b)) => ta == tb && a == b,
            (Self::Simple(a), Self::Simple(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}
