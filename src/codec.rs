//! The `CborEncode`/`CborDecode` traits the encoder and decoder drive, plus
//! impls for built-in Rust types (`CborEncode`/`CborDecode`/`CborArrayElem`),
//! driven by mode options (`DecodeMode`/`EncodeMode`) rather than a
//! const-generic checked/unchecked split.

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{CborError, ErrorCode};

/// Encode a value into canonical (or mode-configured) CBOR.
pub trait CborEncode {
    /// # Errors
    ///
    /// Returns an error if encoding fails (builder misuse, allocation
    /// failure, or a value that cannot be represented, e.g. a `NaN` under a
    /// mode that forbids it).
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError>;
}

/// Decode a value from a streaming decoder.
pub trait CborDecode<'de>: Sized {
    /// # Errors
    ///
    /// Returns an error if the CBOR item does not match the expected type,
    /// violates the decoder's mode, or exceeds configured limits.
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError>;
}

/// Marker for types that may appear as elements of a CBOR array when
/// encoding/decoding a `Vec<T>`. Exists so `#[derive(CborEncode)]` can
/// generate a blanket-safe `impl CborArrayElem for Name {}` alongside the
/// main impl.
pub trait CborArrayElem {}

macro_rules! impl_int {
    ($t:ty, $enc:ident, $dec:ident) => {
        impl CborEncode for $t {
            fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
                enc.$enc(*self)
            }
        }
        impl<'de> CborDecode<'de> for $t {
            fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
                dec.$dec()
            }
        }
        impl CborArrayElem for $t {}
    };
}

impl_int!(u8, u64_value, read_u8);
impl_int!(u16, u64_value, read_u16);
impl_int!(u32, u64_value, read_u32);
impl_int!(u64, u64_value, read_u64);
impl_int!(i8, i64_value, read_i8);
impl_int!(i16, i64_value, read_i16);
impl_int!(i32, i64_value, read_i32);
impl_int!(i64, i64_value, read_i64);

impl CborEncode for bool {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.bool(*self)
    }
}
impl<'de> CborDecode<'de> for bool {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        dec.read_bool()
    }
}
impl CborArrayElem for bool {}

impl CborEncode for f64 {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.f64_value(*self)
    }
}
impl<'de> CborDecode<'de> for f64 {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        dec.read_f64()
    }
}
impl CborArrayElem for f64 {}

impl CborEncode for f32 {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.f64_value(f64::from(*self))
    }
}
impl<'de> CborDecode<'de> for f32 {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        let off = dec.position();
        let v = dec.read_f64()?;
        let narrowed = v as f32;
        // Reject silently-lossy narrowing: NaN always narrows to NaN, but any
        // other double whose f32 round-trip doesn't recover the same bits
        // (including finite values that overflow to +-inf) is out of range.
        if narrowed.is_nan() {
            if !v.is_nan() {
                return Err(CborError::new(ErrorCode::IntegerOutOfRange, off));
            }
        } else if f64::from(narrowed) != v {
            return Err(CborError::new(ErrorCode::IntegerOutOfRange, off));
        }
        Ok(narrowed)
    }
}
impl CborArrayElem for f32 {}

impl CborEncode for str {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.text(self)
    }
}
impl CborArrayElem for &str {}

#[cfg(feature = "alloc")]
impl CborEncode for String {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.text(self)
    }
}
#[cfg(feature = "alloc")]
impl<'de> CborDecode<'de> for String {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        dec.read_text_owned()
    }
}
#[cfg(feature = "alloc")]
impl CborArrayElem for String {}

/// A newtype that always binds to CBOR major type 2 (byte string), since a
/// bare `Vec<u8>`/`[u8]` encodes as an array of small integers like any
/// other `Vec<T>`; use `ByteString` when byte-string wire semantics are
/// wanted.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteString(pub Vec<u8>);

#[cfg(feature = "alloc")]
impl CborEncode for ByteString {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.bytes(&self.0)
    }
}
#[cfg(feature = "alloc")]
impl<'de> CborDecode<'de> for ByteString {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        dec.read_bytes_owned().map(ByteString)
    }
}
#[cfg(feature = "alloc")]
impl CborArrayElem for ByteString {}

#[cfg(feature = "alloc")]
impl<T: CborEncode> CborEncode for Option<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        match self {
            Some(v) => v.encode(enc),
            None => enc.null(),
        }
    }
}
#[cfg(feature = "alloc")]
impl<'de, T: CborDecode<'de>> CborDecode<'de> for Option<T> {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        if dec.peek_is_null()? {
            dec.read_null()?;
            Ok(None)
        } else {
            T::decode(dec).map(Some)
        }
    }
}
#[cfg(feature = "alloc")]
impl<T: CborArrayElem> CborArrayElem for Option<T> {}

#[cfg(feature = "alloc")]
impl<T: CborEncode> CborEncode for Box<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        (**self).encode(enc)
    }
}
#[cfg(feature = "alloc")]
impl<'de, T: CborDecode<'de>> CborDecode<'de> for Box<T> {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        T::decode(dec).map(Box::new)
    }
}
#[cfg(feature = "alloc")]
impl<T: CborArrayElem> CborArrayElem for Box<T> {}

#[cfg(feature = "alloc")]
impl<T: CborEncode + CborArrayElem> CborEncode for Vec<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        let len = self.len();
        enc.array(len, |a| {
            for item in self {
                a.value(item)?;
            }
            Ok(())
        })
    }
}
#[cfg(feature = "alloc")]
impl<'de, T: CborDecode<'de> + CborArrayElem> CborDecode<'de> for Vec<T> {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        dec.read_array(|a| {
            let mut out = Vec::new();
            while let Some(()) = a.next_if_any()? {
                out.try_reserve(1).map_err(|_| crate::alloc_util::alloc_failed(0))?;
                out.push(a.value()?);
            }
            Ok(out)
        })
    }
}
#[cfg(feature = "alloc")]
impl<T: CborArrayElem> CborArrayElem for Vec<T> {}

#[cfg(feature = "alloc")]
impl CborArrayElem for crate::value::BigInt {}
#[cfg(feature = "alloc")]
impl CborArrayElem for crate::value::Value {}

#[cfg(feature = "alloc")]
impl CborEncode for crate::value::BigInt {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.bigint(self)
    }
}
#[cfg(feature = "alloc")]
impl<'de> CborDecode<'de> for crate::value::BigInt {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        dec.read_bigint()
    }
}

#[cfg(feature = "alloc")]
impl CborEncode for crate::value::Value {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.value_dyn(self)
    }
}
#[cfg(feature = "alloc")]
impl<'de> CborDecode<'de> for crate::value::Value {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        dec.read_value()
    }
}
