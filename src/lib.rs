//! # cbor-codec
//!
//! RFC 7049/8949 CBOR: a well-formedness validator, a canonical streaming
//! encoder/decoder, a compile-time struct/enum binding layer via
//! `#[derive(CborEncode, CborDecode)]`, a tag registry, and an RFC 8949 §8
//! diagnostic-notation printer.
//!
//! ## Modules
//!
//! - [`mod@wire`] / [`scanner`] — byte-level head reading and single-pass
//!   well-formedness validation ([`validate`]).
//! - [`decode`] / [`encode`] — streaming typed decode/encode
//!   ([`decode_from_slice`] / [`encode_to_vec`]).
//! - [`descriptor`] — the compile-time struct/enum binding
//!   `#[derive(CborEncode, CborDecode)]` generates.
//! - [`tag`] / [`time`] — the tag registry and built-in time/bignum tag
//!   bindings.
//! - [`diag`] — RFC 8949 §8 diagnostic notation ([`diagnose`] /
//!   [`diagnose_first`]).
//! - [`mode`] — immutable, validating option builders
//!   (`DecodeMode`/`EncodeMode`/`DiagnoseMode`) every operation above is
//!   configured through.
//! - [`value`] — the generic [`Value`] tree for callers without a static
//!   destination type.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CborError`].
//! - `alloc` *(default)*: enables the owned [`Value`] tree, streaming
//!   encoder/decoder, and derive support. Without it only [`validate`] is
//!   available.
//! - `simdutf8` *(default)*: SIMD-accelerated UTF-8 validation.
//! - `log`: routes decode/encode/validate failures through the `log` facade
//!   at `debug` level, for callers that want failures visible in their
//!   application's logs without the crate choosing a logging framework for
//!   them. Off by default.
//! - `unchecked-utf8`: skip re-validating UTF-8 that a prior [`validate`]
//!   pass already confirmed well-formed (unsafe).
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible given an allocator: every operation
//! (including [`validate`]) builds a [`mode::DecodeMode`], which carries a
//! tag registry keyed by type, so all of it requires `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "unchecked-utf8"), forbid(unsafe_code))]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod alloc_util;
mod error;
mod limits;
mod order;
pub(crate) mod utf8;
mod wire;

#[cfg(feature = "alloc")]
mod codec;
#[cfg(feature = "alloc")]
mod decode;
#[cfg(feature = "alloc")]
mod descriptor;
#[cfg(feature = "alloc")]
mod diag;
#[cfg(feature = "alloc")]
mod encode;
#[cfg(feature = "alloc")]
mod float;
#[cfg(feature = "alloc")]
mod int;
#[cfg(feature = "alloc")]
mod mode;
#[cfg(feature = "alloc")]
mod scanner;
#[cfg(feature = "alloc")]
mod tag;
#[cfg(feature = "alloc")]
mod time;
#[cfg(feature = "alloc")]
mod value;

pub use crate::error::{CborError, ErrorCode, ErrorContext};
pub use crate::limits::DecodeLimits;
pub use crate::order::KeyOrder;

#[cfg(feature = "alloc")]
pub use crate::codec::{ByteString, CborArrayElem, CborDecode, CborEncode};
#[cfg(feature = "alloc")]
pub use crate::decode::{decode_from_slice, ArrayDecoder, Decoder, MapDecoder};
#[cfg(feature = "alloc")]
pub use crate::descriptor::{
    CborEmbed, CborStruct, FieldDescriptor, FieldKey, Layout, RecordDescriptor,
};
#[cfg(feature = "alloc")]
pub use crate::diag::{diagnose_first, diagnose_value};
#[cfg(feature = "alloc")]
pub use crate::encode::{
    encode_to_vec, ArrayEncoder, Encoder, IndefiniteArrayEncoder, IndefiniteBytesEncoder,
    IndefiniteMapEncoder, IndefiniteTextEncoder, MapEncoder,
};
#[cfg(feature = "alloc")]
pub use crate::mode::{
    ByteStringEncoding, DecodeMode, DecodeModeBuilder, DefaultMapType, DiagnoseMode,
    DiagnoseModeBuilder, EncodeMode, EncodeModeBuilder, EncodeTimeTag, IndefiniteLength,
    IntegerDecoding, TagPolicyMode, TimeTagMode, Utf8Policy,
};
#[cfg(feature = "alloc")]
pub use crate::tag::{TagBinding, TagPolicy, TagRegistry};
#[cfg(feature = "alloc")]
pub use crate::time::EpochTime;
#[cfg(feature = "alloc")]
pub use crate::value::{BigInt, RawCbor, Value};

pub use cbor_codec_derive::{CborDecode, CborEncode};

/// Log a `debug`-level record for a failed encode/decode/validate/diagnose
/// call when the `log` feature is enabled; a no-op otherwise. Called from
/// [`encode`]/[`decode`]/[`validate`]/[`diagnose`] so callers who want
/// failures visible in their application logs only need to enable the
/// feature, not sprinkle logging calls of their own around every call site.
#[cfg(all(feature = "log", feature = "alloc"))]
pub(crate) fn log_failure(op: &'static str, err: &CborError) {
    log::debug!("cbor {op} failed: {err}");
}

#[cfg(not(all(feature = "log", feature = "alloc")))]
#[inline]
pub(crate) const fn log_failure(_op: &'static str, _err: &CborError) {}

/// Encode a [`CborEncode`] value to a fresh byte vector under `mode`.
///
/// # Errors
///
/// Returns an error if encoding fails.
#[cfg(feature = "alloc")]
pub fn encode<T: CborEncode>(value: &T, mode: &EncodeMode) -> Result<alloc::vec::Vec<u8>, CborError> {
    crate::encode::encode_to_vec(value, mode).map_err(|e| {
        log_failure("encode", &e);
        e
    })
}

/// Decode a [`CborDecode`] value from `bytes`, requiring it to contain
/// exactly one well-formed CBOR item under `mode`.
///
/// # Errors
///
/// Returns an error if `bytes` is not a single well-formed item, or if
/// decoding into `T` fails.
#[cfg(feature = "alloc")]
pub fn decode<'de, T: CborDecode<'de>>(bytes: &'de [u8], mode: &'de DecodeMode) -> Result<T, CborError> {
    crate::decode::decode_from_slice(bytes, mode).map_err(|e| {
        log_failure("decode", &e);
        e
    })
}

/// Validate that `bytes` contains exactly one well-formed CBOR item under
/// `mode`, returning its byte length.
///
/// # Errors
///
/// Returns the specific [`ErrorCode`] for the first well-formedness
/// violation encountered.
#[cfg(feature = "alloc")]
pub fn validate(bytes: &[u8], mode: &DecodeMode) -> Result<usize, CborError> {
    crate::scanner::validate_item(bytes, mode).map_err(|e| {
        log_failure("validate", &e);
        e
    })
}

/// Render `bytes` (exactly one well-formed CBOR item) as RFC 8949 §8
/// diagnostic notation.
///
/// # Errors
///
/// Returns an error if `bytes` is not a single well-formed item under the
/// mode's decode-side options.
#[cfg(feature = "alloc")]
pub fn diagnose(bytes: &[u8], mode: &DiagnoseMode) -> Result<alloc::string::String, CborError> {
    crate::diag::diagnose(bytes, mode).map_err(|e| {
        log_failure("diagnose", &e);
        e
    })
}
