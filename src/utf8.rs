//! UTF-8 validation for CBOR text strings.
//!
//! Two entry points: [`validate`] always checks, using `simdutf8` when the
//! `simdutf8` feature is enabled; [`trusted`] skips the check under the
//! `unchecked-utf8` feature (only meaningful once a caller has independently
//! established the bytes are well-formed, e.g. they came from [`validate`]
//! earlier in the same pass) and otherwise falls back to [`validate`].

#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

/// Validate `bytes` as UTF-8, returning a borrowed `&str` on success.
#[inline]
pub fn validate(bytes: &[u8]) -> Result<&str, ()> {
    #[cfg(feature = "simdutf8")]
    {
        simd_utf8::from_utf8(bytes).map_err(|_| ())
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).map_err(|_| ())
    }
}

/// Return a `&str` from bytes a caller has already established are valid
/// UTF-8. Under `feature = "unchecked-utf8"` this skips the scan; otherwise
/// it validates like [`validate`].
#[cfg(feature = "unchecked-utf8")]
#[inline]
#[allow(clippy::missing_const_for_fn)]
pub fn trusted(bytes: &[u8]) -> Result<&str, ()> {
    // Safety: callers only pass bytes already validated by `validate`.
    Ok(unsafe { core::str::from_utf8_unchecked(bytes) })
}

/// Return a `&str` from bytes a caller has already established are valid
/// UTF-8, re-validating since `unchecked-utf8` is not enabled.
#[cfg(not(feature = "unchecked-utf8"))]
#[inline]
pub fn trusted(bytes: &[u8]) -> Result<&str, ()> {
    validate(bytes)
}

/// Decode `bytes` lossily, replacing invalid sequences with U+FFFD, for the
/// `utf8 = decode_invalid` mode option.
#[cfg(feature = "alloc")]
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> alloc::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

#[cfg(feature = "alloc")]
use alloc::string::String;
