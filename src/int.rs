//! Integer and bignum helpers shared by the encoder and decoder.

use alloc::vec::Vec;

use crate::alloc_util::alloc_failed;
use crate::error::{CborError, ErrorCode};

/// Strip leading zero bytes from a big-endian magnitude, erroring if the
/// result would be empty (a bignum of magnitude zero is not canonical: use
/// a plain integer `0` instead).
pub fn normalize_magnitude(bytes: &[u8], offset: usize) -> Result<Vec<u8>, CborError> {
    let leading = bytes.iter().take_while(|&&b| b == 0).count();
    let trimmed = &bytes[leading..];
    if trimmed.is_empty() {
        return Err(CborError::new(ErrorCode::BignumNotCanonical, offset));
    }
    let mut out = Vec::new();
    out.try_reserve_exact(trimmed.len())
        .map_err(|_| alloc_failed(offset))?;
    out.extend_from_slice(trimmed);
    Ok(out)
}

/// Extract the canonical big-endian magnitude of a `u128`.
pub fn magnitude_from_u128(n: u128, offset: usize) -> Result<Vec<u8>, CborError> {
    if n == 0 {
        return Err(CborError::new(ErrorCode::BignumNotCanonical, offset));
    }
    let leading = (n.leading_zeros() / 8) as usize;
    let raw = n.to_be_bytes();
    let mut out = Vec::new();
    out.try_reserve_exact(raw.len() - leading)
        .map_err(|_| alloc_failed(offset))?;
    out.extend_from_slice(&raw[leading..]);
    Ok(out)
}

/// Compare two big-endian magnitudes of possibly different lengths.
#[must_use]
pub fn cmp_magnitude(a: &[u8], b: &[u8]) -> core::cmp::Ordering {
    match a.len().cmp(&b.len()) {
        core::cmp::Ordering::Equal => a.cmp(b),
        other => other,
    }
}

/// Try to narrow a big-endian magnitude plus sign into an `i64`, for
/// decoding tag-2/3 bignums into a plain integer destination when they fit.
#[must_use]
pub fn try_narrow_to_i64(negative: bool, magnitude: &[u8]) -> Option<i64> {
    if magnitude.len() > 8 {
        return None;
    }
    let mut buf = [0u8; 8];
    buf[8 - magnitude.len()..].copy_from_slice(magnitude);
    let mag = u64::from_be_bytes(buf);
    let value: i128 = if negative {
        -1_i128 - i128::from(mag)
    } else {
        i128::from(mag)
    };
    i64::try_from(value).ok()
}
