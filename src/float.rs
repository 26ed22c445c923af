//! Float canonicalization and width-shrinking helpers.
//!
//! CBOR represents floats in one of three IEEE 754 widths (half/single/
//! double, major type 7, AI 25/26/27). Decode always lifts to `f64`; encode
//! optionally shrinks to the narrowest width that round-trips exactly.

use half::f16;

pub const CANONICAL_NAN_BITS_F64: u64 = 0x7ff8_0000_0000_0000;
const EXP_MASK_F64: u64 = 0x7ff0_0000_0000_0000;
const MANT_MASK_F64: u64 = 0x000f_ffff_ffff_ffff;

/// Canonicalize the bit pattern of a decoded `f64`: any NaN payload collapses
/// to the single canonical quiet NaN, matching the "preferred serialization"
/// guidance in RFC 8949 §4.2.2 (decode side only; encode preserves whatever
/// the caller's value is, including non-canonical NaNs, unless the mode asks
/// to canonicalize on output too).
#[must_use]
pub fn canonicalize_nan(bits: u64) -> u64 {
    let is_nan = (bits & EXP_MASK_F64) == EXP_MASK_F64 && (bits & MANT_MASK_F64) != 0;
    if is_nan {
        CANONICAL_NAN_BITS_F64
    } else {
        bits
    }
}

/// The narrowest CBOR float width that exactly represents `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    Half,
    Single,
    Double,
}

/// Find the narrowest width for `v` that round-trips to the same `f64` bit
/// pattern, for the encoder's optional float-shrinking mode.
#[must_use]
pub fn narrowest_width(v: f64) -> FloatWidth {
    if v.is_nan() {
        return FloatWidth::Half;
    }
    let as_f16 = f16::from_f64(v);
    if f64::from(as_f16).to_bits() == v.to_bits() {
        return FloatWidth::Half;
    }
    let as_f32 = v as f32;
    if f64::from(as_f32).to_bits() == v.to_bits() {
        return FloatWidth::Single;
    }
    FloatWidth::Double
}

#[must_use]
pub fn f64_from_f16_bits(bits: u16) -> f64 {
    f64::from(f16::from_bits(bits))
}

#[must_use]
pub fn f16_bits_from_f64(v: f64) -> u16 {
    f16::from_f64(v).to_bits()
}
