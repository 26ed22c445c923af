use crate::error::{CborError, ErrorCode};

/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;
/// Hard ceiling on nesting depth a mode may configure.
pub const MAX_ALLOWED_DEPTH: usize = 65_535;
/// Floor on nesting depth a mode may configure.
pub const MIN_ALLOWED_DEPTH: usize = 4;

/// Default maximum element/pair count for arrays and maps.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 16;

/// Resource limits enforced while validating or decoding a CBOR item.
///
/// Limits are enforced deterministically, purely as a function of the bytes
/// already consumed; nothing here depends on wall-clock time or background
/// timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum nesting depth (arrays/maps/tags combined).
    pub max_depth: usize,
    /// Maximum number of array elements in any single array.
    pub max_array_elements: usize,
    /// Maximum number of map pairs in any single map.
    pub max_map_pairs: usize,
    /// Maximum byte-string length (also applies to bignum magnitudes).
    pub max_bytes_len: usize,
    /// Maximum text-string length in UTF-8 bytes.
    pub max_text_len: usize,
    /// Maximum total input length accepted.
    pub max_input_bytes: usize,
}

impl DecodeLimits {
    /// Conservative limits derived from a maximum message size, matching
    /// RFC 8949's non-normative "sane default" guidance.
    #[must_use]
    pub fn for_bytes(max_message_bytes: usize) -> Self {
        let max_container_len = max_message_bytes.min(DEFAULT_MAX_CONTAINER_LEN);
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_elements: max_container_len,
            max_map_pairs: max_container_len,
            max_bytes_len: max_message_bytes,
            max_text_len: max_message_bytes,
            max_input_bytes: max_message_bytes,
        }
    }

    /// Validate that these limits are internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidOption`] if `max_depth` falls outside
    /// `[MIN_ALLOWED_DEPTH, MAX_ALLOWED_DEPTH]`.
    pub const fn validate(self) -> Result<Self, CborError> {
        if self.max_depth < MIN_ALLOWED_DEPTH || self.max_depth > MAX_ALLOWED_DEPTH {
            return Err(CborError::new(ErrorCode::InvalidOption, 0));
        }
        Ok(self)
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::for_bytes(DEFAULT_MAX_CONTAINER_LEN)
    }
}
