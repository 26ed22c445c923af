//! Tag registry: component F (`SPEC_FULL.md` 4.F).
//!
//! Maps a Rust destination type to the CBOR tag number(s) that bind to it
//! and the policy for requiring/accepting that tag, keyed by
//! [`core::any::TypeId`] so no reflection crate is needed. Built once per
//! [`crate::mode::DecodeMode`]/[`crate::mode::EncodeMode`] and never mutated
//! afterward (see `SPEC_FULL.md` §5).

use alloc::collections::BTreeMap;
use core::any::TypeId;

/// CBOR self-describe tag (RFC 8949 §3.4.6). Always transparent: it never
/// counts against tag-required/tag-forbidden checks (Open Question 2,
/// `SPEC_FULL.md` §9).
pub const TAG_SELF_DESCRIBE: u64 = 55799;

/// Epoch-based date/time (RFC 8949 §3.4.2).
pub const TAG_EPOCH_TIME: u64 = 1;
/// Standard date/time text string (RFC 8949 §3.4.1).
pub const TAG_TEXT_TIME: u64 = 0;
/// Positive bignum (RFC 8949 §3.4.3).
pub const TAG_BIGNUM_POS: u64 = 2;
/// Negative bignum (RFC 8949 §3.4.3).
pub const TAG_BIGNUM_NEG: u64 = 3;

/// How strictly a destination type requires its bound tag to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPolicy {
    /// Encoding always emits the tag.
    EncTagRequired,
    /// Decoding requires the tag to be present.
    DecTagRequired,
    /// Decoding accepts the value with or without the tag.
    DecTagOptional,
}

/// A registered binding between a Rust type and one or more tag numbers.
#[derive(Debug, Clone, Copy)]
pub struct TagBinding {
    pub tags: &'static [u64],
    pub policy: TagPolicy,
}

/// The set of type <-> tag bindings active for a mode.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    by_type: BTreeMap<TypeId, TagBinding>,
}

impl TagRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the binding for `T`.
    pub fn register<T: 'static>(&mut self, binding: TagBinding) {
        self.by_type.insert(TypeId::of::<T>(), binding);
    }

    #[must_use]
    pub fn binding_for<T: 'static>(&self) -> Option<TagBinding> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }
}

/// Install the built-in bindings every mode carries by default: bignum tags
/// and the time tags (`crate::time`).
///
/// `BigInt`'s tags are ordered `[positive, negative]`; `EpochTime`'s are
/// ordered `[text, epoch]`. The encoder/decoder index into these slices by
/// position, so a caller replacing a binding via [`TagRegistry::register`]
/// must preserve that ordering.
pub fn install_defaults(registry: &mut TagRegistry) {
    registry.register::<crate::value::BigInt>(TagBinding {
        tags: &[TAG_BIGNUM_POS, TAG_BIGNUM_NEG],
        policy: TagPolicy::DecTagOptional,
    });
    registry.register::<crate::time::EpochTime>(TagBinding {
        tags: &[TAG_TEXT_TIME, TAG_EPOCH_TIME],
        policy: TagPolicy::DecTagOptional,
    });
}
