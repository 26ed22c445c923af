//! Type descriptor cache: component C (`SPEC_FULL.md` 4.C).
//!
//! Resolved Open Question: descriptors are produced at **compile time** by
//! `#[derive(CborEncode, CborDecode)]` as a `const DESCRIPTOR` associated
//! item, not built lazily behind a runtime cache. The compiler builds the
//! table once per type; every mode built at runtime borrows the same
//! `'static` table, which satisfies "build once, retain for the life of the
//! mode" without any interior mutability.

/// How a struct's fields are laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Fields are encoded as a CBOR map keyed by name (or `keyasint` index).
    Map,
    /// Fields are encoded as a CBOR array in declaration order
    /// (`#[cbor(toarray)]`).
    Array,
}

/// The wire key a field binds to.
#[derive(Debug, Clone, Copy)]
pub enum FieldKey {
    Text(&'static str),
    Int(i64),
}

/// Per-field metadata built by the derive macro.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub rust_name: &'static str,
    pub key: FieldKey,
    /// Secondary key accepted on decode for backward-compatible renames,
    /// tried if `key` does not match (primary/secondary key precedence).
    pub alt_key: Option<FieldKey>,
    pub omit_if_default: bool,
    pub embedded: bool,
}

/// The compile-time descriptor for a struct's CBOR binding, exposed as a
/// `'static const` by `#[derive(CborEncode, CborDecode)]` via the
/// [`CborStruct`] trait.
#[derive(Debug, Clone, Copy)]
pub struct RecordDescriptor {
    pub type_name: &'static str,
    pub layout: Layout,
    pub fields: &'static [FieldDescriptor],
    /// `true` if an unrecognized map key should be rejected rather than
    /// skipped, for destinations that opt into `#[cbor(deny_unknown)]`.
    pub deny_unknown_fields: bool,
}

/// Implemented by types with a compile-time-known CBOR record layout.
/// `#[derive(CborEncode, CborDecode)]` on a struct/enum generates this impl
/// alongside the `CborEncode`/`CborDecode` impls themselves.
pub trait CborStruct {
    const DESCRIPTOR: RecordDescriptor;
}

/// Implemented by every map-layout `#[derive(CborEncode)]` struct so a
/// parent struct's `#[cbor(embed)]` field can splice its entries directly
/// into the parent's own map instead of nesting them under one key.
pub trait CborEmbed {
    /// This value's own entries, each key/value already reduced to a
    /// generic [`crate::value::Value`] so the parent can merge them with its
    /// own entries and re-sort the combined set against the active
    /// [`crate::mode::EncodeMode`] before writing a single map.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`crate::codec::CborEncode::encode`].
    fn embed_entries(
        &self,
        mode: &crate::mode::EncodeMode,
    ) -> Result<alloc::vec::Vec<(crate::value::Value, crate::value::Value)>, crate::error::CborError>;
}
