//! Option/mode builders: component H (`SPEC_FULL.md` 4.H).
//!
//! `DecodeMode`/`EncodeMode`/`DiagnoseMode` are immutable, `Clone + Send +
//! Sync` value types built once via a validating builder, mirroring the
//! teacher's `CborLimits::new`/`DecodeLimits::for_bytes` pattern
//! (`limits.rs`) generalized to the full option set.

use crate::error::{CborError, ErrorCode};
use crate::limits::DecodeLimits;
use crate::order::KeyOrder;
use crate::tag::{self, TagRegistry};

/// How indefinite-length containers/strings are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndefiniteLength {
    #[default]
    Forbidden,
    Allowed,
}

/// How tags are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagPolicyMode {
    #[default]
    Allowed,
    Forbidden,
}

/// How invalid UTF-8 in text strings is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Utf8Policy {
    #[default]
    RejectInvalid,
    DecodeInvalid,
}

/// How a time destination (`crate::time::EpochTime`) handles its CBOR tag
/// on decode. Distinct from [`crate::tag::TagPolicy`]: that enum governs
/// which tag numbers the registry binds to a type, this governs how
/// strictly that binding is enforced for the time destination specifically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeTagMode {
    /// Accept any registered time tag, or no tag at all, without checking
    /// that a present tag is one of the registered numbers.
    #[default]
    Ignored,
    /// Accept a registered tag or no tag; a present but unregistered tag
    /// number is `TagPayloadMismatch`.
    Optional,
    /// A registered tag must be present; an untagged value is `TagRequired`.
    Required,
}

/// How a time destination is emitted on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeTimeTag {
    /// Emit a bare numeric epoch-seconds value, untagged.
    #[default]
    None,
    /// Wrap in the registered text-time tag as an RFC 3339 string.
    Tag0Rfc3339,
    /// Wrap in the registered epoch-time tag as a numeric value.
    Tag1Epoch,
}

/// How an out-of-`i64`/`u64`-range major-0/1 integer is decoded into a
/// generic destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegerDecoding {
    /// Values that fit `u64` decode as unsigned, values that fit `i64` but
    /// not `u64` decode as signed, anything larger promotes to `BigInt`.
    #[default]
    PreferUnsignedThenSigned,
    /// Always decode as signed; a major-0 value exceeding `i64::MAX` is
    /// `IntegerOutOfRange` rather than promoted to `BigInt`.
    AlwaysSignedWithOverflowError,
}

/// Which mapping representation an untyped (`Value`) decode uses for CBOR
/// maps. This crate has one: an order-preserving vector of pairs, since
/// [`crate::value::Value`]'s equality already treats maps as
/// order-independent. The option exists to satisfy `SPEC_FULL.md` §6's
/// enumerated option set and is reserved for a future keyed representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultMapType {
    #[default]
    VecOfPairs,
}

/// Immutable configuration for [`crate::decode`]/[`crate::scanner`].
#[derive(Clone)]
pub struct DecodeMode {
    pub(crate) limits: DecodeLimits,
    pub(crate) indefinite_length: IndefiniteLength,
    pub(crate) tags: TagPolicyMode,
    pub(crate) utf8: Utf8Policy,
    pub(crate) key_order: KeyOrder,
    pub(crate) duplicate_keys_reject: bool,
    pub(crate) time_tag: TimeTagMode,
    pub(crate) integer_decoding: IntegerDecoding,
    pub(crate) default_map_type: DefaultMapType,
    pub(crate) registry: TagRegistry,
}

impl DecodeMode {
    #[must_use]
    pub fn builder() -> DecodeModeBuilder {
        DecodeModeBuilder::default()
    }

    #[must_use]
    pub const fn limits(&self) -> DecodeLimits {
        self.limits
    }

    #[must_use]
    pub const fn default_map_type(&self) -> DefaultMapType {
        self.default_map_type
    }
}

impl Default for DecodeMode {
    fn default() -> Self {
        Self::builder().build().expect("default limits are valid")
    }
}

/// Builder for [`DecodeMode`].
pub struct DecodeModeBuilder {
    limits: DecodeLimits,
    indefinite_length: IndefiniteLength,
    tags: TagPolicyMode,
    utf8: Utf8Policy,
    key_order: KeyOrder,
    duplicate_keys_reject: bool,
    time_tag: TimeTagMode,
    integer_decoding: IntegerDecoding,
    default_map_type: DefaultMapType,
}

impl Default for DecodeModeBuilder {
    fn default() -> Self {
        Self {
            limits: DecodeLimits::default(),
            indefinite_length: IndefiniteLength::default(),
            tags: TagPolicyMode::default(),
            utf8: Utf8Policy::default(),
            key_order: KeyOrder::default(),
            duplicate_keys_reject: true,
            time_tag: TimeTagMode::default(),
            integer_decoding: IntegerDecoding::default(),
            default_map_type: DefaultMapType::default(),
        }
    }
}

impl DecodeModeBuilder {
    #[must_use]
    pub const fn limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub const fn indefinite_length(mut self, v: IndefiniteLength) -> Self {
        self.indefinite_length = v;
        self
    }

    #[must_use]
    pub const fn tags(mut self, v: TagPolicyMode) -> Self {
        self.tags = v;
        self
    }

    #[must_use]
    pub const fn utf8(mut self, v: Utf8Policy) -> Self {
        self.utf8 = v;
        self
    }

    #[must_use]
    pub const fn key_order(mut self, v: KeyOrder) -> Self {
        self.key_order = v;
        self
    }

    #[must_use]
    pub const fn duplicate_keys_reject(mut self, v: bool) -> Self {
        self.duplicate_keys_reject = v;
        self
    }

    #[must_use]
    pub const fn time_tag(mut self, v: TimeTagMode) -> Self {
        self.time_tag = v;
        self
    }

    #[must_use]
    pub const fn integer_decoding(mut self, v: IntegerDecoding) -> Self {
        self.integer_decoding = v;
        self
    }

    #[must_use]
    pub const fn default_map_type(mut self, v: DefaultMapType) -> Self {
        self.default_map_type = v;
        self
    }

    /// Validate and construct the mode.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidOption`] if the configured limits are
    /// inconsistent.
    pub fn build(self) -> Result<DecodeMode, CborError> {
        let limits = self.limits.validate()?;
        let mut registry = TagRegistry::new();
        tag::install_defaults(&mut registry);
        Ok(DecodeMode {
            limits,
            indefinite_length: self.indefinite_length,
            tags: self.tags,
            utf8: self.utf8,
            key_order: self.key_order,
            duplicate_keys_reject: self.duplicate_keys_reject,
            time_tag: self.time_tag,
            integer_decoding: self.integer_decoding,
            default_map_type: self.default_map_type,
            registry,
        })
    }
}

/// Immutable configuration for [`crate::encode`].
#[derive(Clone)]
pub struct EncodeMode {
    pub(crate) key_order: KeyOrder,
    pub(crate) shrink_floats: bool,
    pub(crate) indefinite_length: IndefiniteLength,
    pub(crate) time_tag: EncodeTimeTag,
    pub(crate) registry: TagRegistry,
}

impl EncodeMode {
    #[must_use]
    pub fn builder() -> EncodeModeBuilder {
        EncodeModeBuilder::default()
    }

    #[must_use]
    pub const fn key_order(&self) -> KeyOrder {
        self.key_order
    }
}

impl Default for EncodeMode {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`EncodeMode`].
pub struct EncodeModeBuilder {
    key_order: KeyOrder,
    shrink_floats: bool,
    indefinite_length: IndefiniteLength,
    time_tag: EncodeTimeTag,
}

impl Default for EncodeModeBuilder {
    fn default() -> Self {
        Self {
            key_order: KeyOrder::LengthFirst,
            shrink_floats: false,
            indefinite_length: IndefiniteLength::Forbidden,
            time_tag: EncodeTimeTag::default(),
        }
    }
}

impl EncodeModeBuilder {
    #[must_use]
    pub const fn key_order(mut self, v: KeyOrder) -> Self {
        self.key_order = v;
        self
    }

    #[must_use]
    pub const fn shrink_floats(mut self, v: bool) -> Self {
        self.shrink_floats = v;
        self
    }

    #[must_use]
    pub const fn indefinite_length(mut self, v: IndefiniteLength) -> Self {
        self.indefinite_length = v;
        self
    }

    #[must_use]
    pub const fn time_tag(mut self, v: EncodeTimeTag) -> Self {
        self.time_tag = v;
        self
    }

    #[must_use]
    pub fn build(self) -> EncodeMode {
        let mut registry = TagRegistry::new();
        tag::install_defaults(&mut registry);
        EncodeMode {
            key_order: self.key_order,
            shrink_floats: self.shrink_floats,
            indefinite_length: self.indefinite_length,
            time_tag: self.time_tag,
            registry,
        }
    }
}

/// How byte strings render in diagnostic notation (RFC 8949 §8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteStringEncoding {
    #[default]
    Base16,
    Base16Ws,
    Base32,
    Base32Hex,
    Base64,
    EmbeddedCbor,
    AsciiIfPrintable,
}

/// Immutable configuration for [`crate::diag`].
#[derive(Clone, Default)]
pub struct DiagnoseMode {
    pub(crate) decode: DecodeModeBuilderSnapshot,
    pub(crate) byte_string_encoding: ByteStringEncoding,
    pub(crate) cbor_sequence: bool,
    pub(crate) float_precision_indicator: bool,
}

/// Cloneable snapshot of the decode-side options diagnostic printing honors
/// (it validates before rendering, so it reuses `DecodeMode`'s option set).
#[derive(Clone, Copy, Default)]
pub struct DecodeModeBuilderSnapshot {
    pub indefinite_length: IndefiniteLength,
    pub tags: TagPolicyMode,
}

impl DiagnoseMode {
    #[must_use]
    pub fn builder() -> DiagnoseModeBuilder {
        DiagnoseModeBuilder::default()
    }
}

/// Builder for [`DiagnoseMode`].
#[derive(Default)]
pub struct DiagnoseModeBuilder {
    indefinite_length: IndefiniteLength,
    tags: TagPolicyMode,
    byte_string_encoding: ByteStringEncoding,
    cbor_sequence: bool,
    float_precision_indicator: bool,
}

impl DiagnoseModeBuilder {
    #[must_use]
    pub const fn indefinite_length(mut self, v: IndefiniteLength) -> Self {
        self.indefinite_length = v;
        self
    }

    #[must_use]
    pub const fn byte_string_encoding(mut self, v: ByteStringEncoding) -> Self {
        self.byte_string_encoding = v;
        self
    }

    #[must_use]
    pub const fn cbor_sequence(mut self, v: bool) -> Self {
        self.cbor_sequence = v;
        self
    }

    #[must_use]
    pub const fn float_precision_indicator(mut self, v: bool) -> Self {
        self.float_precision_indicator = v;
        self
    }

    #[must_use]
    pub fn build(self) -> DiagnoseMode {
        DiagnoseMode {
            decode: DecodeModeBuilderSnapshot {
                indefinite_length: self.indefinite_length,
                tags: self.tags,
            },
            byte_string_encoding: self.byte_string_encoding,
            cbor_sequence: self.cbor_sequence,
            float_precision_indicator: self.float_precision_indicator,
        }
    }
}
