use core::fmt;

/// A structured error code identifying why an encode, decode, or validate
/// operation failed.
///
/// Stable and string-free so the crate stays `no_std`-friendly and hot-path
/// friendly; human-readable text lives only in [`CborError`]'s `Display` impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Configured mode/limits are internally inconsistent.
    InvalidOption,

    /// Unexpected end-of-input while decoding.
    UnexpectedEof,
    /// Arithmetic overflow while computing a length/offset.
    LengthOverflow,
    /// Input contains trailing bytes after the single root CBOR data item.
    TrailingBytes,
    /// Memory allocation failed while building an owned value.
    AllocationFailed,
    /// Array builder was closed with fewer or more elements than declared.
    ArrayLenMismatch,
    /// Map builder was closed with fewer or more entries than declared.
    MapLenMismatch,

    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Total item count limit exceeded.
    TotalItemsLimitExceeded,
    /// Array length exceeds the configured limit.
    ArrayLenLimitExceeded,
    /// Map length exceeds the configured limit.
    MapLenLimitExceeded,
    /// Byte string length exceeds the configured limit.
    BytesLenLimitExceeded,
    /// Text string length exceeds the configured limit.
    TextLenLimitExceeded,
    /// Total input length exceeds the configured limit.
    MessageLenLimitExceeded,

    /// A reserved additional-info value (28..30) was used in a head.
    ReservedAdditionalInfo,
    /// Indefinite-length encoding was used where the mode forbids it.
    IndefiniteLengthForbidden,
    /// An indefinite-length byte/text string contained a wrongly-typed or
    /// nested-indefinite chunk.
    IndefiniteChunkInvalid,
    /// A standalone break (0xFF) appeared where no indefinite-length
    /// container was open.
    UnexpectedBreak,
    /// Non-canonical (non-shortest) integer/length encoding was used.
    NonCanonicalEncoding,

    /// Duplicate map key detected.
    DuplicateMapKey,
    /// Map keys are not in the order the mode requires.
    NonCanonicalMapOrder,

    /// A tag was used where the mode forbids tags.
    TagForbidden,
    /// A tag's payload major type does not match what the tag requires.
    TagPayloadMismatch,
    /// A required tag was missing for a destination type that demands one.
    TagRequired,
    /// Bignum magnitude is not canonical (empty, or has a leading zero byte).
    BignumNotCanonical,

    /// Unsupported or reserved CBOR simple value.
    UnsupportedSimpleValue,
    /// Integer value does not fit the decode destination.
    IntegerOutOfRange,

    /// Invalid UTF-8 in a text string and the mode requires rejecting it.
    Utf8Invalid,

    /// Float encoding uses a wider format than the canonical minimal one.
    NonCanonicalFloatWidth,

    /// The destination type does not match the CBOR major type found.
    TypeMismatch,
    /// Required struct field/map key missing from the input.
    MissingField,
    /// Unknown enum variant key/tag.
    UnknownEnumVariant,
    /// Unrecognized field encountered and the mode rejects unknown fields.
    UnknownFieldRejected,

    /// Diagnostic-notation input was malformed.
    DiagnosticSyntax,
}

/// Extra structured context attached to certain errors (primarily
/// [`ErrorCode::TypeMismatch`] and struct decode failures).
///
/// All fields are `&'static str` supplied by hand-written `CborDecode` impls
/// or by the `#[derive(CborDecode)]` macro, so this stays allocation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Name of the Rust type being decoded into, if known.
    pub type_name: Option<&'static str>,
    /// Name of the struct field or enum variant involved, if any.
    pub field_name: Option<&'static str>,
}

impl ErrorContext {
    /// An empty context.
    pub const NONE: Self = Self {
        type_name: None,
        field_name: None,
    };

    /// Context naming only the destination type.
    #[must_use]
    pub const fn of_type(type_name: &'static str) -> Self {
        Self {
            type_name: Some(type_name),
            field_name: None,
        }
    }

    /// Context naming a field of a named destination type.
    #[must_use]
    pub const fn of_field(type_name: &'static str, field_name: &'static str) -> Self {
        Self {
            type_name: Some(type_name),
            field_name: Some(field_name),
        }
    }
}

/// An error produced by encoding, decoding, validating, or diagnosing CBOR.
///
/// Carries a stable [`ErrorCode`], the byte offset where the problem was
/// detected, and optional [`ErrorContext`] naming the destination type/field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset into the input where the error was detected.
    pub offset: usize,
    /// Optional destination-type/field context.
    pub context: ErrorContext,
}

impl CborError {
    /// Construct an error with no extra context.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self {
            code,
            offset,
            context: ErrorContext::NONE,
        }
    }

    /// Construct an error carrying destination-type/field context.
    #[inline]
    #[must_use]
    pub const fn with_context(code: ErrorCode, offset: usize, context: ErrorContext) -> Self {
        Self {
            code,
            offset,
            context,
        }
    }

    /// Attach context to an already-constructed error, if it has none yet.
    #[inline]
    #[must_use]
    pub const fn or_context(mut self, context: ErrorContext) -> Self {
        if self.context.type_name.is_none() {
            self.context = context;
        }
        self
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::InvalidOption => "invalid option/limit configuration",

            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::TrailingBytes => "trailing bytes after single CBOR item",
            ErrorCode::AllocationFailed => "allocation failed",
            ErrorCode::ArrayLenMismatch => "array length mismatch",
            ErrorCode::MapLenMismatch => "map length mismatch",

            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::TotalItemsLimitExceeded => "total items limit exceeded",
            ErrorCode::ArrayLenLimitExceeded => "array length exceeds decode limits",
            ErrorCode::MapLenLimitExceeded => "map length exceeds decode limits",
            ErrorCode::BytesLenLimitExceeded => "byte string length exceeds decode limits",
            ErrorCode::TextLenLimitExceeded => "text string length exceeds decode limits",
            ErrorCode::MessageLenLimitExceeded => "input length exceeds decode limits",

            ErrorCode::ReservedAdditionalInfo => "reserved additional info value",
            ErrorCode::IndefiniteLengthForbidden => "indefinite length forbidden",
            ErrorCode::IndefiniteChunkInvalid => "invalid indefinite-length chunk",
            ErrorCode::UnexpectedBreak => "unexpected break outside indefinite-length container",
            ErrorCode::NonCanonicalEncoding => "non-canonical integer/length encoding",

            ErrorCode::DuplicateMapKey => "duplicate map key",
            ErrorCode::NonCanonicalMapOrder => "map keys are not in the required order",

            ErrorCode::TagForbidden => "tags forbidden by mode",
            ErrorCode::TagPayloadMismatch => "tag payload has the wrong major type",
            ErrorCode::TagRequired => "destination type requires a tag that was not present",
            ErrorCode::BignumNotCanonical => {
                "bignum magnitude must be canonical (non-empty, no leading zero)"
            }

            ErrorCode::UnsupportedSimpleValue => "unsupported CBOR simple value",
            ErrorCode::IntegerOutOfRange => "integer does not fit destination type",

            ErrorCode::Utf8Invalid => "text must be valid UTF-8",

            ErrorCode::NonCanonicalFloatWidth => "float is not encoded in canonical minimal width",

            ErrorCode::TypeMismatch => "CBOR major type does not match destination type",
            ErrorCode::MissingField => "required field missing",
            ErrorCode::UnknownEnumVariant => "unknown enum variant",
            ErrorCode::UnknownFieldRejected => "unknown field rejected by mode",

            ErrorCode::DiagnosticSyntax => "malformed diagnostic notation",
        };

        write!(f, "cbor error at byte {}: {msg}", self.offset)?;
        if let Some(ty) = self.context.type_name {
            write!(f, " (type {ty}")?;
            if let Some(field) = self.context.field_name {
                write!(f, ", field {field}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CborError {}
