use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// SerialError

/// Errors reported by descriptors, the resolver and the value serializers.
///
/// Format-level failures (malformed input, type mismatches on the wire) are reported
/// through the format's own error type instead. When one of these errors surfaces
/// during encoding or decoding it is converted with the format's `custom`
/// constructor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SerialError {
    /// A name-keyed lookup did not match any element.
    #[error("descriptor `{descriptor}` does not contain element with name `{name}`")]
    UnknownElement { descriptor: String, name: String },

    /// An element carries more than one annotation of a kind that allows one.
    #[error(
        "element {index} of descriptor `{descriptor}` has duplicate annotations of kind `{annotation}`"
    )]
    DuplicateAnnotation {
        annotation: &'static str,
        descriptor: String,
        index: usize,
    },

    /// The type description names nothing the resolver can serialize.
    #[error("no serializer found for type `{ty}`")]
    NoSerializer { ty: String },

    /// A user type was instantiated with the wrong number of type arguments.
    #[error("type `{ty}` expects {expected} type arguments, found {found}")]
    ArityMismatch {
        ty: String,
        expected: usize,
        found: usize,
    },

    /// A required record field was absent from the input.
    #[error("missing field `{field}` while decoding `{descriptor}`")]
    MissingField { descriptor: String, field: String },

    /// A value of the wrong shape was handed to a serializer.
    #[error("expected {expected} value, found {found}")]
    ValueMismatch {
        expected: String,
        found: &'static str,
    },
}
