//! Error kinds raised by the typed codec (spec.md §7).

use thiserror::Error;

/// Errors raised while decoding, encoding, or accessing a typed value.
#[derive(Debug, Error, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodecError {
    /// Payload length does not match the type's declared width.
    #[error("invalid byte count for ADE type {type_code}: want {want}, got {got}")]
    ByteCount {
        type_code: String,
        want: usize,
        got: usize,
    },

    /// A numeric value is outside the type's representable domain.
    #[error("value out of range for ADE type {type_code}: {value}")]
    Range { type_code: String, value: String },

    /// A textual literal failed the type's parse grammar.
    #[error("invalid textual literal for ADE type {type_code}: {literal:?}")]
    InvalidString { type_code: String, literal: String },

    /// A typed accessor was called on an incompatible type.
    #[error("type mismatch: ADE type {type_code} does not support {requested}")]
    TypeMismatch {
        type_code: String,
        requested: String,
    },
}

impl CodecError {
    pub fn byte_count(type_code: impl Into<String>, want: usize, got: usize) -> Self {
        CodecError::ByteCount {
            type_code: type_code.into(),
            want,
            got,
        }
    }

    pub fn range(type_code: impl Into<String>, value: impl std::fmt::Display) -> Self {
        CodecError::Range {
            type_code: type_code.into(),
            value: value.to_string(),
        }
    }

    pub fn invalid_string(type_code: impl Into<String>, literal: impl Into<String>) -> Self {
        CodecError::InvalidString {
            type_code: type_code.into(),
            literal: literal.into(),
        }
    }

    pub fn type_mismatch(type_code: impl Into<String>, requested: impl Into<String>) -> Self {
        CodecError::TypeMismatch {
            type_code: type_code.into(),
            requested: requested.into(),
        }
    }
}
