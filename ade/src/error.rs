//! Crate-level error enums (spec.md §7). Each composes
//! [`ade_types::CodecError`] via `#[from]` rather than erasing it, the way
//! `fuel-vm::error::InterpreterError` composes lower-level validation
//! errors.

use ade_types::CodecError;
use thiserror::Error;

/// `add_child` called on a non-container atom.
#[derive(Debug, Error, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomError {
    #[error("wrong parent type: cannot add a child to an atom of type {type_code}")]
    WrongParentType { type_code: String },
}

/// Errors raised while decoding a binary frame stream (spec.md §4.4, §7).
#[derive(Debug, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// The stream ended before `length` bytes of an atom were available.
    #[error("short read: expected {want} more bytes, stream had {got}")]
    ShortRead { want: usize, got: usize },

    /// A frame's declared length is below the 12-byte header minimum.
    #[error("frame length too small: {length} (minimum 12)")]
    LengthTooSmall { length: u32 },

    /// A container's payload had bytes left over, or ended mid-child.
    #[error("nesting error: {0}")]
    Nesting(String),

    /// Strict-mode decoding encountered a type code outside the closed set.
    #[error("unknown type code {type_code} (strict mode)")]
    UnknownType { type_code: String },

    /// The payload bytes were malformed for their declared type.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The hex wrapper's input was not valid hex.
    #[error("invalid hex input: {0}")]
    InvalidHex(String),
}

/// Errors raised while encoding a tree to a binary frame stream.
#[derive(Debug, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodeError {
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors raised while lexing or parsing the textual transcription
/// (spec.md §4.5, §7).
#[derive(Debug, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextError {
    /// The lexer rejected the input; carries the line number and message.
    #[error("lex error at line {line}: {message}")]
    Lex { line: usize, message: String },

    /// The parser rejected the token stream; carries the line number.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// `END` encountered with no open container to close.
    #[error("parse error at line {line}: unmatched END")]
    UnmatchedEnd { line: usize },

    /// End of input reached with containers still open.
    #[error("parse error: {count} container(s) left unclosed at end of input")]
    UnclosedContainers { count: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Atom(#[from] AtomError),
}
