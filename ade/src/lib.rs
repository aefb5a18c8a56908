//! Atom tree, binary framer, textual transcription codec, and path
//! evaluator for the ADE AtomContainer format.
//!
//! Built on top of [`ade_types`], which owns the closed type registry and
//! the typed value codec; this crate adds the tree (`Atom`), the two wire
//! codecs (`binary`, `text`), and the XPath-subset path evaluator (`path`).

pub mod atom;
pub mod binary;
pub mod error;
pub mod path;
pub mod text;

pub use ade_types::{AtomValue, CodecError, TypeCode, TypeDescriptor, TypeRegistry, Width};

pub use atom::{Atom, Descendants};
pub use binary::{decode_binary, decode_binary_strict, decode_hex_wrapped, encode_binary};
pub use error::{AtomError, DecodeError, EncodeError, TextError};
pub use path::PathError;
pub use text::{decode_text, encode_text};

/// Construct an atom with the given name and type, initialized to that
/// type's canonical default value (spec.md §6 `new_atom`, `optional_value`
/// omitted).
pub fn new_atom(name: &str, type_code: TypeCode) -> Result<Atom, CodecError> {
    Atom::new(name, type_code)
}

/// As [`new_atom`], but parses `initial_value` as the type's canonical
/// text-form literal (spec.md §6 `new_atom(name, type, optional_value)`
/// with a value supplied).
pub fn new_atom_with_value(
    name: &str,
    type_code: TypeCode,
    initial_value: &str,
) -> Result<Atom, CodecError> {
    Atom::new_with_text(name, type_code, initial_value)
}
