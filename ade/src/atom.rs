//! [`Atom`]: the tree node owning a name, a typed value, and (for `CONT`
//! atoms) an ordered list of children (spec.md §3, §4.3).

use std::str::FromStr;

use ade_types::{AtomValue, CodecError, TypeCode};

use crate::error::AtomError;
use crate::path::{self, PathError};

/// A node in an ADE atom tree.
///
/// Ownership is strict: a parent owns its children outright, there are no
/// back-pointers and no shared subtrees (spec.md §3 "Ownership &
/// lifecycle"). Cloning an `Atom` deep-copies the whole subtree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    name: [u8; 4],
    value: AtomValue,
    children: Vec<Atom>,
}

impl Atom {
    /// Construct an atom with the given name and type, initialized to that
    /// type's canonical default value (spec.md §4.3's "optional initial
    /// value" with no value supplied).
    pub fn new(name: &str, type_code: TypeCode) -> Result<Self, CodecError> {
        Self::with_value(name, AtomValue::default_for(type_code))
    }

    /// Construct an atom with an explicit initial value.
    pub fn with_value(name: &str, value: AtomValue) -> Result<Self, CodecError> {
        let name = parse_name(name)?;
        Ok(Atom {
            name,
            value,
            children: Vec::new(),
        })
    }

    /// Construct an atom with the given name and type, parsing
    /// `initial_value` as that type's canonical text-form literal
    /// (spec.md §6's `new_atom(name, type, optional_value)`, with the
    /// value supplied as text to mirror `TextCodec`'s own grammar).
    pub fn new_with_text(
        name: &str,
        type_code: TypeCode,
        initial_value: &str,
    ) -> Result<Self, CodecError> {
        let mut value = AtomValue::default_for(type_code);
        value.set_from_text(initial_value)?;
        Self::with_value(name, value)
    }

    /// Construct directly from raw name bytes and a value, skipping text
    /// parsing of the name; used by the binary and text decoders.
    pub fn from_parts(name: [u8; 4], value: AtomValue) -> Self {
        Atom {
            name,
            value,
            children: Vec::new(),
        }
    }

    /// The raw four name bytes.
    pub fn name_bytes(&self) -> [u8; 4] {
        self.name
    }

    /// Canonical string form of the name: four printable ASCII characters,
    /// or `0xHHHHHHHH` when any byte falls outside 0x21-0x7E.
    pub fn name(&self) -> String {
        fourcc_label(self.name)
    }

    /// Raw 32-bit big-endian interpretation of the name.
    pub fn name_as_u32(&self) -> u32 {
        u32::from_be_bytes(self.name)
    }

    pub fn type_code(&self) -> TypeCode {
        self.value.type_code()
    }

    pub fn value(&self) -> &AtomValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut AtomValue {
        &mut self.value
    }

    /// Append `child` to this atom's children. Fails with
    /// [`AtomError::WrongParentType`] unless this atom's type is `CONT`.
    pub fn add_child(&mut self, child: Atom) -> Result<(), AtomError> {
        if !self.type_code().is_container() {
            return Err(AtomError::WrongParentType {
                type_code: self.type_code().label(),
            });
        }
        self.children.push(child);
        Ok(())
    }

    /// Direct children, in document order. Empty for non-containers.
    pub fn children(&self) -> &[Atom] {
        &self.children
    }

    /// Depth-first preorder traversal including the receiver, produced
    /// lazily via an explicit stack (no parent back-pointer is ever
    /// materialized, per spec.md §9's ownership guidance).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Evaluate a path expression rooted at this atom (spec.md §4.6).
    pub fn atoms_at_path(&self, expr: &str) -> Result<Vec<&Atom>, PathError> {
        path::evaluate(self, expr)
    }
}

/// Parses either four printable ASCII bytes or the hex form `0xHHHHHHHH`
/// (spec.md §4.5 "Name parsing"). Name parsing shares its grammar with
/// [`TypeCode::from_str`] exactly, so it is reused rather than duplicated.
fn parse_name(s: &str) -> Result<[u8; 4], CodecError> {
    TypeCode::from_str(s).map(|tc| tc.as_bytes())
}

/// Exposed for other modules (the binary framer, the text emitter) that
/// need to render raw name bytes before an [`Atom`] exists.
pub(crate) fn name_label(bytes: [u8; 4]) -> String {
    fourcc_label(bytes)
}

fn fourcc_label(bytes: [u8; 4]) -> String {
    if bytes.iter().all(|&b| (0x21..=0x7E).contains(&b)) {
        String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| hex_label(bytes))
    } else {
        hex_label(bytes)
    }
}

fn hex_label(bytes: [u8; 4]) -> String {
    format!(
        "0x{:02X}{:02X}{:02X}{:02X}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

impl std::fmt::Display for Atom {
    /// A single `NAME:TYPE:VALUE` line, independent of [`crate::text`]'s
    /// full-tree indentation; convenient for debugging and assertions.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.name(), self.type_code(), self.value.to_text())
    }
}

/// Lazy depth-first preorder iterator over an atom and its descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Atom>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Atom;

    fn next(&mut self) -> Option<Self::Item> {
        let atom = self.stack.pop()?;
        for child in atom.children.iter().rev() {
            self.stack.push(child);
        }
        Some(atom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_atom_round_trips_through_name() {
        let atom = Atom::new("HELO", TypeCode::CONT).unwrap();
        assert_eq!(atom.name(), "HELO");
    }

    #[test]
    fn hex_named_atom_reports_u32() {
        let atom = Atom::new("0x0000FFFF", TypeCode::CONT).unwrap();
        assert_eq!(atom.name(), "0x0000FFFF");
        assert_eq!(atom.name_as_u32(), 65535);
    }

    #[test]
    fn new_with_text_parses_the_initial_value() {
        let atom = Atom::new_with_text("CHLD", TypeCode::SI32, "-5").unwrap();
        assert_eq!(atom.value().get_int64().unwrap(), -5);
    }

    #[test]
    fn new_with_text_rejects_out_of_range_initial_value() {
        let err = Atom::new_with_text("CHLD", TypeCode::UI01, "2").unwrap_err();
        assert!(matches!(err, CodecError::Range { .. }));
    }

    #[test]
    fn add_child_rejects_non_container_parent() {
        let mut leaf = Atom::new("CHLD", TypeCode::SI32).unwrap();
        let grandchild = Atom::new("GCLD", TypeCode::NULL).unwrap();
        let err = leaf.add_child(grandchild).unwrap_err();
        assert!(matches!(err, AtomError::WrongParentType { .. }));
    }

    #[test]
    fn descendants_is_preorder_including_self() {
        let mut root = Atom::new("ROOT", TypeCode::CONT).unwrap();
        let mut one = Atom::new("ONE_", TypeCode::CONT).unwrap();
        one.add_child(Atom::new("LEAF", TypeCode::NULL).unwrap()).unwrap();
        root.add_child(one).unwrap();
        root.add_child(Atom::new("TWO_", TypeCode::NULL).unwrap()).unwrap();

        let names: Vec<String> = root.descendants().map(|a| a.name()).collect();
        assert_eq!(names, vec!["ROOT", "ONE_", "LEAF", "TWO_"]);
    }

    #[test]
    fn structural_equality_ignores_identity() {
        let a = Atom::new("ROOT", TypeCode::CONT).unwrap();
        let b = Atom::new("ROOT", TypeCode::CONT).unwrap();
        assert_eq!(a, b);
    }
}
