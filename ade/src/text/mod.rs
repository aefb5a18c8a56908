//! The textual transcription codec (spec.md §4.5): an indented,
//! line-oriented rendering of an atom tree with `CONT`/`END` delimiters.

mod emit;
mod lexer;
mod parser;

use crate::atom::Atom;
use crate::error::TextError;

/// Parse a single atom tree (exactly one root) from its textual form.
/// Line endings may be CR, LF, or CRLF; the lexer normalizes them all to
/// LF before scanning (spec.md §6).
pub fn decode_text(bytes: &[u8]) -> Result<Atom, TextError> {
    let text = std::str::from_utf8(bytes).map_err(|e| TextError::Lex {
        line: 0,
        message: format!("input is not valid UTF-8: {e}"),
    })?;
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    parser::parse(&normalized)
}

/// Render `atom` (and its descendants) to the indented textual form,
/// always using LF line endings regardless of host platform.
pub fn encode_text(atom: &Atom) -> Vec<u8> {
    emit::emit(atom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ade_types::TypeCode;

    #[test]
    fn empty_container_round_trips() {
        // spec.md §8 scenario 1.
        let atom = Atom::new("SMAL", TypeCode::CONT).unwrap();
        let text = encode_text(&atom);
        assert_eq!(text, b"SMAL:CONT:\nEND\n");
        let decoded = decode_text(&text).unwrap();
        assert_eq!(decoded, atom);
    }

    #[test]
    fn ten_children_emit_in_document_order() {
        // spec.md §8 scenario 2.
        let mut root = Atom::new("ROOT", TypeCode::CONT).unwrap();
        for i in 0..10 {
            let mut child = Atom::new("CHLD", TypeCode::SI32).unwrap();
            child.value_mut().set_from_int64(i).unwrap();
            root.add_child(child).unwrap();
        }
        let text = String::from_utf8(encode_text(&root)).unwrap();
        let mut expected = String::from("ROOT:CONT:\n");
        for i in 0..10 {
            expected.push_str(&format!("    CHLD:SI32:{i}\n"));
        }
        expected.push_str("END\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let text = b"# a comment\nROOT:CONT:\n\n    # nested comment\n    LEAF:NULL:\nEND\n";
        let root = decode_text(text).unwrap();
        assert_eq!(root.name(), "ROOT");
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].name(), "LEAF");
    }

    #[test]
    fn unmatched_end_is_reported() {
        let err = decode_text(b"END\n").unwrap_err();
        assert!(matches!(err, TextError::UnmatchedEnd { line: 1 }));
    }

    #[test]
    fn unclosed_container_is_reported() {
        let err = decode_text(b"ROOT:CONT:\n").unwrap_err();
        assert!(matches!(err, TextError::UnclosedContainers { count: 1 }));
    }

    #[test]
    fn crlf_input_is_normalized() {
        let root = decode_text(b"SMAL:CONT:\r\nEND\r\n").unwrap();
        assert_eq!(root.name(), "SMAL");
    }

    #[test]
    fn re_emission_is_idempotent() {
        let mut root = Atom::new("ROOT", TypeCode::CONT).unwrap();
        let mut leaf = Atom::new("CHLD", TypeCode::SI32).unwrap();
        leaf.value_mut().set_from_int64(-5).unwrap();
        root.add_child(leaf).unwrap();

        let once = encode_text(&root);
        let decoded = decode_text(&once).unwrap();
        let twice = encode_text(&decoded);
        assert_eq!(once, twice);
    }
}
