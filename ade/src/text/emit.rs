//! Depth-first preorder emitter for the textual transcription
//! (spec.md §4.5 "Emission").

use crate::atom::Atom;

const INDENT_WIDTH: usize = 4;

pub(super) fn emit(atom: &Atom) -> Vec<u8> {
    let mut out = String::new();
    emit_atom(atom, 0, &mut out);
    out.into_bytes()
}

fn emit_atom(atom: &Atom, depth: usize, out: &mut String) {
    let indent = " ".repeat(depth * INDENT_WIDTH);
    if atom.type_code().is_container() {
        out.push_str(&indent);
        out.push_str(&atom.name());
        out.push(':');
        out.push_str(&atom.type_code().to_string());
        out.push_str(":\n");
        for child in atom.children() {
            emit_atom(child, depth + 1, out);
        }
        out.push_str(&indent);
        out.push_str("END\n");
    } else {
        out.push_str(&indent);
        out.push_str(&atom.name());
        out.push(':');
        out.push_str(&atom.type_code().to_string());
        out.push(':');
        out.push_str(&atom.value().to_text());
        out.push('\n');
    }
}
