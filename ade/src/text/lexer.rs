//! Line-oriented lexer for the textual transcription (spec.md §4.5).
//!
//! The source format runs the lexer and parser as two concurrent tasks
//! over a channel; a single-threaded consumer folds that into a pull-based
//! [`Iterator`] instead (spec.md §9 "Lexer/parser coupling"), with no
//! change in the token-by-token contract. Per-type value grammar (numbers,
//! fractions, UUIDs, escaped strings, hex data, FourCC) is not
//! re-implemented here: it is exactly the canonical text form each type
//! already owns in `ade_types`' registry, so the lexer hands the raw value
//! text to the parser, which hands it to [`ade_types::AtomValue::set_from_text`].

use crate::error::TextError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Atom {
        name: String,
        type_code: String,
        value: String,
    },
    ContainerEnd,
}

pub(super) struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Split<'a, char>>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Lexer {
            lines: text.split('\n').enumerate(),
            done: false,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<(Token, usize), TextError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let (idx, raw_line) = self.lines.next()?;
            let line_no = idx + 1;

            let content = raw_line.trim_start();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }
            let content = content.trim_end();
            if content == "END" {
                return Some(Ok((Token::ContainerEnd, line_no)));
            }

            let Some(first_colon) = content.find(':') else {
                self.done = true;
                tracing::debug!(line = line_no, content, "lexer rejected line: no ':' found");
                return Some(Err(TextError::Lex {
                    line: line_no,
                    message: format!("expected 'NAME:TYPE:VALUE', found '{content}'"),
                }));
            };
            let name = content[..first_colon].to_string();
            let rest = &content[first_colon + 1..];

            let Some(second_colon) = rest.find(':') else {
                self.done = true;
                tracing::debug!(line = line_no, content, "lexer rejected line: missing type/value separator");
                return Some(Err(TextError::Lex {
                    line: line_no,
                    message: format!("expected a type code followed by ':' in '{content}'"),
                }));
            };
            let type_code = rest[..second_colon].to_string();
            let value = rest[second_colon + 1..].to_string();

            return Some(Ok((
                Token::Atom {
                    name,
                    type_code,
                    value,
                },
                line_no,
            )));
        }
    }
}
