//! Stack-based container parser consuming the lexer's token stream
//! (spec.md §4.5 "Parser").

use std::str::FromStr;

use ade_types::{AtomValue, TypeCode};

use crate::atom::Atom;
use crate::error::TextError;

use super::lexer::{Lexer, Token};

pub(super) fn parse(text: &str) -> Result<Atom, TextError> {
    let mut stack: Vec<Atom> = Vec::new();
    let mut roots: Vec<Atom> = Vec::new();

    for item in Lexer::new(text) {
        let (token, line) = item?;
        match token {
            Token::Atom {
                name,
                type_code,
                value,
            } => {
                let type_code = TypeCode::from_str(&type_code).map_err(|_| TextError::Parse {
                    line,
                    message: format!("'{type_code}' is not a valid ADE type code"),
                })?;

                let atom = if type_code.is_container() {
                    Atom::with_value(&name, AtomValue::default_for(type_code))?
                } else {
                    let mut v = AtomValue::default_for(type_code);
                    v.set_from_text(value.trim())?;
                    Atom::with_value(&name, v)?
                };

                if type_code.is_container() {
                    stack.push(atom);
                } else {
                    append(&mut stack, &mut roots, atom)?;
                }
            }
            Token::ContainerEnd => {
                let finished = stack.pop().ok_or_else(|| {
                    tracing::debug!(line, "unmatched END");
                    TextError::UnmatchedEnd { line }
                })?;
                append(&mut stack, &mut roots, finished)?;
            }
        }
    }

    if !stack.is_empty() {
        tracing::debug!(count = stack.len(), "containers left open at end of input");
        return Err(TextError::UnclosedContainers { count: stack.len() });
    }

    match roots.len() {
        1 => Ok(roots.pop().unwrap()),
        0 => Err(TextError::Parse {
            line: 0,
            message: "empty input: no atom found".to_string(),
        }),
        n => Err(TextError::Parse {
            line: 0,
            message: format!("expected exactly one root atom, found {n}"),
        }),
    }
}

fn append(stack: &mut [Atom], roots: &mut Vec<Atom>, atom: Atom) -> Result<(), TextError> {
    if let Some(parent) = stack.last_mut() {
        parent.add_child(atom)?;
    } else {
        roots.push(atom);
    }
    Ok(())
}
