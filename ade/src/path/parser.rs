//! Recursive-descent parser over the path grammar's token stream
//! (spec.md §4.6).

use super::lexer::{CmpOp, Token};
use super::PathError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Axis {
    /// Tests the context atom itself. Only ever produced for the first
    /// step of a path introduced by a single leading `/`: an absolute
    /// path is anchored *at* the argument atom, matching it by name the
    /// way an XPath absolute path's first step matches the document
    /// element rather than one of its children.
    SelfTest,
    Child,
    DescendantOrSelf,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum NodeTest {
    Name(String),
    Any,
    TypeEq(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Step {
    pub(super) axis: Axis,
    pub(super) test: NodeTest,
    pub(super) predicates: Vec<OrExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct OrExpr(pub(super) Vec<AndExpr>);

#[derive(Debug, Clone, PartialEq)]
pub(super) struct AndExpr(pub(super) Vec<CmpExpr>);

#[derive(Debug, Clone, PartialEq)]
pub(super) struct CmpExpr {
    pub(super) lhs: Term,
    pub(super) rhs: Option<(CmpOp, Term)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Term {
    Number(f64),
    String(String),
    Data,
    Name,
    Type,
    Position,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct PathExpr {
    pub(super) steps: Vec<Step>,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

pub(super) fn parse(tokens: &[Token]) -> Result<PathExpr, PathError> {
    let mut p = Parser { tokens, pos: 0 };
    let expr = p.parse_path()?;
    if p.pos != p.tokens.len() {
        return Err(PathError::Parse(format!(
            "unexpected trailing token at position {}",
            p.pos
        )));
    }
    Ok(expr)
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        self.pos += 1;
        t
    }

    fn expect(&mut self, want: &Token) -> Result<(), PathError> {
        match self.bump() {
            Some(t) if t == want => Ok(()),
            other => Err(PathError::Parse(format!(
                "expected {want:?}, found {other:?}"
            ))),
        }
    }

    fn parse_path(&mut self) -> Result<PathExpr, PathError> {
        let axis = match self.bump() {
            Some(Token::SlashSlash) => Axis::DescendantOrSelf,
            Some(Token::Slash) => Axis::SelfTest,
            other => {
                return Err(PathError::Parse(format!(
                    "path must start with '/' or '//', found {other:?}"
                )))
            }
        };
        let mut steps = vec![self.parse_step(axis)?];

        loop {
            match self.peek() {
                Some(Token::SlashSlash) => {
                    self.pos += 1;
                    steps.push(self.parse_step(Axis::DescendantOrSelf)?);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    steps.push(self.parse_step(Axis::Child)?);
                }
                _ => break,
            }
        }

        Ok(PathExpr { steps })
    }

    fn parse_step(&mut self, axis: Axis) -> Result<Step, PathError> {
        let test = match self.bump() {
            Some(Token::Star) => NodeTest::Any,
            Some(Token::At) => {
                let name = self.expect_ident()?;
                if name != "type" {
                    return Err(PathError::Parse(format!(
                        "unsupported attribute test '@{name}'"
                    )));
                }
                self.expect(&Token::Op(CmpOp::Eq))?;
                let type_code = self.expect_ident()?;
                NodeTest::TypeEq(type_code)
            }
            Some(Token::Ident(name)) => NodeTest::Name(name.clone()),
            other => {
                return Err(PathError::Parse(format!(
                    "expected a step name, '*', or '@type=', found {other:?}"
                )))
            }
        };

        let mut predicates = Vec::new();
        while self.peek() == Some(&Token::LBracket) {
            self.pos += 1;
            let expr = self.parse_or_expr()?;
            self.expect(&Token::RBracket)?;
            predicates.push(expr);
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn expect_ident(&mut self) -> Result<String, PathError> {
        match self.bump() {
            Some(Token::Ident(name)) => Ok(name.clone()),
            other => Err(PathError::Parse(format!(
                "expected an identifier, found {other:?}"
            ))),
        }
    }

    fn parse_or_expr(&mut self) -> Result<OrExpr, PathError> {
        let mut parts = vec![self.parse_and_expr()?];
        while matches!(self.peek(), Some(Token::Ident(k)) if k == "or") {
            self.pos += 1;
            parts.push(self.parse_and_expr()?);
        }
        Ok(OrExpr(parts))
    }

    fn parse_and_expr(&mut self) -> Result<AndExpr, PathError> {
        let mut parts = vec![self.parse_cmp_expr()?];
        while matches!(self.peek(), Some(Token::Ident(k)) if k == "and") {
            self.pos += 1;
            parts.push(self.parse_cmp_expr()?);
        }
        Ok(AndExpr(parts))
    }

    fn parse_cmp_expr(&mut self) -> Result<CmpExpr, PathError> {
        let lhs = self.parse_term()?;
        let rhs = if let Some(Token::Op(op)) = self.peek() {
            let op = *op;
            self.pos += 1;
            Some((op, self.parse_term()?))
        } else {
            None
        };
        Ok(CmpExpr { lhs, rhs })
    }

    fn parse_term(&mut self) -> Result<Term, PathError> {
        match self.bump() {
            Some(Token::Number(n)) => Ok(Term::Number(*n)),
            Some(Token::Str(s)) => Ok(Term::String(s.clone())),
            Some(Token::Ident(name)) => {
                let term = match name.as_str() {
                    "data" => Term::Data,
                    "name" => Term::Name,
                    "type" => Term::Type,
                    "position" => Term::Position,
                    "last" => Term::Last,
                    other => {
                        return Err(PathError::Parse(format!(
                            "unknown function '{other}()' in predicate"
                        )))
                    }
                };
                self.expect(&Token::LParen)?;
                self.expect(&Token::RParen)?;
                Ok(term)
            }
            other => Err(PathError::Parse(format!(
                "expected a term, found {other:?}"
            ))),
        }
    }
}
