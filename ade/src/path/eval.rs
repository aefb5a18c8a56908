//! Evaluator: walks a parsed [`PathExpr`] against a context set of atoms
//! (spec.md §4.6 "Evaluation semantics").

use std::collections::HashSet;

use crate::atom::Atom;

use super::lexer::CmpOp;
use super::parser::{AndExpr, Axis, CmpExpr, NodeTest, OrExpr, PathExpr, Step, Term};
use super::PathError;

pub(super) fn run<'a>(path: &PathExpr, root: &'a Atom) -> Result<Vec<&'a Atom>, PathError> {
    let mut context: Vec<&'a Atom> = vec![root];
    for step in &path.steps {
        context = apply_step(context, step)?;
    }
    Ok(context)
}

fn apply_step<'a>(context: Vec<&'a Atom>, step: &Step) -> Result<Vec<&'a Atom>, PathError> {
    let mut candidates: Vec<&'a Atom> = Vec::new();
    match step.axis {
        Axis::SelfTest => {
            candidates.extend(context.iter().copied());
        }
        Axis::Child => {
            for ctx in &context {
                candidates.extend(ctx.children().iter());
            }
        }
        Axis::DescendantOrSelf => {
            for ctx in &context {
                candidates.extend(ctx.descendants());
            }
        }
    }

    let mut seen = HashSet::new();
    let mut filtered: Vec<&'a Atom> = Vec::new();
    for atom in candidates {
        if !matches_test(atom, &step.test) {
            continue;
        }
        // Duplicate references arise only when the descendant-or-self axis
        // is applied to more than one context atom whose subtrees overlap;
        // dedup by identity rather than structural equality (spec.md §4.6
        // "Result").
        let key = atom as *const Atom as usize;
        if seen.insert(key) {
            filtered.push(atom);
        }
    }

    for predicate in &step.predicates {
        let total = filtered.len();
        let mut next = Vec::with_capacity(total);
        for (index, atom) in filtered.into_iter().enumerate() {
            if eval_or(predicate, atom, index + 1, total)? {
                next.push(atom);
            }
        }
        filtered = next;
    }

    Ok(filtered)
}

fn matches_test(atom: &Atom, test: &NodeTest) -> bool {
    match test {
        NodeTest::Any => true,
        NodeTest::Name(name) => atom.name() == *name,
        NodeTest::TypeEq(type_code) => atom.type_code().label() == *type_code,
    }
}

#[derive(Debug, Clone)]
enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_text(&self) -> String {
        match self {
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

fn eval_or(expr: &OrExpr, atom: &Atom, position: usize, last: usize) -> Result<bool, PathError> {
    for and_expr in &expr.0 {
        if eval_and(and_expr, atom, position, last)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn eval_and(expr: &AndExpr, atom: &Atom, position: usize, last: usize) -> Result<bool, PathError> {
    for cmp in &expr.0 {
        if !eval_cmp(cmp, atom, position, last)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn eval_cmp(expr: &CmpExpr, atom: &Atom, position: usize, last: usize) -> Result<bool, PathError> {
    let lhs = eval_term(&expr.lhs, atom, position, last);
    match &expr.rhs {
        None => Ok(lhs.truthy()),
        Some((op, rhs_term)) => {
            let rhs = eval_term(rhs_term, atom, position, last);
            Ok(compare(*op, &lhs, &rhs))
        }
    }
}

fn eval_term(term: &Term, atom: &Atom, position: usize, last: usize) -> Value {
    match term {
        Term::Number(n) => Value::Number(*n),
        Term::String(s) => Value::Text(s.clone()),
        Term::Data => {
            if atom.type_code().is_container() {
                Value::Text(String::new())
            } else {
                Value::Text(atom.value().to_text())
            }
        }
        Term::Name => Value::Text(atom.name()),
        Term::Type => Value::Text(atom.type_code().label()),
        Term::Position => Value::Number(position as f64),
        Term::Last => Value::Number(last as f64),
    }
}

/// Comparisons on incomparable types return `false`, never an error
/// (spec.md §4.6): if either side fails to parse as a number, both sides
/// fall back to a string comparison instead of raising.
fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> bool {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return match op {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        };
    }
    let a = lhs.as_text();
    let b = rhs.as_text();
    match op {
        CmpOp::Eq => a == b,
        CmpOp::Ne => a != b,
        CmpOp::Lt => a < b,
        CmpOp::Le => a <= b,
        CmpOp::Gt => a > b,
        CmpOp::Ge => a >= b,
    }
}
