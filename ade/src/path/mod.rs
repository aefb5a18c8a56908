//! The XPath-subset path evaluator (spec.md §4.6).

mod eval;
mod lexer;
mod parser;

use thiserror::Error;

use crate::atom::Atom;

/// A malformed path expression. The evaluator itself never fails at
/// runtime on a well-formed path (spec.md §4.6 "Failure modes").
#[derive(Debug, Error, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathError {
    #[error("path parse error: {0}")]
    Parse(String),
}

/// Evaluate `expr` against `root`, returning matches in document order.
pub fn evaluate<'a>(root: &'a Atom, expr: &str) -> Result<Vec<&'a Atom>, PathError> {
    let tokens = lexer::tokenize(expr).map_err(|e| {
        tracing::debug!(expr, error = %e, "path tokenization failed");
        e
    })?;
    let path = parser::parse(&tokens).map_err(|e| {
        tracing::debug!(expr, error = %e, "path parsing failed");
        e
    })?;
    eval::run(&path, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ade_types::TypeCode;

    fn example_tree() -> Atom {
        // The worked example from spec.md §8 scenario 4: three direct
        // containers under ROOT, each holding a UI32 leaf reachable by
        // `data() > 1`, in document order CHOW, DOGS, CATS, PIGS.
        let mut root = Atom::new("ROOT", TypeCode::CONT).unwrap();

        let mut one = Atom::new("ONE_", TypeCode::CONT).unwrap();
        let mut dogc = Atom::new("DOGC", TypeCode::CONT).unwrap();
        let mut chow = Atom::new("CHOW", TypeCode::UI32).unwrap();
        chow.value_mut().set_from_uint64(3).unwrap();
        let mut dogs = Atom::new("DOGS", TypeCode::UI32).unwrap();
        dogs.value_mut().set_from_uint64(2).unwrap();
        dogc.add_child(chow).unwrap();
        dogc.add_child(dogs).unwrap();
        one.add_child(dogc).unwrap();

        let mut two = Atom::new("TWO_", TypeCode::CONT).unwrap();
        let mut catc = Atom::new("CATC", TypeCode::CONT).unwrap();
        let mut cats = Atom::new("CATS", TypeCode::UI32).unwrap();
        cats.value_mut().set_from_uint64(2).unwrap();
        catc.add_child(cats).unwrap();
        two.add_child(catc).unwrap();

        let mut thre = Atom::new("THRE", TypeCode::CONT).unwrap();
        let mut pigc = Atom::new("PIGC", TypeCode::CONT).unwrap();
        let mut pigs = Atom::new("PIGS", TypeCode::UI32).unwrap();
        pigs.value_mut().set_from_uint64(2).unwrap();
        pigc.add_child(pigs).unwrap();
        thre.add_child(pigc).unwrap();

        root.add_child(one).unwrap();
        root.add_child(two).unwrap();
        root.add_child(thre).unwrap();
        root
    }

    #[test]
    fn wildcard_selects_direct_children() {
        let root = example_tree();
        let names: Vec<String> = evaluate(&root, "/ROOT/*")
            .unwrap()
            .iter()
            .map(|a| a.name())
            .collect();
        assert_eq!(names, vec!["ONE_", "TWO_", "THRE"]);
    }

    #[test]
    fn named_path_selects_single_descendant() {
        let root = example_tree();
        let found = evaluate(&root, "/ROOT/ONE_/DOGC/CHOW").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "CHOW");
        assert_eq!(found[0].value().get_uint64().unwrap(), 3);
    }

    #[test]
    fn descendant_predicate_matches_documented_order() {
        let root = example_tree();
        let found = evaluate(&root, "//*[data() > 1]").unwrap();
        let names: Vec<String> = found.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["CHOW", "DOGS", "CATS", "PIGS"]);
    }

    #[test]
    fn descendant_axis_preserves_document_order() {
        use itertools::Itertools;

        let root = example_tree();
        let all: Vec<&Atom> = evaluate(&root, "//*").unwrap();
        let document_order: Vec<&Atom> = root.descendants().collect();
        let positions: Vec<usize> = all
            .iter()
            .map(|atom| {
                document_order
                    .iter()
                    .position(|candidate| std::ptr::eq(*candidate, *atom))
                    .unwrap()
            })
            .collect();
        assert!(
            positions.iter().tuple_windows().all(|(a, b)| a < b),
            "path results must stay in document order: {positions:?}"
        );
    }

    #[test]
    fn no_match_returns_empty_not_error() {
        let root = example_tree();
        let found = evaluate(&root, "/ROOT/NOPE").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn malformed_path_is_a_parse_error() {
        let root = example_tree();
        assert!(evaluate(&root, "ROOT/ONE_").is_err());
    }

    #[test]
    fn type_test_filters_by_type_code() {
        let root = example_tree();
        // A sole `/@type=` step tests the context atom itself.
        let typed = evaluate(&root, "/@type=CONT").unwrap();
        assert_eq!(typed.len(), 1);
        assert_eq!(typed[0].name(), "ROOT");

        let untyped = evaluate(&root, "/@type=UI32").unwrap();
        assert!(untyped.is_empty());
    }

    #[test]
    fn position_and_last_are_one_indexed() {
        let root = example_tree();
        let first = evaluate(&root, "/ROOT/*[position() = 1]").unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name(), "ONE_");

        let last = evaluate(&root, "/ROOT/*[position() = last()]").unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].name(), "THRE");
    }
}
