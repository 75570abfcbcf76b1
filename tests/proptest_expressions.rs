//! Property-based checks of the SPDX expression algebra's round-trip laws
//! (spec §8's quantified properties), modelled on the teacher's
//! `proptest!`-block style in its own property test suite.

use license_resolver::spdx::{Operator, SingleLicenseExpression, SpdxExpression};
use proptest::prelude::*;

/// A handful of bare identifiers, kept small so that generated expressions
/// stay human-readable on failure and so `decompose` set sizes are bounded.
const LEAF_IDS: &[&str] = &["MIT", "Apache-2.0", "BSD-3-Clause", "GPL-2.0-only", "ISC"];

fn leaf_strategy() -> impl Strategy<Value = SpdxExpression> {
    prop::sample::select(LEAF_IDS).prop_map(|id| SpdxExpression::single(SingleLicenseExpression::new(id)))
}

/// Recursively build `AND`/`OR` trees over the leaf alphabet, capped at a
/// shallow depth so proptest shrinking stays fast.
fn expression_strategy() -> impl Strategy<Value = SpdxExpression> {
    leaf_strategy().prop_recursive(4, 16, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(lhs, rhs)| SpdxExpression::And(Box::new(lhs), Box::new(rhs))),
            (inner.clone(), inner).prop_map(|(lhs, rhs)| SpdxExpression::Or(Box::new(lhs), Box::new(rhs))),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Encoding and re-parsing an SPDX expression yields an equal expression
    /// (spec §8): `parse(expr.to_string()) == expr` up to tree shape, since
    /// the printer never reorders operands.
    #[test]
    fn encode_then_parse_round_trips(expr in expression_strategy()) {
        let printed = expr.to_string();
        let reparsed = SpdxExpression::parse(&printed).unwrap();
        prop_assert_eq!(reparsed, expr);
    }

    /// Decompose idempotence (spec §8): folding an expression's own leaves
    /// back together with `AND` always yields the same leaf set as the
    /// original expression, regardless of the original's `AND`/`OR` shape or
    /// the leaves' traversal order.
    #[test]
    fn decompose_is_idempotent_under_and_refold(expr in expression_strategy()) {
        let leaves = expr.decompose();
        let refolded = SpdxExpression::to_expression(
            leaves.iter().cloned().map(SpdxExpression::Single),
            Operator::And,
        )
        .unwrap();
        prop_assert_eq!(refolded.decompose(), leaves);
    }

    /// Applying an empty list of choices to an expression leaves it
    /// unchanged (spec §8).
    #[test]
    fn apply_empty_choices_is_identity(expr in expression_strategy()) {
        let result = expr.apply_choices(&[]).unwrap();
        prop_assert_eq!(result, expr);
    }

    /// Every member of `valid_choices` is `OR`-free and decomposes to a
    /// subset of the original expression's leaves (spec §4.1).
    #[test]
    fn valid_choices_are_or_free_and_leaf_subsets(expr in expression_strategy()) {
        let all_leaves = expr.decompose();
        for choice in expr.valid_choices() {
            prop_assert!(!choice.to_string().contains("OR"));
            prop_assert!(choice.decompose().is_subset(&all_leaves));
        }
    }
}
