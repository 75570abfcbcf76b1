//! SPDX expression tree, decomposition and recomposition (spec §4.1).

use crate::error::{LicenseResolverError, Result, SpdxErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A single-license leaf: either a bare SPDX identifier or an
/// identifier-with-exception pair (`X WITH Y`), per spec §3/glossary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SingleLicenseExpression {
    id: String,
    exception: Option<String>,
}

impl SingleLicenseExpression {
    /// A bare license identifier, e.g. `"MIT"`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exception: None,
        }
    }

    /// An identifier-with-exception pair, e.g. `"GPL-2.0-only WITH Classpath-exception-2.0"`.
    pub fn with_exception(id: impl Into<String>, exception: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exception: Some(exception.into()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn exception(&self) -> Option<&str> {
        self.exception.as_deref()
    }

    /// Whether the bare identifier (ignoring any `WITH` exception) is a
    /// known SPDX license id, using the `spdx` crate's lax table lookup the
    /// same way the donor library's `LicenseExpression::validate_spdx` does.
    pub fn is_known_spdx_id(&self) -> bool {
        spdx::license_id(&self.id).is_some()
    }
}

impl fmt::Display for SingleLicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.exception {
            Some(exception) => write!(f, "{} WITH {}", self.id, exception),
            None => write!(f, "{}", self.id),
        }
    }
}

/// The boolean combinator of a compound SPDX expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

/// An SPDX license expression: a tree of single-license leaves combined by
/// `AND`/`OR` (spec §3, §4.1). `WITH` is folded into the leaf itself
/// ([`SingleLicenseExpression`]) rather than being a third tree operator,
/// since a `WITH` pair is never decomposed further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpdxExpression {
    Single(SingleLicenseExpression),
    And(Box<SpdxExpression>, Box<SpdxExpression>),
    Or(Box<SpdxExpression>, Box<SpdxExpression>),
}

impl SpdxExpression {
    /// A leaf expression.
    pub fn single(leaf: SingleLicenseExpression) -> Self {
        Self::Single(leaf)
    }

    /// Parse a license expression string (spec §4.1). Operator precedence is
    /// the SPDX standard: `WITH` binds tightest, then `AND`, then `OR`;
    /// parentheses override precedence.
    pub fn parse(input: &str) -> Result<Self> {
        super::parser::parse_expression(input).map_err(|reason| {
            LicenseResolverError::spdx(
                format!("parsing {input:?}"),
                SpdxErrorKind::ParseError {
                    expression: input.to_string(),
                    reason,
                },
            )
        })
    }

    /// `decompose(expr)`: every single-license leaf of the tree, each
    /// appearing exactly once in the result (spec §4.1).
    pub fn decompose(&self) -> BTreeSet<SingleLicenseExpression> {
        let mut leaves = BTreeSet::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, out: &mut BTreeSet<SingleLicenseExpression>) {
        match self {
            Self::Single(leaf) => {
                out.insert(leaf.clone());
            }
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.collect_leaves(out);
                rhs.collect_leaves(out);
            }
        }
    }

    /// `to_expression(exprs, op)`: fold `exprs` left-associatively with `op`,
    /// or `None` for an empty input (spec §4.1). Input order is preserved so
    /// that callers controlling iteration order (e.g. a `BTreeSet`) get a
    /// deterministic result.
    pub fn to_expression<I>(exprs: I, op: Operator) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut iter = exprs.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, next| match op {
            Operator::And => Self::And(Box::new(acc), Box::new(next)),
            Operator::Or => Self::Or(Box::new(acc), Box::new(next)),
        }))
    }

    /// `apply_choices(expr, choices)`: apply each `(given, chosen)` pair in
    /// order, each seeing the result of the previous substitution (spec
    /// §4.1). Fails with `InvalidLicenseChoice` if a `given` does not match
    /// any `OR` sub-expression of the (possibly already-rewritten) input.
    pub fn apply_choices(&self, choices: &[super::SpdxLicenseChoice]) -> Result<Self> {
        let mut current = self.clone();
        for choice in choices {
            current = match current.replace_or_subexpression(&choice.given, &choice.chosen) {
                Some(replaced) => replaced,
                None => {
                    return Err(LicenseResolverError::invalid_license_choice(
                        current.to_string(),
                        choice.given.to_string(),
                    ));
                }
            };
        }
        Ok(current)
    }

    /// Replace the first `OR` sub-expression matching `given` (by leaf-set
    /// equality, ignoring `OR`'s associativity/commutativity) with `chosen`.
    /// Returns `None` if no sub-expression matches.
    fn replace_or_subexpression(&self, given: &Self, chosen: &Self) -> Option<Self> {
        if self.is_or() && self.decompose() == given.decompose() && given.is_or() {
            return Some(chosen.clone());
        }
        match self {
            Self::Single(_) => None,
            Self::And(lhs, rhs) => {
                if let Some(replaced) = lhs.replace_or_subexpression(given, chosen) {
                    return Some(Self::And(Box::new(replaced), rhs.clone()));
                }
                rhs.replace_or_subexpression(given, chosen)
                    .map(|replaced| Self::And(lhs.clone(), Box::new(replaced)))
            }
            Self::Or(lhs, rhs) => {
                if let Some(replaced) = lhs.replace_or_subexpression(given, chosen) {
                    return Some(Self::Or(Box::new(replaced), rhs.clone()));
                }
                rhs.replace_or_subexpression(given, chosen)
                    .map(|replaced| Self::Or(lhs.clone(), Box::new(replaced)))
            }
        }
    }

    fn is_or(&self) -> bool {
        matches!(self, Self::Or(..))
    }

    fn contains_or(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Or(..) => true,
            Self::And(lhs, rhs) => lhs.contains_or() || rhs.contains_or(),
        }
    }

    /// `valid_choices(expr)`: every minimal, `OR`-free sub-expression
    /// reachable by picking exactly one branch per `OR` (spec §4.1).
    pub fn valid_choices(&self) -> BTreeSet<Self> {
        self.expand_or()
            .into_iter()
            .collect::<BTreeSet<_>>()
    }

    fn expand_or(&self) -> Vec<Self> {
        match self {
            Self::Single(_) => vec![self.clone()],
            Self::Or(lhs, rhs) => {
                let mut out = lhs.expand_or();
                out.extend(rhs.expand_or());
                out
            }
            Self::And(lhs, rhs) => {
                let lhs_options = lhs.expand_or();
                let rhs_options = rhs.expand_or();
                let mut out = Vec::with_capacity(lhs_options.len() * rhs_options.len());
                for l in &lhs_options {
                    for r in &rhs_options {
                        out.push(Self::And(Box::new(l.clone()), Box::new(r.clone())));
                    }
                }
                out
            }
        }
    }
}

impl fmt::Display for SpdxExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(leaf) => write!(f, "{leaf}"),
            Self::And(lhs, rhs) => {
                write_operand(f, lhs, true)?;
                write!(f, " AND ")?;
                write_operand(f, rhs, true)
            }
            Self::Or(lhs, rhs) => {
                write!(f, "{lhs}")?;
                write!(f, " OR ")?;
                write!(f, "{rhs}")
            }
        }
    }
}

/// Parenthesize an `AND` operand iff it contains an `OR`, so that the
/// printed form round-trips without introducing redundant parentheses
/// elsewhere (spec §4.1).
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &SpdxExpression, parent_is_and: bool) -> fmt::Result {
    if parent_is_and && expr.contains_or() {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

impl PartialOrd for SpdxExpression {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SpdxExpression {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl FromStr for SpdxExpression {
    type Err = LicenseResolverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
