//! A small recursive-descent SPDX expression parser built on `nom`.
//!
//! Grounded in the `nom`-based SPDX tooling present in the pack (the
//! `rpavlik-spdx-to-dep5` and `AerynOS-tools` crates both depend on `nom`
//! for hand-rolled text-format parsing). Precedence, low to high:
//! `OR` < `AND` < `WITH` < parentheses/identifier, matching the SPDX license
//! expression grammar.

use super::expression::{SingleLicenseExpression, SpdxExpression};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::multispace0;
use nom::combinator::opt;
use nom::multi::many0;
use nom::sequence::{delimited, preceded, tuple};
use nom::IResult;

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '+')(input)
}

fn atom(input: &str) -> IResult<&str, SpdxExpression> {
    alt((
        delimited(
            delimited(multispace0, tag("("), multispace0),
            or_expr,
            delimited(multispace0, tag(")"), multispace0),
        ),
        nom::combinator::map(identifier, |id| {
            SpdxExpression::single(SingleLicenseExpression::new(id))
        }),
    ))(input)
}

fn with_expr(input: &str) -> IResult<&str, SpdxExpression> {
    let (input, base) = atom(input)?;
    let (input, exception) = opt(preceded(
        tuple((multispace0, tag("WITH"), multispace0)),
        identifier,
    ))(input)?;
    let expr = match (base, exception) {
        (SpdxExpression::Single(leaf), Some(exception)) => SpdxExpression::single(
            SingleLicenseExpression::with_exception(leaf.id().to_string(), exception),
        ),
        (other, _) => other,
    };
    Ok((input, expr))
}

fn and_expr(input: &str) -> IResult<&str, SpdxExpression> {
    let (input, first) = with_expr(input)?;
    let (input, rest) = many0(preceded(
        tuple((multispace0, tag("AND"), multispace0)),
        with_expr,
    ))(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |acc, next| SpdxExpression::And(Box::new(acc), Box::new(next)));
    Ok((input, expr))
}

fn or_expr(input: &str) -> IResult<&str, SpdxExpression> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(
        tuple((multispace0, tag("OR"), multispace0)),
        and_expr,
    ))(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |acc, next| SpdxExpression::Or(Box::new(acc), Box::new(next)));
    Ok((input, expr))
}

/// Parse a full SPDX license expression, failing if any trailing input
/// remains unconsumed.
pub fn parse_expression(input: &str) -> std::result::Result<SpdxExpression, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty license expression".to_string());
    }
    match delimited(multispace0, or_expr, multispace0)(trimmed) {
        Ok((remaining, expr)) if remaining.is_empty() => Ok(expr),
        Ok((remaining, _)) => Err(format!("unexpected trailing input: {remaining:?}")),
        Err(err) => Err(format!("{err}")),
    }
}
