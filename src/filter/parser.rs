//! nom grammar for filter predicates

// internal modules
use super::{Expr, Op, Operand};

// external crates
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, multispace0, satisfy};
use nom::combinator::{all_consuming, map, not, peek, recognize, value};
use nom::error::Error;
use nom::multi::many0;
use nom::number::complete::double;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::{Finish, IResult};

/// Parse a complete, non-empty predicate
pub(super) fn parse(i: &str) -> Result<Expr, Error<String>> {
    all_consuming(ws(expr))(i)
        .finish()
        .map(|(_, e)| e)
        .map_err(|e| Error::new(e.input.to_string(), e.code))
}

/// Ignore whitespace either side of `inner`
fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A keyword that is not the start of a longer identifier
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    ws(terminated(tag(word), not(peek(satisfy(is_ident_char)))))
}

fn expr(i: &str) -> IResult<&str, Expr> {
    let (i, first) = and_expr(i)?;
    let (i, rest) = many0(preceded(keyword("or"), and_expr))(i)?;
    let e = rest
        .into_iter()
        .fold(first, |acc, e| Expr::Or(Box::new(acc), Box::new(e)));
    Ok((i, e))
}

fn and_expr(i: &str) -> IResult<&str, Expr> {
    let (i, first) = unary(i)?;
    let (i, rest) = many0(preceded(keyword("and"), unary))(i)?;
    let e = rest
        .into_iter()
        .fold(first, |acc, e| Expr::And(Box::new(acc), Box::new(e)));
    Ok((i, e))
}

fn unary(i: &str) -> IResult<&str, Expr> {
    alt((
        map(
            preceded(keyword("not"), delimited(ws(char('(')), expr, ws(char(')')))),
            |e| Expr::Not(Box::new(e)),
        ),
        delimited(ws(char('(')), expr, ws(char(')'))),
        comparison,
    ))(i)
}

fn comparison(i: &str) -> IResult<&str, Expr> {
    map(tuple((sum, ws(op), sum)), |(lhs, op, rhs)| {
        Expr::Compare(lhs, op, rhs)
    })(i)
}

fn op(i: &str) -> IResult<&str, Op> {
    alt((
        value(Op::Le, tag("<=")),
        value(Op::Ge, tag(">=")),
        value(Op::Ne, tag("!=")),
        value(Op::Eq, tag("==")),
        value(Op::Eq, tag("=")),
        value(Op::Lt, tag("<")),
        value(Op::Gt, tag(">")),
    ))(i)
}

fn sum(i: &str) -> IResult<&str, Operand> {
    let (i, first) = ws(atom)(i)?;
    let (i, rest) = many0(pair(ws(alt((char('+'), char('-')))), ws(atom)))(i)?;
    let o = rest.into_iter().fold(first, |acc, (sign, o)| match sign {
        '+' => Operand::Add(Box::new(acc), Box::new(o)),
        _ => Operand::Sub(Box::new(acc), Box::new(o)),
    });
    Ok((i, o))
}

fn atom(i: &str) -> IResult<&str, Operand> {
    alt((
        map(text, |s: &str| Operand::Text(s.to_string())),
        map(identifier, |s: &str| Operand::Field(s.to_string())),
        map(double, Operand::Number),
        delimited(ws(char('(')), sum, ws(char(')'))),
    ))(i)
}

/// Single or double quoted text, no escapes
fn text(i: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
    ))(i)
}

fn identifier(i: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        many0(satisfy(is_ident_char)),
    ))(i)
}
