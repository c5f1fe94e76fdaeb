//! Canonical rule parser using nom
//!
//! Parses one canonical HexiDirect rule into a [`Rule`]:
//!
//! ```text
//! rule      := source "=>" target
//! source    := symbol ("%" | digit)? group*
//! group     := "[" option ("|" option)* "]"
//! option    := "-"? digit? symbol ("%" | digit)?
//! target    := symbol ("%" digits? | "." digit | digit)?
//! symbol    := "_" | "a".."z"
//! digit     := "1".."6"
//! ```
//!
//! Shorthand that the macro expander rewrites (`[]`, `[x]3`, `[x.]`,
//! top-level `|`) is rejected here.

use crate::cell::is_symbol;
use crate::{Condition, Direction, Error, Result, Rule, SourceDirection, TargetDirection};
use nom::{
    branch::alt,
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{all_consuming, map, map_opt, map_res, opt, value},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

/// Facing suffix on a condition option
#[derive(Clone, Copy)]
enum Facing {
    Any,
    Fixed(Direction),
}

fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

fn symbol(input: &str) -> IResult<&str, char> {
    satisfy(is_symbol).parse(input)
}

fn direction(input: &str) -> IResult<&str, Direction> {
    map_opt(satisfy(|c| c.is_ascii_digit()), Direction::from_char).parse(input)
}

fn facing(input: &str) -> IResult<&str, Facing> {
    alt((value(Facing::Any, char('%')), map(direction, Facing::Fixed))).parse(input)
}

/// `-? slot? state facing?`
fn condition(input: &str) -> IResult<&str, Condition> {
    let (input, negated) = opt(char('-')).parse(input)?;
    let (input, slot) = opt(direction).parse(input)?;
    let (input, state) = symbol(input)?;
    let (input, facing) = opt(facing).parse(input)?;

    let mut condition = Condition::state(state);
    condition.slot = slot;
    condition.negated = negated.is_some();
    match facing {
        Some(Facing::Any) => condition.random_direction = true,
        Some(Facing::Fixed(d)) => condition.pointing = Some(d),
        None => {}
    }
    Ok((input, condition))
}

/// `[option|option|...]`
fn group(input: &str) -> IResult<&str, Vec<Condition>> {
    delimited(
        (char('['), ws),
        separated_list1((ws, char('|'), ws), condition),
        (ws, char(']')),
    )
    .parse(input)
}

fn source_direction(input: &str) -> IResult<&str, SourceDirection> {
    map(opt(facing), |f| match f {
        None => SourceDirection::None,
        Some(Facing::Any) => SourceDirection::Any,
        Some(Facing::Fixed(d)) => SourceDirection::Fixed(d),
    })
    .parse(input)
}

type Source = (char, SourceDirection, Vec<Vec<Condition>>);

fn source(input: &str) -> IResult<&str, Source> {
    terminated(
        (
            preceded(ws, symbol),
            source_direction,
            many0(preceded(ws, group)),
        ),
        ws,
    )
    .parse(input)
}

fn rotation(input: &str) -> IResult<&str, TargetDirection> {
    preceded(
        char('%'),
        map_res(opt(digit1), |digits: Option<&str>| {
            digits
                .map_or(Ok(0), str::parse::<u32>)
                .map(|n| TargetDirection::Rotate((n % 6) as u8))
        }),
    )
    .parse(input)
}

fn target(input: &str) -> IResult<&str, (char, TargetDirection)> {
    let (input, _) = ws(input)?;
    let (input, state) = symbol(input)?;
    let (input, facing) = opt(alt((
        rotation,
        preceded(char('.'), map(direction, TargetDirection::Fixed)),
        map(direction, TargetDirection::Fixed),
    )))
    .parse(input)?;
    let (input, _) = ws(input)?;
    Ok((input, (state, facing.unwrap_or_default())))
}

/// Turn a nom failure into a syntax error pointing at the offending text
fn describe(rule: &str, part: &str, side: &str, err: nom::Err<nom::error::Error<&str>>) -> Error {
    let rest = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => "",
    };
    let position = part.len() - rest.len();
    let message = match rest.trim_start().chars().next() {
        None => format!("{side} ends unexpectedly"),
        Some('|') => format!("unexpected '|' at {side} position {position}; split alternatives first"),
        Some('[') => format!("invalid condition group at {side} position {position}"),
        Some(c) => format!("unexpected '{c}' at {side} position {position}"),
    };
    Error::syntax(rule, message)
}

/// Parse one canonical rule string
///
/// The string must contain exactly one `=>`. The trimmed text is kept as the
/// rule's raw text.
pub fn parse_rule(text: &str) -> Result<Rule> {
    let mut parts = text.split("=>");
    let (Some(source_text), Some(target_text), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::syntax(text, "expected exactly one '=>'"));
    };

    let (_, (source_state, source_direction, conditions)) = all_consuming(source)
        .parse(source_text)
        .map_err(|e| describe(text, source_text, "source", e))?;
    let (_, (target_state, target_direction)) = all_consuming(target)
        .parse(target_text)
        .map_err(|e| describe(text, target_text, "target", e))?;

    Ok(Rule::from_parts(
        text.trim(),
        source_state,
        source_direction,
        conditions,
        target_state,
        target_direction,
    ))
}
