use nom::{
    character::complete::{char, digit0, multispace0},
    combinator::{all_consuming, map, opt, recognize},
    sequence::{delimited, pair, preceded, tuple},
};

use crate::ast::slice::Slice;

use super::PResult;

/// Parse an optional slice bound
///
/// An empty bound or a lone `-` is left unset. A bound that does not fit in an `i64` saturates.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_slice_int(input: &str) -> PResult<Option<i64>> {
    map(
        recognize(pair(opt(char('-')), digit0)),
        |s: &str| match s.trim_start_matches('-') {
            "" => None,
            _ => Some(s.parse::<i64>().unwrap_or(if s.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            })),
        },
    )(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_slice_part(input: &str) -> PResult<Option<i64>> {
    delimited(multispace0, parse_slice_int, multispace0)(input)
}

/// Parse the content of a `[...]` as a slice, `start:end` or `start:end:step`
///
/// The whole content must be a slice; anything else is left to be parsed as a filter.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_slice(input: &str) -> PResult<Slice> {
    map(
        all_consuming(tuple((
            parse_slice_part,
            char(':'),
            parse_slice_part,
            opt(preceded(char(':'), parse_slice_part)),
        ))),
        |(start, _, end, step)| Slice {
            start,
            end,
            step: step.flatten(),
        },
    )(input)
}
