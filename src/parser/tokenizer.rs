//! Tokenizer for selector text
//!
//! Lexing is permissive: characters that cannot start a token are skipped without error.
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{anychar, char, multispace1, satisfy},
    combinator::{map, recognize, value},
    multi::fold_many0,
    sequence::{pair, preceded},
};

use crate::ast::slice::Slice;

use super::{slice::parse_slice, PResult};

/// A lexical token of selector text
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Dot,
    LeftParen,
    RightParen,
    And,
    Or,
    Not,
    Wildcard,
    DeepWildcard,
    /// The raw text between `[` and `]` when it is not a slice
    Filter(String),
    Slice(Slice),
    Property(String),
}

fn is_identifier_start(chr: char) -> bool {
    chr.is_ascii_alphabetic() || chr == '_' || chr == '$'
}

fn is_identifier_part(chr: char) -> bool {
    is_identifier_start(chr) || chr.is_ascii_digit()
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_property(input: &str) -> PResult<Token> {
    map(
        recognize(pair(
            satisfy(is_identifier_start),
            take_while(is_identifier_part),
        )),
        |s: &str| Token::Property(s.to_owned()),
    )(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_wildcard(input: &str) -> PResult<Token> {
    alt((
        value(Token::DeepWildcard, tag("**")),
        value(Token::Wildcard, char('*')),
    ))(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_punctuation(input: &str) -> PResult<Token> {
    alt((
        value(Token::Dot, char('.')),
        value(Token::LeftParen, char('(')),
        value(Token::RightParen, char(')')),
        value(Token::And, char('&')),
        value(Token::Or, char('|')),
        value(Token::Not, char('!')),
    ))(input)
}

/// Take everything up to the `]` that closes an already opened `[`
///
/// Nested brackets are balanced. Without a closing `]`, the rest of the input is taken.
fn take_bracketed(input: &str) -> PResult<&str> {
    let mut depth = 1usize;
    for (i, chr) in input.char_indices() {
        match chr {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[..i]));
                }
            }
            _ => {}
        }
    }
    Ok(("", input))
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_bracket(input: &str) -> PResult<Token> {
    map(preceded(char('['), take_bracketed), |content: &str| {
        match parse_slice(content) {
            Ok((_, slice)) => Token::Slice(slice),
            Err(_) => Token::Filter(content.to_owned()),
        }
    })(input)
}

fn parse_token(input: &str) -> PResult<Option<Token>> {
    alt((
        map(
            alt((parse_bracket, parse_wildcard, parse_punctuation, parse_property)),
            Some,
        ),
        value(None, multispace1),
        // anything else is dropped
        value(None, anychar),
    ))(input)
}

/// Split selector text into tokens
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret))]
pub fn tokenize(input: &str) -> Vec<Token> {
    let tokens = fold_many0(parse_token, Vec::new, |mut tokens, token| {
        tokens.extend(token);
        tokens
    })(input);
    // every branch of `parse_token` consumes input, so folding only stops at the end of it
    tokens.map(|(_, tokens)| tokens).unwrap_or_default()
}
