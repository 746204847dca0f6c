//! Word splitting for gosh
//!
//! A command line is cut into words on blanks. Single and double quotes open
//! a verbatim run ended by the matching quote; the quotes themselves are
//! dropped and adjacent runs concatenate, so `"a"b'c'` is the one word `abc`.
//! There are no escapes and an unterminated quote runs to end of input.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{map, opt},
    multi::{many0, many1},
    sequence::{preceded, terminated},
    IResult,
};

/// Characters that end a word outside quotes.
fn is_word_break(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c' | '\x0b')
}

/// Parse a single-quoted run; the closing quote is optional at end of input.
fn single_quoted(input: &str) -> IResult<&str, &str> {
    preceded(
        char('\''),
        terminated(take_while(|c| c != '\''), opt(char('\''))),
    )(input)
}

/// Parse a double-quoted run; the closing quote is optional at end of input.
fn double_quoted(input: &str) -> IResult<&str, &str> {
    preceded(
        char('"'),
        terminated(take_while(|c| c != '"'), opt(char('"'))),
    )(input)
}

/// Parse an unquoted run of word characters.
fn bare(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_word_break(c) && c != '\'' && c != '"')(input)
}

/// One segment of a word: a quoted run or a bare run.
fn segment(input: &str) -> IResult<&str, &str> {
    alt((single_quoted, double_quoted, bare))(input)
}

/// A word is one or more adjacent segments, concatenated.
fn word(input: &str) -> IResult<&str, String> {
    map(many1(segment), |segments| segments.concat())(input)
}

/// Consume any run of blanks.
fn blanks(input: &str) -> IResult<&str, &str> {
    take_while(is_word_break)(input)
}

/// Split a raw command line into words. Empty words (e.g. a lone `''`) are
/// never emitted, and a line of blanks yields an empty vector.
pub fn split_line(input: &str) -> Vec<String> {
    let words = match many0(preceded(blanks, word))(input) {
        Ok((_, words)) => words,
        Err(_) => Vec::new(),
    };
    words.into_iter().filter(|w| !w.is_empty()).collect()
}
