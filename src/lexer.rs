//! Tokenization for flint
//!
//! A line is split into whitespace-delimited words, quoted spans, and the
//! punctuation tokens `|`, `<`, `>`, `>>`, `&`. Quote delimiters are
//! stripped; the content between them is kept verbatim.

use nom::{
    branch::alt,
    bytes::complete::{escaped, tag, take_while1},
    character::complete::{char, multispace0, none_of, one_of},
    combinator::{map, opt, value},
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Pipe,       // |
    Read,       // <
    Write,      // >
    Append,     // >>
    Background, // &
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A word (command name, argument, redirect target)
    Word(String),
    /// A single-quoted span
    SingleQuoted(String),
    /// A double-quoted span
    DoubleQuoted(String),
    /// A punctuation operator
    Operator(Operator),
}

impl Token {
    /// The text a token contributes to a command, if any.
    pub fn into_word(self) -> Option<String> {
        match self {
            Token::Word(s) | Token::SingleQuoted(s) | Token::DoubleQuoted(s) => Some(s),
            Token::Operator(_) => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("unexpected character: {0}")]
    UnexpectedChar(char),
}

/// Parse a double-quoted span; backslash escapes pass through verbatim
fn double_quoted_string(input: &str) -> IResult<&str, Token> {
    let (input, content) = delimited(
        char('"'),
        map(
            opt(escaped(none_of("\"\\"), '\\', one_of("\"\\nrt"))),
            |o| o.unwrap_or(""),
        ),
        char('"'),
    )(input)?;
    Ok((input, Token::DoubleQuoted(content.to_string())))
}

/// Parse a single-quoted span
fn single_quoted_string(input: &str) -> IResult<&str, Token> {
    let (input, content) = delimited(
        char('\''),
        map(opt(take_while1(|c| c != '\'')), |o| o.unwrap_or("")),
        char('\''),
    )(input)?;
    Ok((input, Token::SingleQuoted(content.to_string())))
}

/// Parse >> operator (must come before >)
fn append_op(input: &str) -> IResult<&str, Token> {
    value(Token::Operator(Operator::Append), tag(">>"))(input)
}

/// Parse > operator
fn write_op(input: &str) -> IResult<&str, Token> {
    value(Token::Operator(Operator::Write), char('>'))(input)
}

/// Parse < operator
fn read_op(input: &str) -> IResult<&str, Token> {
    value(Token::Operator(Operator::Read), char('<'))(input)
}

/// Parse | operator
fn pipe_op(input: &str) -> IResult<&str, Token> {
    value(Token::Operator(Operator::Pipe), char('|'))(input)
}

/// Parse & operator
fn background_op(input: &str) -> IResult<&str, Token> {
    value(Token::Operator(Operator::Background), char('&'))(input)
}

/// Parse a word (command name or argument)
fn word(input: &str) -> IResult<&str, Token> {
    map(
        take_while1(|c: char| {
            !c.is_whitespace()
                && c != '|'
                && c != '<'
                && c != '>'
                && c != '&'
                && c != '"'
                && c != '\''
        }),
        |s: &str| Token::Word(s.to_string()),
    )(input)
}

/// Parse any single token
fn token(input: &str) -> IResult<&str, Token> {
    preceded(
        multispace0,
        alt((
            // Multi-char operators first
            append_op,
            // Strings
            double_quoted_string,
            single_quoted_string,
            // Single-char operators
            write_op,
            read_op,
            pipe_op,
            background_op,
            // Words last
            word,
        )),
    )(input)
}

/// Tokenize a complete input line
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let (remaining, tokens) = many0(token)(input)
        .map_err(|_| LexError::UnexpectedChar(input.chars().next().unwrap_or(' ')))?;

    // Anything left over is an open quote or a character no parser accepts
    let remaining = remaining.trim();
    match remaining.chars().next() {
        None => Ok(tokens),
        Some('"') | Some('\'') => Err(LexError::UnterminatedQuote),
        Some(c) => Err(LexError::UnexpectedChar(c)),
    }
}
