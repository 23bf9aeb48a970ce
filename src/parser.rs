//! Parser for flint
//!
//! Consumes the token stream left to right, building one [`Command`] stage
//! at a time. A `|` seals the current stage; redirect operators bind their
//! following word to the current stage; a trailing `&` marks the whole
//! pipeline as background.

use crate::ast::{Command, Pipeline, Redirects};
use crate::lexer::{LexError, Operator, Token};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("empty command line")]
    EmptyInput,
    #[error("missing command name")]
    EmptyStage,
    #[error("dangling '|' at end of line")]
    DanglingPipe,
    #[error("duplicate input redirection")]
    DuplicateInput,
    #[error("conflicting output redirections")]
    ConflictingOutput,
    #[error("missing target after '{0}'")]
    MissingRedirectTarget(&'static str),
    #[error("'&' is only allowed at the end of the line")]
    StrayBackground,
}

/// In-progress stage: the first word becomes the name, the rest arguments.
#[derive(Default)]
struct StageBuilder {
    name: Option<String>,
    args: Vec<String>,
    redirects: Redirects,
}

impl StageBuilder {
    fn push_word(&mut self, word: String) {
        if self.name.is_none() {
            self.name = Some(word);
        } else {
            self.args.push(word);
        }
    }

    fn seal(self) -> Option<Command> {
        Some(Command {
            name: self.name?,
            args: self.args,
            redirects: self.redirects,
        })
    }
}

/// Parser state
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Consume and return the current token
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The word following a redirect operator
    fn redirect_target(&mut self, op: &'static str) -> Result<String, ParseError> {
        match self.advance().and_then(Token::into_word) {
            Some(word) => Ok(word),
            None => Err(ParseError::MissingRedirectTarget(op)),
        }
    }

    /// Parse the whole token stream into a pipeline
    pub fn parse(mut self) -> Result<Pipeline, ParseError> {
        let mut stages: Vec<Command> = Vec::new();
        let mut background = false;
        let mut current = StageBuilder::default();

        while let Some(token) = self.advance() {
            match token {
                Token::Word(word) | Token::SingleQuoted(word) | Token::DoubleQuoted(word) => {
                    current.push_word(word);
                }
                Token::Operator(Operator::Pipe) => {
                    let stage = current.seal().ok_or(ParseError::EmptyStage)?;
                    stages.push(stage);
                    current = StageBuilder::default();
                }
                Token::Operator(Operator::Read) => {
                    let target = self.redirect_target("<")?;
                    if current.redirects.stdin.is_some() {
                        return Err(ParseError::DuplicateInput);
                    }
                    current.redirects.stdin = Some(target);
                }
                Token::Operator(Operator::Write) => {
                    let target = self.redirect_target(">")?;
                    if current.redirects.has_stdout() {
                        return Err(ParseError::ConflictingOutput);
                    }
                    current.redirects.stdout = Some(target);
                }
                Token::Operator(Operator::Append) => {
                    let target = self.redirect_target(">>")?;
                    if current.redirects.has_stdout() {
                        return Err(ParseError::ConflictingOutput);
                    }
                    current.redirects.stdout_append = Some(target);
                }
                Token::Operator(Operator::Background) => {
                    if !self.is_at_end() {
                        return Err(ParseError::StrayBackground);
                    }
                    background = true;
                }
            }
        }

        match current.seal() {
            Some(stage) => stages.push(stage),
            None if !stages.is_empty() => return Err(ParseError::DanglingPipe),
            None => return Err(ParseError::EmptyStage),
        }

        Ok(Pipeline { stages, background })
    }
}

/// Parse tokens into a [`Pipeline`]
pub fn parse(tokens: Vec<Token>) -> Result<Pipeline, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    Parser::new(tokens).parse()
}
