//! Parsers for the SCPL grammar.
//!
//! Two interchangeable strategies are provided: a table-driven
//! predictive parser ([`ll1::Ll1Parser`]) and a table-driven SLR
//! bottom-up parser ([`slr::SlrParser`]). Both first materialize a
//! concrete [`tree::ParseTree`] and then fold it into an [`Ast`];
//! for any accepted input the two strategies yield identical ASTs,
//! even though their parse trees differ.

use thiserror::Error;

use crate::ast::Ast;
use crate::lexer::dfa::DfaError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub mod ll1;
pub mod slr;
pub mod tree;

/// The error type for syntax analysis.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The lexer's automata could not be constructed.
    #[error("lexer construction failed: {0}")]
    Lexer(#[from] DfaError),
    /// A terminal other than the expected one was found.
    #[error("expected {expected} but found {found} at line {line}, column {column}")]
    UnexpectedToken {
        /// The terminal the parser was committed to.
        expected: String,
        /// The token actually found.
        found: String,
        /// The 1-based line of the offending token.
        line: usize,
        /// The 1-based column of the offending token.
        column: usize,
    },
    /// The predictive table has no production for this pair.
    #[error("cannot expand {nonterminal} on {found} at line {line}, column {column}")]
    MissingProduction {
        /// The nonterminal on top of the prediction stack.
        nonterminal: String,
        /// The lookahead token.
        found: String,
        /// The 1-based line of the lookahead.
        line: usize,
        /// The 1-based column of the lookahead.
        column: usize,
    },
    /// The SLR action table has no entry for this pair.
    #[error("no action in state {state} on {found} at line {line}, column {column}")]
    MissingAction {
        /// The automaton state on top of the parse stack.
        state: usize,
        /// The lookahead token.
        found: String,
        /// The 1-based line of the lookahead.
        line: usize,
        /// The 1-based column of the lookahead.
        column: usize,
    },
    /// The SLR goto table has no entry for this pair.
    #[error("no goto from state {state} on {symbol}")]
    MissingGoto {
        /// The automaton state uncovered by the reduction.
        state: usize,
        /// The nonterminal just reduced.
        symbol: String,
    },
    /// The input ended while a construct was still open.
    #[error("unexpected end of input while expecting {expected}")]
    UnexpectedEnd {
        /// The terminal or nonterminal still awaited.
        expected: String,
    },
    /// Tokens remained after a complete program was recognized.
    #[error("unexpected trailing input {found}")]
    TrailingInput {
        /// The first leftover token.
        found: String,
    },
    /// A number literal too large for the AST's integer type.
    #[error("number literal {0} is out of range")]
    NumberOutOfRange(String),
    /// The parse tree handed to the AST builder had an impossible
    /// shape. This indicates a table bug, not a user error.
    #[error("malformed parse tree: {0}")]
    MalformedParseTree(String),
}

impl ParseError {
    /// Builds the error for a lookahead the parser cannot consume.
    fn unexpected(token: &Token, expected: impl Into<String>) -> Self {
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEnd {
                expected: expected.into(),
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.into(),
                found: token.to_string(),
                line: token.line,
                column: token.column,
            }
        }
    }
}

/// A parsing strategy over SCPL source text.
pub trait Parser {
    /// Parses `source` into an abstract syntax tree.
    fn parse(&mut self, source: &str) -> Result<Ast, ParseError>;
}

/// Pulls the next token out of `lexer`, retrying past skipped
/// characters and substituting the end-of-input token once the
/// input is exhausted.
fn advance(lexer: &mut Lexer) -> Token {
    while lexer.has_next() {
        if let Some(token) = lexer.next() {
            return token;
        }
    }
    Token::eof()
}
