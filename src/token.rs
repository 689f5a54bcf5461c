//! Tokens produced by the SCPL lexer.

use std::fmt;

/// The set of distinct token kinds in the SCPL language.
///
/// The `Eof` kind never appears in a lexer's output; it exists so
/// that the parsers can treat end-of-input as an ordinary terminal
/// keyed by `$` in their tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An identifier, e.g. `total_2`.
    Identifier,
    /// An unsigned decimal integer literal.
    Number,
    /// A double-quoted string literal.
    Str,
    /// The binary addition operator `+`.
    Plus,
    /// The binary multiplication operator `*`.
    Times,
    /// The opening parenthesis `(`.
    LeftParen,
    /// The closing parenthesis `)`.
    RightParen,
    /// The two-character assignment operator `<-`.
    Assign,
    /// The statement terminator `;`.
    Semicolon,
    /// The end-of-input marker.
    Eof,
}

impl TokenKind {
    /// Returns the textual form of this kind as used for keys in the
    /// grammar tables.
    pub fn grammar_name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Plus => "plus",
            TokenKind::Times => "times",
            TokenKind::LeftParen => "left_paren",
            TokenKind::RightParen => "right_paren",
            TokenKind::Assign => "assign",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Eof => "$",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grammar_name())
    }
}

/// A single token, immutable once produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of this token.
    pub kind: TokenKind,
    /// The matched slice of the input, e.g. `<-` for an assignment.
    pub lexeme: String,
    /// The 1-based line on which the token begins.
    pub line: usize,
    /// The 1-based column at which the token begins.
    pub column: usize,
}

impl Token {
    /// Constructs a new token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// Returns a synthetic end-of-input token.
    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "$", 0, 0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({})", self.lexeme, self.kind)
    }
}
