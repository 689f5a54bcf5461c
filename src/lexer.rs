//! The multi-automaton maximal-munch lexer for `.scpl` sources.
//!
//! The [`Lexer`] owns one released [`Dfa`] per token kind and drives
//! all of them in lock-step over the input, one character at a time.
//! Whenever a still-alive automaton lands in an accepting state, the
//! position after that character is recorded as the latest candidate;
//! scanning continues past early accepts in search of a longer match
//! (maximal munch), and only stops once every automaton is dead or a
//! whitespace boundary is reached outside a string literal.
//!
//! When two automata accept at the same position, the one registered
//! later wins. This last-registered-wins tie-break is a fixed policy,
//! not priority-by-specificity.

use crate::diag::{Diagnostic, DiagnosticSink, LogSink};
use crate::token::{Token, TokenKind};

use self::dfa::{Dfa, DfaError};

pub mod dfa;

/// The decimal digits.
const DIGIT_ALPHABET: &str = "0123456789";
/// Legal identifier body characters; the first character may not be a digit.
const IDENTIFIER_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
/// The index of the string-literal automaton in registration order.
const STRING_DFA: usize = 8;

/// Returns the alphabet of the string-literal automaton: every
/// printable ASCII character plus the horizontal tab, so that quoted
/// text may contain spaces and punctuation.
fn string_alphabet() -> String {
    let mut alphabet = String::from('\t');
    alphabet.extend(' '..='~');
    alphabet
}

/// The lexical analyzer, yielding a lazy sequence of [`Token`]s.
pub struct Lexer {
    /// The current input text.
    input: String,
    /// The current byte offset into `input`.
    pos: usize,
    /// The 1-based line of the current position.
    line: usize,
    /// The 1-based column of the current position.
    column: usize,
    /// One automaton per token kind, in registration order.
    dfas: Vec<Dfa>,
    /// Which automata are still alive during the current token attempt.
    alive: Vec<bool>,
    /// Where non-fatal lexical diagnostics go.
    sink: Box<dyn DiagnosticSink>,
}

impl std::fmt::Debug for Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("pos", &self.pos)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}

impl Lexer {
    /// Constructs a lexer reporting lexical diagnostics via [`log`].
    pub fn new() -> Result<Self, DfaError> {
        Self::with_sink(Box::new(LogSink))
    }

    /// Constructs a lexer reporting lexical diagnostics to `sink`.
    pub fn with_sink(sink: Box<dyn DiagnosticSink>) -> Result<Self, DfaError> {
        let dfas = build_dfas()?;
        let alive = vec![false; dfas.len()];
        Ok(Self {
            input: String::new(),
            pos: 0,
            line: 1,
            column: 1,
            dfas,
            alive,
            sink,
        })
    }

    /// Test-only constructor with a custom automaton set.
    #[cfg(test)]
    fn with_dfas(dfas: Vec<Dfa>, sink: Box<dyn DiagnosticSink>) -> Self {
        let alive = vec![false; dfas.len()];
        Self {
            input: String::new(),
            pos: 0,
            line: 1,
            column: 1,
            dfas,
            alive,
            sink,
        }
    }

    /// Replaces the input text and rewinds to line 1, column 1.
    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_owned();
        self.reset();
    }

    /// Rewinds to the start of the current input text.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.line = 1;
        self.column = 1;
    }

    /// Returns `true` iff unconsumed input remains after skipping
    /// whitespace from the current position.
    pub fn has_next(&self) -> bool {
        let bytes = self.input.as_bytes();
        let mut pos = self.pos;
        while pos < bytes.len() && is_whitespace(bytes[pos] as char) {
            pos += 1;
        }
        pos < bytes.len()
    }

    /// Attempts to produce the next token.
    ///
    /// Returns `None` at end of input, and also when no automaton
    /// accepts at the current position; in the latter case a
    /// diagnostic is reported, the scan advances one character, and
    /// the caller's `has_next`/`next` loop retries from there.
    pub fn next(&mut self) -> Option<Token> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        let start_line = self.line;
        let start_column = self.column;

        for (index, dfa) in self.dfas.iter_mut().enumerate() {
            dfa.init();
            self.alive[index] = true;
        }

        // (position after the match, line, column, winning automaton)
        let mut accepted: Option<(usize, usize, usize, usize)> = None;
        let mut have_survivor = true;
        let string_dfa = self.string_dfa();
        let bytes = self.input.as_bytes();

        while self.pos < bytes.len() && have_survivor {
            let symbol = bytes[self.pos] as char;
            // whitespace ends the attempt unless a string literal is open
            if is_whitespace(symbol) && !self.alive[string_dfa] {
                break;
            }

            let (next_line, next_column) = if symbol == '\n' {
                (self.line + 1, 1)
            } else {
                (self.line, self.column + 1)
            };

            have_survivor = false;
            for (index, dfa) in self.dfas.iter_mut().enumerate() {
                if !self.alive[index] {
                    continue;
                }
                if !dfa.evaluate(symbol).unwrap_or(false) {
                    self.alive[index] = false;
                } else {
                    have_survivor = true;
                    if dfa.is_accepted() {
                        // later automata override earlier ones here:
                        // last-registered-wins on simultaneous acceptance
                        accepted = Some((self.pos + 1, next_line, next_column, index));
                    }
                }
            }

            self.line = next_line;
            self.column = next_column;
            self.pos += 1;
        }

        if let Some((end, line, column, winner)) = accepted {
            let lexeme = self.input[start..end].to_owned();
            self.pos = end;
            self.line = line;
            self.column = column;
            return Some(Token::new(
                self.dfas[winner].kind(),
                lexeme,
                start_line,
                start_column,
            ));
        }

        // no automaton ever accepted: report, skip one character, retry
        let offender = bytes[start] as char;
        self.sink.report(Diagnostic {
            message: format!("no valid token found for character {offender:?}"),
            line: start_line,
            column: start_column,
        });
        self.pos = start + 1;
        if offender == '\n' {
            self.line = start_line + 1;
            self.column = 1;
        } else {
            self.line = start_line;
            self.column = start_column + 1;
        }
        None
    }

    /// Materializes the full token sequence for `input`, restarting
    /// the lexer on it first.
    pub fn tokenize(&mut self, input: &str) -> Vec<Token> {
        self.set_input(input);
        let mut tokens = Vec::new();
        while self.has_next() {
            if let Some(token) = self.next() {
                tokens.push(token);
            }
        }
        tokens
    }

    /// The index of the string-literal automaton, whose liveness
    /// suppresses the whitespace boundary.
    fn string_dfa(&self) -> usize {
        // the test-only constructor may install fewer automata
        STRING_DFA.min(self.dfas.len().saturating_sub(1))
    }

    /// Consumes insignificant whitespace, tracking line and column.
    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && is_whitespace(bytes[self.pos] as char) {
            if bytes[self.pos] == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }
}

/// Returns `true` for the four insignificant whitespace characters.
fn is_whitespace(symbol: char) -> bool {
    matches!(symbol, ' ' | '\t' | '\n' | '\r')
}

/// Builds and releases the nine automata in registration order:
/// number, identifier, times, plus, left paren, right paren, assign,
/// semicolon, string.
fn build_dfas() -> Result<Vec<Dfa>, DfaError> {
    Ok(vec![
        number_dfa()?,
        identifier_dfa()?,
        literal_dfa('*', TokenKind::Times)?,
        literal_dfa('+', TokenKind::Plus)?,
        literal_dfa('(', TokenKind::LeftParen)?,
        literal_dfa(')', TokenKind::RightParen)?,
        assign_dfa()?,
        literal_dfa(';', TokenKind::Semicolon)?,
        string_dfa()?,
    ])
}

/// Recognizes `[0-9]+` with a digit self-loop on the accepting state.
fn number_dfa() -> Result<Dfa, DfaError> {
    let mut dfa = Dfa::new(2, DIGIT_ALPHABET, TokenKind::Number);
    for digit in DIGIT_ALPHABET.chars() {
        dfa.add_transition(0, digit, 1)?;
        dfa.add_transition(1, digit, 1)?;
    }
    dfa.set_final_state(1)?;
    dfa.release();
    Ok(dfa)
}

/// Recognizes `[A-Za-z_][A-Za-z0-9_]*`.
fn identifier_dfa() -> Result<Dfa, DfaError> {
    let mut dfa = Dfa::new(2, IDENTIFIER_ALPHABET, TokenKind::Identifier);
    for symbol in IDENTIFIER_ALPHABET.chars() {
        if !symbol.is_ascii_digit() {
            dfa.add_transition(0, symbol, 1)?;
        }
        dfa.add_transition(1, symbol, 1)?;
    }
    dfa.set_final_state(1)?;
    dfa.release();
    Ok(dfa)
}

/// Recognizes exactly one fixed character.
fn literal_dfa(symbol: char, kind: TokenKind) -> Result<Dfa, DfaError> {
    let mut dfa = Dfa::new(2, &symbol.to_string(), kind);
    dfa.add_transition(0, symbol, 1)?;
    dfa.set_final_state(1)?;
    dfa.release();
    Ok(dfa)
}

/// Recognizes the two-character assignment operator `<-`.
fn assign_dfa() -> Result<Dfa, DfaError> {
    let mut dfa = Dfa::new(3, "<-", TokenKind::Assign);
    dfa.add_transition(0, '<', 1)?;
    dfa.add_transition(1, '-', 2)?;
    dfa.set_final_state(2)?;
    dfa.release();
    Ok(dfa)
}

/// Recognizes a double-quoted string literal whose body may contain
/// any printable character except the quote itself.
fn string_dfa() -> Result<Dfa, DfaError> {
    let alphabet = string_alphabet();
    let mut dfa = Dfa::new(3, &alphabet, TokenKind::Str);
    dfa.add_transition(0, '"', 1)?;
    dfa.add_transition(1, '"', 2)?;
    for symbol in alphabet.chars() {
        if symbol != '"' {
            dfa.add_transition(1, symbol, 1)?;
        }
    }
    dfa.set_final_state(2)?;
    dfa.release();
    Ok(dfa)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::diag::CollectingSink;

    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|token| token.kind).collect()
    }

    fn lexemes(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|token| token.lexeme.as_str()).collect()
    }

    #[test]
    fn empty_and_whitespace_inputs_yield_no_tokens() {
        let mut lexer = Lexer::new().unwrap();
        assert!(lexer.tokenize("").is_empty());
        assert!(lexer.tokenize(" \t\r\n  \n").is_empty());
        assert!(!lexer.has_next());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn tokenizes_a_simple_statement() {
        let mut lexer = Lexer::new().unwrap();
        let tokens = lexer.tokenize("total <- 12 + 3 * (x);");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Times,
                TokenKind::LeftParen,
                TokenKind::Identifier,
                TokenKind::RightParen,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(
            lexemes(&tokens),
            vec!["total", "<-", "12", "+", "3", "*", "(", "x", ")", ";"]
        );
    }

    #[test]
    fn assign_is_a_single_maximal_munch_token() {
        let mut lexer = Lexer::new().unwrap();
        let tokens = lexer.tokenize("<-");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Assign);
        assert_eq!(tokens[0].lexeme, "<-");
    }

    #[test]
    fn numbers_and_identifiers_are_greedy() {
        let mut lexer = Lexer::new().unwrap();
        let tokens = lexer.tokenize("count2026 12345");
        assert_eq!(lexemes(&tokens), vec!["count2026", "12345"]);
        assert_eq!(kinds(&tokens), vec![TokenKind::Identifier, TokenKind::Number]);
    }

    #[test]
    fn string_literals_may_contain_whitespace() {
        let mut lexer = Lexer::new().unwrap();
        let tokens = lexer.tokenize("greeting <- \"hello world\";");
        assert_eq!(kinds(&tokens)[2], TokenKind::Str);
        assert_eq!(tokens[2].lexeme, "\"hello world\"");
    }

    #[test]
    fn tracks_lines_and_columns() {
        let mut lexer = Lexer::new().unwrap();
        let tokens = lexer.tokenize("a <- 1;\n  b <- 2;");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 3));
        assert_eq!((tokens[4].line, tokens[4].column), (2, 3));
    }

    #[test]
    fn unknown_characters_are_skipped_with_a_diagnostic() {
        let sink = Rc::new(RefCell::new(CollectingSink::default()));
        let mut lexer = Lexer::with_sink(Box::new(Rc::clone(&sink))).unwrap();

        let tokens = lexer.tokenize("a @ b");
        assert_eq!(lexemes(&tokens), vec!["a", "b"]);

        let diagnostics = sink.borrow().diagnostics.clone();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains('@'));
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (1, 3));
    }

    #[test]
    fn unterminated_strings_fall_back_to_character_recovery() {
        // the open quote never accepts, so it is skipped and the
        // body is re-scanned as ordinary tokens
        let sink = Rc::new(RefCell::new(CollectingSink::default()));
        let mut lexer = Lexer::with_sink(Box::new(Rc::clone(&sink))).unwrap();

        let tokens = lexer.tokenize("a <- \"oops;");
        assert_eq!(lexemes(&tokens), vec!["a", "<-", "oops", ";"]);
        assert_eq!(sink.borrow().diagnostics.len(), 1);
        assert!(sink.borrow().diagnostics[0].message.contains('"'));
    }

    #[test]
    fn lone_angle_bracket_is_a_lexical_error() {
        // '<' only accepts once followed by '-', so "a < 1" drops the '<'
        let sink = Rc::new(RefCell::new(CollectingSink::default()));
        let mut lexer = Lexer::with_sink(Box::new(Rc::clone(&sink))).unwrap();

        let tokens = lexer.tokenize("a < 1;");
        assert_eq!(lexemes(&tokens), vec!["a", "1", ";"]);
        assert_eq!(sink.borrow().diagnostics.len(), 1);
    }

    #[test]
    fn retokenizing_after_reset_is_idempotent() {
        let mut lexer = Lexer::new().unwrap();
        let first = lexer.tokenize("x <- (a + b) * c;");
        lexer.reset();

        let mut second = Vec::new();
        while lexer.has_next() {
            if let Some(token) = lexer.next() {
                second.push(token);
            }
        }
        assert_eq!(first, second);
    }

    #[test]
    fn streaming_interface_matches_tokenize() {
        let mut lexer = Lexer::new().unwrap();
        let expected = lexer.tokenize("a <- 1; b <- 2;");

        lexer.set_input("a <- 1; b <- 2;");
        let mut streamed = Vec::new();
        while lexer.has_next() {
            if let Some(token) = lexer.next() {
                streamed.push(token);
            }
        }
        assert_eq!(expected, streamed);
    }

    #[test]
    fn simultaneous_accepts_resolve_to_the_last_registered_automaton() {
        // two automata that both accept the single character 'x';
        // registration order decides, so Times must win over Plus
        let first = {
            let mut dfa = Dfa::new(2, "x", TokenKind::Plus);
            dfa.add_transition(0, 'x', 1).unwrap();
            dfa.set_final_state(1).unwrap();
            dfa.release();
            dfa
        };
        let second = {
            let mut dfa = Dfa::new(2, "x", TokenKind::Times);
            dfa.add_transition(0, 'x', 1).unwrap();
            dfa.set_final_state(1).unwrap();
            dfa.release();
            dfa
        };

        let mut lexer = Lexer::with_dfas(vec![first, second], Box::new(LogSink));
        let tokens = lexer.tokenize("x");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Times);
    }

    #[test]
    fn longer_matches_beat_earlier_accepts() {
        // the identifier automaton accepts at 'a', but keeps matching
        // to the end of the word rather than stopping early
        let mut lexer = Lexer::new().unwrap();
        let tokens = lexer.tokenize("abc_123");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].lexeme, "abc_123");
    }
}
