//! The table-driven SLR(1) bottom-up parser.

use crate::ast::{build, Ast};
use crate::grammar::{Action, SlrTables, ROOT_LABEL};
use crate::lexer::Lexer;

use super::tree::{NodeId, ParseTree};
use super::{advance, ParseError, Parser};

/// A shift-reduce parser driven by the grammar's SLR(1) tables.
///
/// The parse stack holds automaton states paired with the tree nodes
/// for the symbols recognized so far; the bottom entry carries state
/// 0 and no node. A shift pushes a leaf labelled with the token's
/// lexeme; a reduce pops one production's worth of entries, attaches
/// their nodes under a fresh nonterminal node in source order, and
/// follows the goto table.
#[derive(Debug)]
pub struct SlrParser {
    /// The token source.
    lexer: Lexer,
    /// The fixed action and goto tables.
    tables: SlrTables,
}

impl SlrParser {
    /// Constructs a parser reporting lexical diagnostics via [`log`].
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self::with_lexer(Lexer::new()?))
    }

    /// Constructs a parser around an existing lexer.
    pub fn with_lexer(lexer: Lexer) -> Self {
        Self {
            lexer,
            tables: SlrTables::new(),
        }
    }

    /// Runs the shift-reduce parse and returns the concrete tree with
    /// its root node.
    pub fn parse_tree(&mut self, source: &str) -> Result<(ParseTree, NodeId), ParseError> {
        self.lexer.set_input(source);

        let mut tree = ParseTree::new();
        let mut stack: Vec<(Option<NodeId>, usize)> = vec![(None, 0)];
        let mut lookahead = advance(&mut self.lexer);

        loop {
            // the stack is never empty: the bottom entry is only
            // removed on accept
            let &(_, state) = stack.last().unwrap();
            let action = self
                .tables
                .action(state, lookahead.kind.grammar_name())
                .ok_or_else(|| ParseError::unexpected_in_state(state, &lookahead))?;

            match action {
                Action::Shift(next) => {
                    let leaf = tree.push(lookahead.lexeme.clone());
                    stack.push((Some(leaf), next));
                    lookahead = advance(&mut self.lexer);
                }
                Action::Reduce(production) => {
                    let node = tree.push(production.lhs);
                    let mut popped = Vec::with_capacity(production.rhs.len());
                    for _ in production.rhs {
                        let (child, _) = stack.pop().ok_or_else(|| {
                            ParseError::MalformedParseTree(format!(
                                "reduce of {} underflowed the parse stack",
                                production.lhs
                            ))
                        })?;
                        popped.push(child);
                    }
                    // popped comes off in reverse source order
                    for child in popped.into_iter().rev().flatten() {
                        tree.add_child(node, child);
                    }

                    let &(_, uncovered) = stack.last().ok_or_else(|| {
                        ParseError::MalformedParseTree(format!(
                            "reduce of {} emptied the parse stack",
                            production.lhs
                        ))
                    })?;
                    let next = self.tables.goto(uncovered, production.lhs).ok_or(
                        ParseError::MissingGoto {
                            state: uncovered,
                            symbol: production.lhs.to_owned(),
                        },
                    )?;
                    stack.push((Some(node), next));
                }
                Action::Accept => {
                    let &(program, _) = stack.last().unwrap();
                    let program = program.ok_or_else(|| {
                        ParseError::MalformedParseTree("accept without a Program node".into())
                    })?;
                    let root = tree.push(ROOT_LABEL);
                    tree.add_child(root, program);
                    return Ok((tree, root));
                }
            }
        }
    }
}

impl Parser for SlrParser {
    fn parse(&mut self, source: &str) -> Result<Ast, ParseError> {
        let (tree, root) = self.parse_tree(source)?;
        build::build(&tree, root)
    }
}

impl ParseError {
    /// Builds the error for a lookahead with no action table entry.
    fn unexpected_in_state(state: usize, token: &crate::token::Token) -> Self {
        if token.kind == crate::token::TokenKind::Eof {
            ParseError::UnexpectedEnd {
                expected: "a complete statement".into(),
            }
        } else {
            ParseError::MissingAction {
                state,
                found: token.to_string(),
                line: token.line,
                column: token.column,
            }
        }
    }
}
