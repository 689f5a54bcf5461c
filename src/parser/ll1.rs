//! The table-driven LL(1) predictive parser.

use crate::ast::{build, Ast};
use crate::grammar::{is_terminal, PredictiveTable, END_MARKER, ROOT_LABEL, START_SYMBOL};
use crate::lexer::Lexer;
use crate::token::TokenKind;

use super::tree::{NodeId, ParseTree};
use super::{advance, ParseError, Parser};

/// A predictive parser driven by the grammar's LL(1) table.
///
/// The parser keeps an explicit stack of grammar symbols paired with
/// their parse tree nodes. Terminals on top are matched against the
/// lookahead; nonterminals are expanded through the table, with the
/// production's symbols pushed in reverse so that the leftmost is
/// handled first. Matched terminal nodes take their token's lexeme
/// as label.
#[derive(Debug)]
pub struct Ll1Parser {
    /// The token source.
    lexer: Lexer,
    /// The fixed predictive table.
    table: PredictiveTable,
}

impl Ll1Parser {
    /// Constructs a parser reporting lexical diagnostics via [`log`].
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self::with_lexer(Lexer::new()?))
    }

    /// Constructs a parser around an existing lexer.
    pub fn with_lexer(lexer: Lexer) -> Self {
        Self {
            lexer,
            table: PredictiveTable::new(),
        }
    }

    /// Runs the predictive parse and returns the concrete tree with
    /// its root node.
    pub fn parse_tree(&mut self, source: &str) -> Result<(ParseTree, NodeId), ParseError> {
        self.lexer.set_input(source);

        let mut tree = ParseTree::new();
        let root = tree.push(ROOT_LABEL);
        let program = tree.push(START_SYMBOL);
        tree.add_child(root, program);

        let mut stack: Vec<(String, NodeId)> = vec![(START_SYMBOL.to_owned(), program)];
        let mut lookahead = advance(&mut self.lexer);

        while let Some((symbol, node)) = stack.pop() {
            if is_terminal(&symbol) {
                if symbol != lookahead.kind.grammar_name() {
                    return Err(ParseError::unexpected(&lookahead, symbol));
                }
                tree.set_label(node, lookahead.lexeme.clone());
                lookahead = advance(&mut self.lexer);
                continue;
            }

            let key = lookahead.kind.grammar_name();
            let rhs = self
                .table
                .lookup(&symbol, key)
                .or_else(|| self.table.lookup(&symbol, END_MARKER))
                .ok_or_else(|| {
                    if lookahead.kind == TokenKind::Eof {
                        ParseError::UnexpectedEnd {
                            expected: symbol.clone(),
                        }
                    } else {
                        ParseError::MissingProduction {
                            nonterminal: symbol.clone(),
                            found: lookahead.to_string(),
                            line: lookahead.line,
                            column: lookahead.column,
                        }
                    }
                })?;

            // attach children left to right, then push them reversed
            // so the leftmost symbol is expanded next
            let children: Vec<NodeId> = rhs
                .iter()
                .map(|&child_symbol| {
                    let child = tree.push(child_symbol);
                    tree.add_child(node, child);
                    child
                })
                .collect();
            for (&child_symbol, &child) in rhs.iter().zip(&children).rev() {
                stack.push((child_symbol.to_owned(), child));
            }
        }

        if lookahead.kind != TokenKind::Eof {
            return Err(ParseError::TrailingInput {
                found: lookahead.to_string(),
            });
        }
        Ok((tree, root))
    }
}

impl Parser for Ll1Parser {
    fn parse(&mut self, source: &str) -> Result<Ast, ParseError> {
        let (tree, root) = self.parse_tree(source)?;
        build::build(&tree, root)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Expr;

    use super::*;

    fn parse(source: &str) -> Result<Ast, ParseError> {
        Ll1Parser::new().unwrap().parse(source)
    }

    #[test]
    fn empty_input_is_an_empty_program() {
        let ast = parse("").unwrap();
        assert!(ast.statements.is_empty());
    }

    #[test]
    fn statements_come_out_in_source_order() {
        let ast = parse("a <- 1; b <- a; c <- \"hi\";").unwrap();
        let targets: Vec<&str> = ast
            .statements
            .iter()
            .map(|statement| statement.target.as_str())
            .collect();
        assert_eq!(targets, ["a", "b", "c"]);
        assert_eq!(ast.statements[2].value, Expr::Str("\"hi\"".into()));
    }

    #[test]
    fn times_binds_tighter_than_plus() {
        let ast = parse("a <- b + c * d;").unwrap();
        assert_eq!(
            ast.statements[0].value,
            Expr::plus(
                Expr::identifier("b"),
                Expr::times(Expr::identifier("c"), Expr::identifier("d")),
            )
        );
    }

    #[test]
    fn operators_associate_left() {
        let ast = parse("a <- 1 + 2 + 3;").unwrap();
        assert_eq!(ast.statements[0].value.to_string(), "(+ (+ 1 2) 3)");

        let ast = parse("a <- 1 * 2 * 3;").unwrap();
        assert_eq!(ast.statements[0].value.to_string(), "(* (* 1 2) 3)");
    }

    #[test]
    fn parentheses_override_precedence() {
        let ast = parse("a <- (b + c) * d;").unwrap();
        assert_eq!(ast.statements[0].value.to_string(), "(* (+ b c) d)");
    }

    #[test]
    fn truncated_statement_is_rejected() {
        assert!(matches!(
            parse("a <-"),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn statement_must_start_with_an_identifier() {
        assert!(parse("<- 1;").is_err());
        assert!(parse("1 <- a;").is_err());
    }

    #[test]
    fn missing_semicolon_is_rejected() {
        assert!(parse("a <- 1").is_err());
    }

    #[test]
    fn lexically_invalid_operator_is_a_parse_error() {
        // "<" alone lexes to nothing, so the parser sees "a 1 ;"
        assert!(parse("a < 1;").is_err());
    }
}
