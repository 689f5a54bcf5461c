//! Folds a concrete parse tree into an [`Ast`].
//!
//! The builder accepts both tree shapes the parsers produce. The
//! predictive parser derives expressions through the right-recursive
//! `Expression'`/`Term'` tails, so their operator chains are folded
//! left here to restore left associativity; the SLR parser derives
//! them through the left-recursive rules, where the structure is
//! already correct. Either way the same [`Ast`] comes out.

use crate::parser::tree::{NodeId, ParseTree};
use crate::parser::ParseError;

use super::{Assign, Ast, Expr};

/// Folds the tree hanging off `root` into an [`Ast`].
///
/// `root` is the synthetic node above `Program`. The only user-level
/// failure here is an out-of-range number literal; any other failure
/// is a malformed tree, which no accepted input can produce.
pub fn build(tree: &ParseTree, root: NodeId) -> Result<Ast, ParseError> {
    let &[program] = tree.children(root) else {
        return Err(malformed(tree, root, "root"));
    };
    let &[list] = tree.children(program) else {
        return Err(malformed(tree, program, "Program"));
    };

    let mut statements = Vec::new();
    let mut current = list;
    loop {
        match *tree.children(current) {
            [] => break,
            [statement, rest] => {
                statements.push(self::statement(tree, statement)?);
                current = rest;
            }
            _ => return Err(malformed(tree, current, "StatementList")),
        }
    }
    Ok(Ast { statements })
}

/// Folds a `Statement` node: `identifier assign Expression semicolon`.
fn statement(tree: &ParseTree, node: NodeId) -> Result<Assign, ParseError> {
    let &[target, _assign, value, _semicolon] = tree.children(node) else {
        return Err(malformed(tree, node, "Statement"));
    };
    Ok(Assign {
        target: tree.label(target).to_owned(),
        value: expression(tree, value)?,
    })
}

/// Folds an `Expression` node of either shape.
fn expression(tree: &ParseTree, node: NodeId) -> Result<Expr, ParseError> {
    match *tree.children(node) {
        // Expression -> Term
        [child] => term(tree, child),
        // Expression -> Term Expression'
        [first, tail] => {
            let lhs = term(tree, first)?;
            expression_tail(tree, tail, lhs)
        }
        // Expression -> Expression plus Term
        [lhs, _plus, rhs] => Ok(Expr::plus(expression(tree, lhs)?, term(tree, rhs)?)),
        _ => Err(malformed(tree, node, "Expression")),
    }
}

/// Folds an `Expression'` tail left onto `acc`.
fn expression_tail(tree: &ParseTree, node: NodeId, acc: Expr) -> Result<Expr, ParseError> {
    match *tree.children(node) {
        [] => Ok(acc),
        // Expression' -> plus Term Expression'
        [_plus, operand, tail] => {
            let rhs = term(tree, operand)?;
            expression_tail(tree, tail, Expr::plus(acc, rhs))
        }
        _ => Err(malformed(tree, node, "Expression'")),
    }
}

/// Folds a `Term` node of either shape.
fn term(tree: &ParseTree, node: NodeId) -> Result<Expr, ParseError> {
    match *tree.children(node) {
        // Term -> Factor
        [child] => factor(tree, child),
        // Term -> Factor Term'
        [first, tail] => {
            let lhs = factor(tree, first)?;
            term_tail(tree, tail, lhs)
        }
        // Term -> Term times Factor
        [lhs, _times, rhs] => Ok(Expr::times(term(tree, lhs)?, factor(tree, rhs)?)),
        _ => Err(malformed(tree, node, "Term")),
    }
}

/// Folds a `Term'` tail left onto `acc`.
fn term_tail(tree: &ParseTree, node: NodeId, acc: Expr) -> Result<Expr, ParseError> {
    match *tree.children(node) {
        [] => Ok(acc),
        // Term' -> times Factor Term'
        [_times, operand, tail] => {
            let rhs = factor(tree, operand)?;
            term_tail(tree, tail, Expr::times(acc, rhs))
        }
        _ => Err(malformed(tree, node, "Term'")),
    }
}

/// Folds a `Factor` node: a single leaf, or a parenthesized
/// expression whose parentheses are dropped.
fn factor(tree: &ParseTree, node: NodeId) -> Result<Expr, ParseError> {
    match *tree.children(node) {
        [child] => leaf(tree, child),
        // Factor -> left_paren Expression right_paren
        [_open, inner, _close] => expression(tree, inner),
        _ => Err(malformed(tree, node, "Factor")),
    }
}

/// Classifies a terminal leaf by its lexeme.
fn leaf(tree: &ParseTree, node: NodeId) -> Result<Expr, ParseError> {
    let lexeme = tree.label(node);
    if lexeme.starts_with('"') {
        Ok(Expr::Str(lexeme.to_owned()))
    } else if lexeme.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        let value = lexeme
            .parse()
            .map_err(|_| ParseError::NumberOutOfRange(lexeme.to_owned()))?;
        Ok(Expr::Number(value))
    } else {
        Ok(Expr::identifier(lexeme))
    }
}

/// Builds the [`ParseError::MalformedParseTree`] for a node whose
/// child count matches no production of `expected`.
fn malformed(tree: &ParseTree, node: NodeId, expected: &str) -> ParseError {
    ParseError::MalformedParseTree(format!(
        "{expected} node {:?} has {} children",
        tree.label(node),
        tree.children(node).len(),
    ))
}
