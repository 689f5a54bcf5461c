//! The abstract syntax tree for an SCPL program.
//!
//! The AST is the common output format of both parsing strategies:
//! all grammar bookkeeping (statement-list spines, primed expression
//! tails, parenthesization) is folded away, and associativity and
//! precedence survive only as structure. `a <- 1 + 2 + 3 * x;`
//! becomes `Plus(Plus(1, 2), Times(3, x))` no matter which parser
//! produced it.

use std::fmt;

pub mod build;

/// A whole program: its statements in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ast {
    /// The assignment statements, in source order.
    pub statements: Vec<Assign>,
}

/// A single assignment statement `target <- value;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    /// The identifier being assigned to.
    pub target: String,
    /// The expression whose value is assigned.
    pub value: Expr,
}

/// An SCPL expression.
///
/// The operator variants hold their operands in source order, so a
/// left-associative chain leans left: the left operand of the
/// outermost node is the rest of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A variable reference.
    Identifier(String),
    /// An unsigned decimal integer literal.
    Number(u64),
    /// A string literal, kept in its raw quoted form.
    Str(String),
    /// A binary addition `lhs + rhs`.
    Plus(Box<Expr>, Box<Expr>),
    /// A binary multiplication `lhs * rhs`.
    Times(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Builds a [`Expr::Plus`] node without the caller boxing.
    pub fn plus(lhs: Expr, rhs: Expr) -> Self {
        Expr::Plus(Box::new(lhs), Box::new(rhs))
    }

    /// Builds a [`Expr::Times`] node without the caller boxing.
    pub fn times(lhs: Expr, rhs: Expr) -> Self {
        Expr::Times(Box::new(lhs), Box::new(rhs))
    }

    /// Builds an [`Expr::Identifier`] node.
    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }
}

impl fmt::Display for Expr {
    /// Renders the expression as a fully parenthesized s-expression,
    /// e.g. `(+ (* 2 x) 1)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{name}"),
            Expr::Number(value) => write!(f, "{value}"),
            Expr::Str(raw) => write!(f, "{raw}"),
            Expr::Plus(lhs, rhs) => write!(f, "(+ {lhs} {rhs})"),
            Expr::Times(lhs, rhs) => write!(f, "(* {lhs} {rhs})"),
        }
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(<- {} {})", self.target, self.value)
    }
}

impl fmt::Display for Ast {
    /// Renders one statement per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_fully_parenthesized() {
        let expr = Expr::plus(
            Expr::plus(Expr::Number(1), Expr::Number(2)),
            Expr::times(Expr::Number(3), Expr::identifier("x")),
        );
        assert_eq!(expr.to_string(), "(+ (+ 1 2) (* 3 x))");
    }

    #[test]
    fn display_keeps_string_quotes() {
        let statement = Assign {
            target: "greeting".into(),
            value: Expr::Str("\"hi\"".into()),
        };
        assert_eq!(statement.to_string(), "(<- greeting \"hi\")");
    }
}
