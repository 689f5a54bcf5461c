//! Static type checking over the [`Ast`].
//!
//! SCPL has two value types, numbers and strings, plus the two
//! built-in stream pseudo-variables `stdin` and `stdout`. Addition
//! requires matching operand types; multiplication additionally
//! allows a string times a number (repetition) in either order.
//! A variable takes the type of its first assignment and keeps it:
//! reassignment with a different type is an error. Reading `stdin`
//! yields a number, and anything writable may be sent to `stdout`;
//! streams themselves never take part in arithmetic.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::ast::{Assign, Ast, Expr};

/// The name of the built-in input stream.
pub const STDIN: &str = "stdin";

/// The name of the built-in output stream.
pub const STDOUT: &str = "stdout";

/// The types of the SCPL language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// An unsigned integer.
    Number,
    /// A string.
    Str,
    /// The read-only input stream.
    InStream,
    /// The write-only output stream.
    OutStream,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Number => "number",
            Type::Str => "string",
            Type::InStream => "input stream",
            Type::OutStream => "output stream",
        };
        write!(f, "{name}")
    }
}

/// The error type for type checking. The first error aborts the check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A variable was read before any assignment to it.
    #[error("variable {0} is used before assignment")]
    UndefinedVariable(String),
    /// A variable was reassigned with a different type.
    #[error("cannot assign a {value} to {target}, which holds a {existing}")]
    AssignMismatch {
        /// The variable being assigned to.
        target: String,
        /// The type the variable already holds.
        existing: Type,
        /// The type of the assigned expression.
        value: Type,
    },
    /// The input stream appeared as an assignment target.
    #[error("cannot assign to the input stream {0}")]
    AssignToInStream(String),
    /// The output stream appeared inside an expression.
    #[error("the output stream cannot be used as a value")]
    OutStreamValue,
    /// Addition of incompatible types.
    #[error("cannot add a {lhs} and a {rhs}")]
    InvalidAddition {
        /// The left operand's type.
        lhs: Type,
        /// The right operand's type.
        rhs: Type,
    },
    /// Multiplication of incompatible types.
    #[error("cannot multiply a {lhs} and a {rhs}")]
    InvalidMultiplication {
        /// The left operand's type.
        lhs: Type,
        /// The right operand's type.
        rhs: Type,
    },
}

/// The typing context, mapping variable names to their fixed types.
///
/// A fresh environment already binds [`STDIN`] and [`STDOUT`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEnvironment {
    /// The bindings established so far.
    bindings: HashMap<String, Type>,
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnvironment {
    /// Constructs an environment holding only the stream built-ins.
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(STDIN.to_owned(), Type::InStream);
        bindings.insert(STDOUT.to_owned(), Type::OutStream);
        Self { bindings }
    }

    /// Returns the type bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<Type> {
        self.bindings.get(name).copied()
    }

    /// Returns the bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Type)> {
        self.bindings.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Binds `name` to `ty`.
    fn bind(&mut self, name: &str, ty: Type) {
        self.bindings.insert(name.to_owned(), ty);
    }
}

/// Checks an entire program, statement by statement.
#[derive(Debug, Default)]
pub struct TypeChecker {
    /// The environment accumulated across statements.
    environment: TypeEnvironment,
}

impl TypeChecker {
    /// Constructs a checker with a fresh environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks `ast`, returning the final environment on success.
    pub fn check(mut self, ast: &Ast) -> Result<TypeEnvironment, TypeError> {
        for statement in &ast.statements {
            self.statement(statement)?;
        }
        Ok(self.environment)
    }

    /// Checks one assignment and updates the environment.
    fn statement(&mut self, statement: &Assign) -> Result<(), TypeError> {
        let value = self.operand(&statement.value)?;

        match self.environment.get(&statement.target) {
            None => {
                self.environment.bind(&statement.target, value);
                Ok(())
            }
            Some(Type::InStream) => {
                Err(TypeError::AssignToInStream(statement.target.clone()))
            }
            // anything writable may be sent to the output stream
            Some(Type::OutStream) => Ok(()),
            Some(existing) if existing == value => Ok(()),
            Some(existing) => Err(TypeError::AssignMismatch {
                target: statement.target.clone(),
                existing,
                value,
            }),
        }
    }

    /// Computes the type of an expression.
    fn expression(&self, expression: &Expr) -> Result<Type, TypeError> {
        match expression {
            Expr::Number(_) => Ok(Type::Number),
            Expr::Str(_) => Ok(Type::Str),
            Expr::Identifier(name) => self
                .environment
                .get(name)
                .ok_or_else(|| TypeError::UndefinedVariable(name.clone())),
            Expr::Plus(lhs, rhs) => {
                let lhs = self.operand(lhs)?;
                let rhs = self.operand(rhs)?;
                match (lhs, rhs) {
                    (Type::Number, Type::Number) => Ok(Type::Number),
                    (Type::Str, Type::Str) => Ok(Type::Str),
                    _ => Err(TypeError::InvalidAddition { lhs, rhs }),
                }
            }
            Expr::Times(lhs, rhs) => {
                let lhs = self.operand(lhs)?;
                let rhs = self.operand(rhs)?;
                match (lhs, rhs) {
                    (Type::Number, Type::Number) => Ok(Type::Number),
                    (Type::Number, Type::Str) | (Type::Str, Type::Number) => Ok(Type::Str),
                    _ => Err(TypeError::InvalidMultiplication { lhs, rhs }),
                }
            }
        }
    }

    /// Computes the type of an operand, converting a read of the
    /// input stream into a number and rejecting the output stream.
    fn operand(&self, expression: &Expr) -> Result<Type, TypeError> {
        match self.expression(expression)? {
            Type::InStream => Ok(Type::Number),
            Type::OutStream => Err(TypeError::OutStreamValue),
            ty => Ok(ty),
        }
    }
}
