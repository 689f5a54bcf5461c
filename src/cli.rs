//! The command-line interface for `scplc`.
//!
//! Usage (as with any other [`argh`] interface) involves first
//! invoking [`argh::from_env()`], and then processing the resulting
//! [`Cli`] instance with [`Cli::handle`].

use std::path::PathBuf;
use std::str::FromStr;

use argh::FromArgs;

use crate::parser::{ll1::Ll1Parser, slr::SlrParser, ParseError, Parser};
use crate::semant::{TypeChecker, STDIN, STDOUT};

/// A compiler front end for the SCPL programming language.
#[derive(Debug, Clone, FromArgs)]
pub struct Cli {
    /// the subcommand to run
    #[argh(subcommand)]
    cmd: CliSubCommand,
}

impl Cli {
    /// Consumes `self` and processes the given subcommand.
    pub fn handle(self) -> anyhow::Result<()> {
        match self.cmd {
            CliSubCommand::Ast(args) => args.run(),
            CliSubCommand::Check(args) => args.run(),
        }
    }
}

/// The set of the distinct subcommands available to be passed to the [`Cli`].
#[derive(Debug, Clone, FromArgs)]
#[argh(subcommand)]
enum CliSubCommand {
    /// Print the AST of a source file.
    Ast(AstArgs),
    /// Type check a source file.
    Check(CheckArgs),
}

/// Parses an .scpl file and prints its abstract syntax tree, one
/// statement per line in fully parenthesized form.
#[derive(Debug, Clone, FromArgs)]
#[argh(subcommand, name = "ast")]
struct AstArgs {
    /// the parsing strategy, either "ll1" or "slr" (the default)
    #[argh(option, long = "parser", default = "Strategy::Slr")]
    strategy: Strategy,

    /// write the tree to this file instead of stdout
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// a path to an .scpl file
    #[argh(positional)]
    file: PathBuf,
}

impl AstArgs {
    /// Consumes `self` and prints the parsed tree.
    fn run(self) -> anyhow::Result<()> {
        let source = std::fs::read_to_string(&self.file)?;
        let ast = self.strategy.parse(&source)?;
        match self.output {
            Some(path) => std::fs::write(&path, ast.to_string())?,
            None => print!("{ast}"),
        }
        Ok(())
    }
}

/// Parses and type checks an .scpl file, printing the inferred type
/// of every variable on success.
#[derive(Debug, Clone, FromArgs)]
#[argh(subcommand, name = "check")]
struct CheckArgs {
    /// the parsing strategy, either "ll1" or "slr" (the default)
    #[argh(option, long = "parser", default = "Strategy::Slr")]
    strategy: Strategy,

    /// a path to an .scpl file
    #[argh(positional)]
    file: PathBuf,
}

impl CheckArgs {
    /// Consumes `self` and reports the inferred variable types.
    fn run(self) -> anyhow::Result<()> {
        let source = std::fs::read_to_string(&self.file)?;
        let ast = self.strategy.parse(&source)?;
        let environment = TypeChecker::new().check(&ast)?;

        let mut bindings: Vec<_> = environment
            .iter()
            .filter(|&(name, _)| name != STDIN && name != STDOUT)
            .collect();
        bindings.sort_unstable_by_key(|&(name, _)| name.to_owned());
        for (name, ty) in bindings {
            println!("{name}: {ty}");
        }
        Ok(())
    }
}

/// The parsing strategy selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// The top-down predictive parser.
    Ll1,
    /// The bottom-up shift-reduce parser.
    Slr,
}

impl Strategy {
    /// Parses `source` with the selected strategy.
    fn parse(self, source: &str) -> Result<crate::ast::Ast, ParseError> {
        match self {
            Strategy::Ll1 => Ll1Parser::new()?.parse(source),
            Strategy::Slr => SlrParser::new()?.parse(source),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ll1" => Ok(Strategy::Ll1),
            "slr" => Ok(Strategy::Slr),
            other => Err(format!("unknown strategy {other:?}, expected ll1 or slr")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_strategy_parser() {
        assert_eq!(Strategy::from_str("ll1"), Ok(Strategy::Ll1));
        assert_eq!(Strategy::from_str("slr"), Ok(Strategy::Slr));
        assert!(Strategy::from_str("lalr").is_err());
    }

    #[test]
    fn both_strategies_are_usable_from_the_cli() {
        let source = "a <- 1 + 2;";
        let ll1 = Strategy::Ll1.parse(source).unwrap();
        let slr = Strategy::Slr.parse(source).unwrap();
        assert_eq!(ll1, slr);
    }
}
