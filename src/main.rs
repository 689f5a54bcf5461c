//! A compiler front end for the SCPL language.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod ast;
pub mod cli;
pub mod diag;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod semant;
pub mod token;

fn main() -> anyhow::Result<()> {
    better_panic::install();
    let cli: cli::Cli = argh::from_env();
    cli.handle()
}
