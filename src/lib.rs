use std::io;

use token::Spanned;

/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into an AST.
pub mod parser;

/// The lowering pass takes an AST and appends its instructions to the basic
/// blocks of a block table.
pub mod lower;

/// The emitter walks the control flow graph, writing the target text.
pub mod emit;

/// Runs the whole pipeline over one source string.
pub mod driver;

pub mod ast;
pub mod ir;
pub mod token;

pub mod util {
    pub mod fmt;
    #[cfg(test)]
    pub(crate) mod test_utils;
}

/// Any error that stops a compilation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0:#}")]
    Lex(#[from] Spanned<lexer::Error>),
    #[error("{0:#}")]
    Parse(#[from] Spanned<parser::Error>),
    #[error("{0:#}")]
    Lower(#[from] Spanned<lower::Error>),
    #[error(transparent)]
    Emit(#[from] emit::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}
