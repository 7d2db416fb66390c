//! Parser for the Jsonnet surface syntax.
//!
//! Produces the `jcat_ir` expression tree consumed by the resolver. The
//! whole language is accepted so real libraries parse, but only local
//! bindings, object literals, functions, imports, variables and field
//! indexing keep their structure; every other construct becomes an opaque
//! node tagged with its kind.
//!
//! ```text
//! source ──► lexer::tokenize ──► Vec<Token> ──► Parser ──► Expr
//! ```

mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::{tokenize, Token, TokenKind};

use jcat_ir::{Expr, StringInterner};

use crate::parser::Parser;

/// Parse a whole source file into its root expression.
///
/// Identifiers and field names are interned into `interner`, which must be
/// the interner shared by every file of the run.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str, interner: &StringInterner) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    tracing::trace!(count = tokens.len(), "tokenized");
    Parser::new(tokens, interner).parse_file()
}
