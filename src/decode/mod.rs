//! Lexing and parsing of save text into the document tree.

mod lexer;
mod parser;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, MAX_DEPTH};

use crate::error::ParseError;
use crate::types::SaveObject;

/// Parse a complete save document.
///
/// The top level of a save is a sequence of `key=value` properties; the
/// result is the object holding them in source order. Empty or
/// whitespace-only input is rejected.
pub fn parse(input: &str) -> Result<SaveObject, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }
    Parser::new(input).parse_document()
}
