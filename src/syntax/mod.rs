//! Parsing collaborator: `.proto` source text to a [`ParsedFile`].
//!
//! The generator only depends on the [`ProtoParser`] trait. The bundled
//! [`ProtoFileParser`] understands the declaration subset the generator
//! renders (packages, imports, messages, enums, services) and skips options,
//! reservations and extensions.

mod lexer;
mod parser;

use thiserror::Error;

use crate::base::LineCol;
use crate::schema::{ParseOptions, ParsedFile};

pub use lexer::{Lexeme, Token, lex};
pub use parser::camel_case;

/// Turns source text into a declaration tree.
pub trait ProtoParser {
    fn parse(&self, source: &str, options: ParseOptions) -> Result<ParsedFile, ParseError>;
}

impl<P: ProtoParser + ?Sized> ProtoParser for &P {
    fn parse(&self, source: &str, options: ParseOptions) -> Result<ParsedFile, ParseError> {
        (**self).parse(source, options)
    }
}

/// The built-in `.proto` parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProtoFileParser;

impl ProtoParser for ProtoFileParser {
    fn parse(&self, source: &str, options: ParseOptions) -> Result<ParsedFile, ParseError> {
        parser::Parser::new(source, options)?.parse_file()
    }
}

/// Malformed input, with the position where parsing stopped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: LineCol,
}
