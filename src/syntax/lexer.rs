//! Token definitions for `.proto` sources.
//!
//! Keywords are not separate tokens: protobuf keywords are contextual
//! (`message` is a legal field name), so the parser matches identifier text.
//! Newlines and comments are kept as tokens because comment attachment
//! depends on them.

use logos::Logos;
use text_size::{TextRange, TextSize};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    /// Plain or dotted identifier, optionally fully qualified (`.pkg.Type`).
    #[regex(r"\.?[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*")]
    Ident,

    #[regex(r"-?(0[xX][0-9a-fA-F]+|[0-9]+)")]
    Int,

    #[regex(r"-?([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?")]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    Str,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token(":")]
    Colon,
    #[token("-")]
    Minus,
}

impl Token {
    pub fn is_trivia(self) -> bool {
        matches!(self, Token::Newline | Token::LineComment | Token::BlockComment)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }
}

/// A token together with its text and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'src> {
    pub kind: Token,
    pub text: &'src str,
    pub range: TextRange,
}

/// Tokenize a source file. On failure returns the range of the offending text.
pub fn lex(source: &str) -> Result<Vec<Lexeme<'_>>, TextRange> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        match result {
            Ok(kind) => tokens.push(Lexeme { kind, text: lexer.slice(), range }),
            Err(()) => return Err(range),
        }
    }

    Ok(tokens)
}
