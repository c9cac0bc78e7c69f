//! Recursive-descent parser over the token stream.

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::ParseError;
use super::lexer::{Lexeme, Token, lex};
use crate::base::LineIndex;
use crate::schema::{
    Decl, Enum, EnumValue, Field, FieldRule, Message, Method, Namespace, Nested, ParseOptions,
    ParsedFile, Service,
};

pub(super) struct Parser<'src> {
    tokens: Vec<Lexeme<'src>>,
    pos: usize,
    line_index: LineIndex,
    source_len: TextSize,
    options: ParseOptions,
}

impl<'src> Parser<'src> {
    pub(super) fn new(source: &'src str, options: ParseOptions) -> Result<Self, ParseError> {
        let line_index = LineIndex::new(source);
        let tokens = lex(source).map_err(|range| ParseError {
            message: format!("unexpected character `{}`", &source[range]),
            position: line_index.start_of(range),
        })?;
        Ok(Self {
            tokens,
            pos: 0,
            line_index,
            source_len: TextSize::of(source),
            options,
        })
    }

    pub(super) fn parse_file(mut self) -> Result<ParsedFile, ParseError> {
        let mut package: Option<SmolStr> = None;
        let mut imports = Vec::new();
        let mut nested = Nested::new();

        loop {
            let comment = self.take_leading_comment();
            let Some(tok) = self.peek() else { break };
            match (tok.kind, tok.text) {
                (Token::Ident, "syntax" | "edition" | "option") => self.skip_statement()?,
                (Token::Ident, "package") => {
                    self.bump();
                    package = Some(self.expect_ident()?);
                    self.expect(Token::Semi)?;
                    self.take_trailing_comment();
                }
                (Token::Ident, "import") => {
                    self.bump();
                    if self.at_ident("public") || self.at_ident("weak") {
                        self.bump();
                    }
                    imports.push(self.expect_string()?);
                    self.expect(Token::Semi)?;
                    self.take_trailing_comment();
                }
                (Token::Ident, "message" | "enum" | "service") => {
                    let (name, decl) = self.parse_decl(comment)?;
                    nested.insert(name, decl);
                }
                (Token::Ident, "extend") => self.skip_block()?,
                (Token::Semi, _) => self.bump(),
                _ => return Err(self.unexpected("a top-level declaration")),
            }
        }

        if let Some(package) = &package {
            for segment in package.rsplit('.') {
                let mut wrapper = Nested::new();
                wrapper.insert(SmolStr::new(segment), Decl::Namespace(Namespace { nested }));
                nested = wrapper;
            }
        }

        Ok(ParsedFile { package, imports, nested })
    }

    fn parse_decl(&mut self, comment: Option<String>) -> Result<(SmolStr, Decl), ParseError> {
        let keyword = self.bump_text();
        match keyword {
            "message" => self.parse_message(comment),
            "enum" => self.parse_enum(comment),
            _ => self.parse_service(comment),
        }
    }

    fn parse_message(&mut self, comment: Option<String>) -> Result<(SmolStr, Decl), ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LBrace)?;
        let mut message = Message::default();

        loop {
            let comment = self.take_leading_comment();
            let Some(tok) = self.peek() else {
                return Err(self.unexpected(&format!("`}}` closing message `{name}`")));
            };
            match (tok.kind, tok.text) {
                (Token::RBrace, _) => {
                    self.bump();
                    break;
                }
                (Token::Semi, _) => self.bump(),
                (Token::Ident, "message" | "enum") if self.nth_is(1, Token::Ident) => {
                    let (child, decl) = self.parse_decl(comment)?;
                    message.nested.insert(child, decl);
                }
                (Token::Ident, "oneof") if self.nth_is(1, Token::Ident) => {
                    self.bump();
                    self.expect_ident()?;
                    self.parse_oneof(&mut message.fields)?;
                }
                (Token::Ident, "option" | "reserved" | "extensions") => self.skip_statement()?,
                (Token::Ident, "extend") => self.skip_block()?,
                _ => {
                    let (field_name, field) = self.parse_field(comment)?;
                    message.fields.insert(field_name, field);
                }
            }
        }

        message.comment = self.settle_comment(comment);
        Ok((name, Decl::Message(message)))
    }

    fn parse_oneof(&mut self, fields: &mut IndexMap<SmolStr, Field>) -> Result<(), ParseError> {
        self.expect(Token::LBrace)?;
        loop {
            let comment = self.take_leading_comment();
            match self.peek().map(|t| (t.kind, t.text)) {
                Some((Token::RBrace, _)) => {
                    self.bump();
                    self.take_trailing_comment();
                    return Ok(());
                }
                Some((Token::Ident, "option")) => self.skip_statement()?,
                Some(_) => {
                    let (name, field) = self.parse_field(comment)?;
                    fields.insert(name, field);
                }
                None => return Err(self.unexpected("`}` closing oneof")),
            }
        }
    }

    fn parse_field(&mut self, comment: Option<String>) -> Result<(SmolStr, Field), ParseError> {
        let rule = match self.peek().map(|t| t.text) {
            Some("repeated") => FieldRule::Repeated,
            Some("optional") => FieldRule::Optional,
            _ => FieldRule::Singular,
        };
        if rule != FieldRule::Singular || self.at_ident("required") {
            self.bump();
        }

        let mut key_type = None;
        let type_name = if self.at_ident("map") && self.nth_is(1, Token::LAngle) {
            self.bump();
            self.expect(Token::LAngle)?;
            key_type = Some(self.expect_ident()?);
            self.expect(Token::Comma)?;
            let value = self.expect_ident()?;
            self.expect(Token::RAngle)?;
            value
        } else {
            self.expect_ident()?
        };

        let raw_name = self.expect_ident()?;
        self.expect(Token::Eq)?;
        self.expect(Token::Int)?;
        if self.at(Token::LBracket) {
            self.skip_delimited(Token::LBracket, Token::RBracket)?;
        }
        self.expect(Token::Semi)?;
        let comment = self.settle_comment(comment);

        let name = if self.options.keep_case { raw_name } else { camel_case(&raw_name) };
        Ok((name, Field { type_name, rule, key_type, comment }))
    }

    fn parse_enum(&mut self, comment: Option<String>) -> Result<(SmolStr, Decl), ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LBrace)?;
        let mut values = IndexMap::new();

        loop {
            let comment = self.take_leading_comment();
            match self.peek().map(|t| (t.kind, t.text)) {
                Some((Token::RBrace, _)) => {
                    self.bump();
                    break;
                }
                Some((Token::Semi, _)) => self.bump(),
                Some((Token::Ident, "option" | "reserved")) => self.skip_statement()?,
                Some(_) => {
                    let member = self.expect_ident()?;
                    self.expect(Token::Eq)?;
                    let value = self.expect_int()?;
                    if self.at(Token::LBracket) {
                        self.skip_delimited(Token::LBracket, Token::RBracket)?;
                    }
                    self.expect(Token::Semi)?;
                    let comment = self.settle_comment(comment);
                    values.insert(member, EnumValue { value, comment });
                }
                None => return Err(self.unexpected(&format!("`}}` closing enum `{name}`"))),
            }
        }

        let comment = self.settle_comment(comment);
        Ok((name, Decl::Enum(Enum { comment, values })))
    }

    fn parse_service(&mut self, comment: Option<String>) -> Result<(SmolStr, Decl), ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LBrace)?;
        let mut service = Service::default();

        loop {
            let comment = self.take_leading_comment();
            match self.peek().map(|t| (t.kind, t.text)) {
                Some((Token::RBrace, _)) => {
                    self.bump();
                    break;
                }
                Some((Token::Semi, _)) => self.bump(),
                Some((Token::Ident, "option")) => self.skip_statement()?,
                Some((Token::Ident, "rpc")) => {
                    self.bump();
                    let (method_name, method) = self.parse_rpc(comment)?;
                    service.methods.insert(method_name, method);
                }
                Some(_) => return Err(self.unexpected("`rpc` or `}` in service")),
                None => return Err(self.unexpected(&format!("`}}` closing service `{name}`"))),
            }
        }

        service.comment = self.settle_comment(comment);
        Ok((name, Decl::Service(service)))
    }

    fn parse_rpc(&mut self, comment: Option<String>) -> Result<(SmolStr, Method), ParseError> {
        let name = self.expect_ident()?;
        let (request_stream, request_type) = self.parse_rpc_type()?;
        if !self.at_ident("returns") {
            return Err(self.unexpected("`returns`"));
        }
        self.bump();
        let (response_stream, response_type) = self.parse_rpc_type()?;

        if self.at(Token::LBrace) {
            self.skip_delimited(Token::LBrace, Token::RBrace)?;
            if self.at(Token::Semi) {
                self.bump();
            }
        } else {
            self.expect(Token::Semi)?;
        }
        let comment = self.settle_comment(comment);

        Ok((
            name,
            Method { request_type, response_type, request_stream, response_stream, comment },
        ))
    }

    fn parse_rpc_type(&mut self) -> Result<(bool, SmolStr), ParseError> {
        self.expect(Token::LParen)?;
        let stream = self.at_ident("stream") && self.nth_is(1, Token::Ident);
        if stream {
            self.bump();
        }
        let ty = self.expect_ident()?;
        self.expect(Token::RParen)?;
        Ok((stream, ty))
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    /// Consume trivia up to the next significant token and return the comment
    /// block directly above it. A blank line detaches a comment.
    fn take_leading_comment(&mut self) -> Option<String> {
        let mut group: Vec<&str> = Vec::new();
        let mut newlines = 0;
        while let Some(tok) = self.tokens.get(self.pos) {
            match tok.kind {
                Token::Newline => {
                    newlines += 1;
                    if newlines > 1 {
                        group.clear();
                    }
                }
                Token::LineComment | Token::BlockComment => {
                    group.push(tok.text);
                    newlines = 0;
                }
                _ => break,
            }
            self.pos += 1;
        }
        join_comments(&group)
    }

    /// Consume the same-line comment after a closing `;` or `}`. A leading
    /// comment takes precedence; the trailing one is dropped in that case.
    fn settle_comment(&mut self, leading: Option<String>) -> Option<String> {
        let trailing = self.take_trailing_comment();
        leading.or(trailing)
    }

    /// A comment on the same line as the token just consumed.
    fn take_trailing_comment(&mut self) -> Option<String> {
        let tok = self.tokens.get(self.pos)?;
        if !tok.kind.is_comment() {
            return None;
        }
        self.pos += 1;
        join_comments(&[tok.text])
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn significant_index(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    fn peek(&self) -> Option<Lexeme<'src>> {
        self.significant_index(self.pos).map(|i| self.tokens[i])
    }

    fn nth_is(&self, n: usize, kind: Token) -> bool {
        let mut idx = self.significant_index(self.pos);
        for _ in 0..n {
            idx = idx.and_then(|i| self.significant_index(i + 1));
        }
        idx.is_some_and(|i| self.tokens[i].kind == kind)
    }

    fn at(&self, kind: Token) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn at_ident(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.kind == Token::Ident && t.text == text)
    }

    fn bump(&mut self) {
        if let Some(i) = self.significant_index(self.pos) {
            self.pos = i + 1;
        }
    }

    fn bump_text(&mut self) -> &'src str {
        let text = self.peek().map_or("", |t| t.text);
        self.bump();
        text
    }

    fn expect(&mut self, kind: Token) -> Result<Lexeme<'src>, ParseError> {
        match self.peek() {
            Some(tok) if tok.kind == kind => {
                self.bump();
                Ok(tok)
            }
            _ => Err(self.unexpected(describe(kind))),
        }
    }

    fn expect_ident(&mut self) -> Result<SmolStr, ParseError> {
        self.expect(Token::Ident).map(|t| SmolStr::new(t.text))
    }

    fn expect_string(&mut self) -> Result<SmolStr, ParseError> {
        let tok = self.expect(Token::Str)?;
        Ok(SmolStr::new(&tok.text[1..tok.text.len() - 1]))
    }

    fn expect_int(&mut self) -> Result<i64, ParseError> {
        let tok = self.expect(Token::Int)?;
        parse_int(tok.text).ok_or_else(|| self.error_at(tok.range, "integer out of range"))
    }

    /// Skip to and including the next `;` at brace depth zero.
    fn skip_statement(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            self.bump();
            match tok.kind {
                Token::LBrace => depth += 1,
                Token::RBrace => depth = depth.saturating_sub(1),
                Token::Semi if depth == 0 => {
                    self.take_trailing_comment();
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(self.unexpected("`;`"))
    }

    /// Skip a keyword-introduced block such as `extend Foo { ... }`.
    fn skip_block(&mut self) -> Result<(), ParseError> {
        while !self.at(Token::LBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected("`{`"));
            }
            self.bump();
        }
        self.skip_delimited(Token::LBrace, Token::RBrace)?;
        self.take_trailing_comment();
        Ok(())
    }

    fn skip_delimited(&mut self, open: Token, close: Token) -> Result<(), ParseError> {
        self.expect(open)?;
        let mut depth = 1usize;
        while let Some(tok) = self.peek() {
            self.bump();
            if tok.kind == open {
                depth += 1;
            } else if tok.kind == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(self.unexpected(describe(close)))
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(tok) => {
                self.error_at(tok.range, &format!("expected {expected}, found `{}`", tok.text))
            }
            None => self.error_at(
                TextRange::empty(self.source_len),
                &format!("expected {expected}, found end of input"),
            ),
        }
    }

    fn error_at(&self, range: TextRange, message: &str) -> ParseError {
        ParseError {
            message: message.to_string(),
            position: self.line_index.start_of(range),
        }
    }
}

fn describe(kind: Token) -> &'static str {
    match kind {
        Token::Ident => "an identifier",
        Token::Int => "an integer",
        Token::Str => "a string literal",
        Token::LBrace => "`{`",
        Token::RBrace => "`}`",
        Token::LParen => "`(`",
        Token::RParen => "`)`",
        Token::LBracket => "`[`",
        Token::RBracket => "`]`",
        Token::LAngle => "`<`",
        Token::RAngle => "`>`",
        Token::Semi => "`;`",
        Token::Comma => "`,`",
        Token::Eq => "`=`",
        Token::Colon => "`:`",
        Token::Minus => "`-`",
        Token::Float => "a number",
        Token::Newline | Token::LineComment | Token::BlockComment => "a token",
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let hex = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X"));
    let magnitude = if let Some(hex) = hex {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Strip comment markers and join a comment block into plain text lines.
fn join_comments(raw: &[&str]) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    for text in raw {
        if let Some(line) = text.strip_prefix("//") {
            let line = line.trim_start_matches('/');
            lines.push(line.strip_prefix(' ').unwrap_or(line).trim_end().to_string());
        } else {
            let body = text
                .trim_start_matches("/*")
                .trim_start_matches('*')
                .trim_end_matches("*/");
            for line in body.lines() {
                let line = line.trim();
                let line = line.strip_prefix('*').unwrap_or(line);
                lines.push(line.strip_prefix(' ').unwrap_or(line).trim_end().to_string());
            }
        }
    }

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Camel-case a field name the way protobuf JSON tooling does: every `_`
/// followed by a lower-case ASCII letter after the first character is
/// dropped and the letter upper-cased.
pub fn camel_case(name: &str) -> SmolStr {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        out.push(first);
    }
    let mut chars = chars.peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '_' && next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    SmolStr::new(out)
}
