//! Structural scanning of proto source text.
//!
//! The scan recovers declarations and their documentation without parsing the
//! full protobuf grammar. A token stream drives declaration matching, so
//! keywords inside comments and string literals are never taken for structure;
//! comment attachment works on raw source lines, and body extraction is a
//! plain character-level brace counter.
//!
//! Failures are local: a declaration whose header is incomplete or whose body
//! never closes is skipped, and scanning continues with the rest of the file.

use logos::{Logos, Span};

use crate::ast::{
    Enum, EnumValue, Field, FieldLabel, Message, ParsedFile, RpcMethod, Service,
};
use crate::lex::Token;
use crate::lines::LineResolver;
use crate::{annotations, comments, resolve};

#[cfg(test)]
mod tests;

/// Scans one file's source text into a [`ParsedFile`].
pub(crate) fn parse_file(source: &str) -> ParsedFile {
    let scanner = Scanner::new(source);
    let (file_comment, syntax, package) = scanner.scan_prelude();

    let mut file = ParsedFile::builder()
        .file_comment(file_comment)
        .syntax(syntax)
        .package(package);
    for message in scanner.scan_messages() {
        file = file.message(message);
    }
    for enumeration in scanner.scan_enums() {
        file = file.enumeration(enumeration);
    }
    for service in scanner.scan_services() {
        file = file.service(service);
    }
    file.build()
}

/// Finds the offset of the closing brace matching an opening brace that ends
/// immediately before `start`.
///
/// The counter is a pure character scan: nested braces anywhere in the body,
/// including inside option aggregates, balance out. Returns `None` when the
/// counter never reaches zero before end of input; callers treat that as a
/// failed declaration, not a failed file.
pub(crate) fn find_block_end(source: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (index, ch) in source[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + index);
                }
            }
            _ => {}
        }
    }
    None
}

fn tokenize(source: &str) -> Vec<(Token<'_>, Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        if let Ok(token) = token {
            tokens.push((token, lexer.span()));
        }
    }
    tokens
}

fn token_at<'t, 'a>(tokens: &'t [(Token<'a>, Span)], pos: usize) -> Option<&'t Token<'a>> {
    tokens.get(pos).map(|(token, _)| token)
}

/// Matches a dotted identifier (`Ident (. Ident)*`) starting at `pos`,
/// returning the joined name and the position after it.
fn match_full_ident(tokens: &[(Token<'_>, Span)], pos: usize) -> Option<(String, usize)> {
    let mut name = match token_at(tokens, pos)? {
        Token::Ident(part) => (*part).to_owned(),
        _ => return None,
    };
    let mut pos = pos + 1;
    while matches!(token_at(tokens, pos), Some(Token::Dot)) {
        match token_at(tokens, pos + 1) {
            Some(Token::Ident(part)) => {
                name.push('.');
                name.push_str(part);
                pos += 2;
            }
            _ => return None,
        }
    }
    Some((name, pos))
}

struct Block<'a> {
    name: &'a str,
    body: &'a str,
    /// Token index just past the block's closing brace.
    resume: usize,
}

struct Scanner<'a> {
    source: &'a str,
    tokens: Vec<(Token<'a>, Span)>,
    lines: Vec<&'a str>,
    resolver: LineResolver,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            source,
            tokens: tokenize(source),
            lines: source.split('\n').collect(),
            resolver: LineResolver::new(source),
        }
    }

    fn token(&self, pos: usize) -> Option<&Token<'a>> {
        token_at(&self.tokens, pos)
    }

    /// Linear scan for the file comment and the `syntax` and `package`
    /// statements, terminating at the package statement or the first
    /// declaration keyword.
    ///
    /// Comment tokens accumulate into the file comment until any statement
    /// other than `syntax` appears; imports and file-level options end the
    /// accumulation but not the search for `package`.
    fn scan_prelude(&self) -> (String, String, String) {
        let mut file_comment: Vec<&str> = Vec::new();
        let mut syntax = "";
        let mut package = String::new();
        let mut collecting = true;
        let mut pos = 0;
        while pos < self.tokens.len() {
            match &self.tokens[pos].0 {
                &Token::LineComment(text) | &Token::BlockComment(text) => {
                    if collecting {
                        file_comment.push(text);
                    }
                    pos += 1;
                }
                Token::Ident("syntax") => {
                    match (self.token(pos + 1), self.token(pos + 2), self.token(pos + 3)) {
                        (
                            Some(Token::Equals),
                            Some(&Token::StringLiteral(value)),
                            Some(Token::Semicolon),
                        ) => {
                            syntax = value;
                            pos += 4;
                        }
                        _ => {
                            collecting = false;
                            pos += 1;
                        }
                    }
                }
                Token::Ident("package") => {
                    if let Some((name, next)) = match_full_ident(&self.tokens, pos + 1) {
                        if matches!(self.token(next), Some(Token::Semicolon)) {
                            package = name;
                        }
                    }
                    break;
                }
                Token::Ident("message") | Token::Ident("enum") | Token::Ident("service") => break,
                _ => {
                    collecting = false;
                    pos += 1;
                }
            }
        }
        (
            comments::normalize(&file_comment.join("\n")),
            syntax.to_owned(),
            package,
        )
    }

    fn scan_messages(&self) -> Vec<Message> {
        let mut messages = Vec::new();
        let mut pos = 0;
        while pos < self.tokens.len() {
            if self.tokens[pos].0 != Token::MESSAGE {
                pos += 1;
                continue;
            }
            let Some(block) = self.match_block(pos) else {
                pos += 1;
                continue;
            };
            let mut message = Message::builder(block.name).comment(self.leading_comment(pos));
            for field in BodyScanner::new(block.body).scan_fields() {
                message = message.field(field);
            }
            messages.push(message.build());
            pos = block.resume;
        }
        messages
    }

    fn scan_enums(&self) -> Vec<Enum> {
        let mut enums = Vec::new();
        let mut pos = 0;
        while pos < self.tokens.len() {
            if self.tokens[pos].0 != Token::ENUM {
                pos += 1;
                continue;
            }
            let Some(block) = self.match_block(pos) else {
                pos += 1;
                continue;
            };
            let mut enumeration = Enum::builder(block.name).comment(self.leading_comment(pos));
            for value in BodyScanner::new(block.body).scan_values() {
                enumeration = enumeration.value(value);
            }
            enums.push(enumeration.build());
            pos = block.resume;
        }
        enums
    }

    fn scan_services(&self) -> Vec<Service> {
        let mut services = Vec::new();
        let mut pos = 0;
        while pos < self.tokens.len() {
            if self.tokens[pos].0 != Token::SERVICE {
                pos += 1;
                continue;
            }
            let Some(block) = self.match_block(pos) else {
                pos += 1;
                continue;
            };
            let mut service = Service::builder(block.name).comment(self.leading_comment(pos));
            for method in BodyScanner::new(block.body).scan_methods() {
                service = service.method(method);
            }
            services.push(service.build());
            pos = block.resume;
        }
        services
    }

    /// Matches `<keyword> <identifier> {` at `pos` and extracts the
    /// brace-matched body. `None` when the header is incomplete (a bare
    /// keyword is not a declaration) or the body never closes.
    fn match_block(&self, pos: usize) -> Option<Block<'a>> {
        let name = match self.token(pos + 1)? {
            Token::Ident(name) => *name,
            _ => return None,
        };
        if !matches!(self.token(pos + 2), Some(Token::LeftBrace)) {
            return None;
        }
        let body_start = self.tokens[pos + 2].1.end;
        let body_end = find_block_end(self.source, body_start)?;
        let resume = self
            .tokens
            .partition_point(|(_, span)| span.start <= body_end);
        Some(Block {
            name,
            body: &self.source[body_start..body_end],
            resume,
        })
    }

    /// The comment block preceding the declaration keyword at `pos`,
    /// normalized with cross-references resolved. Top-level declarations take
    /// no inline fallback.
    fn leading_comment(&self, pos: usize) -> String {
        let line = self.resolver.line_index(self.tokens[pos].1.start);
        let raw = comments::block_before(&self.lines, line);
        resolve::references(&comments::normalize(&raw))
    }
}

/// Scans the elements nested inside one declaration body. Line numbering and
/// comment lookups are relative to the body slice.
struct BodyScanner<'a> {
    body: &'a str,
    tokens: Vec<(Token<'a>, Span)>,
    lines: Vec<&'a str>,
    resolver: LineResolver,
}

impl<'a> BodyScanner<'a> {
    fn new(body: &'a str) -> Self {
        BodyScanner {
            body,
            tokens: tokenize(body),
            lines: body.split('\n').collect(),
            resolver: LineResolver::new(body),
        }
    }

    fn token(&self, pos: usize) -> Option<&Token<'a>> {
        token_at(&self.tokens, pos)
    }

    fn scan_fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        let mut pos = 0;
        while pos < self.tokens.len() {
            match self.match_field(pos) {
                Some((field, next)) => {
                    fields.push(field);
                    pos = next;
                }
                None => pos += 1,
            }
        }
        fields
    }

    fn scan_values(&self) -> Vec<EnumValue> {
        let mut values = Vec::new();
        let mut pos = 0;
        while pos < self.tokens.len() {
            match self.match_value(pos) {
                Some((value, next)) => {
                    values.push(value);
                    pos = next;
                }
                None => pos += 1,
            }
        }
        values
    }

    fn scan_methods(&self) -> Vec<RpcMethod> {
        let mut methods = Vec::new();
        let mut pos = 0;
        while pos < self.tokens.len() {
            match self.match_method(pos) {
                Some((method, next)) => {
                    methods.push(method);
                    pos = next;
                }
                None => pos += 1,
            }
        }
        methods
    }

    /// `[repeated|optional]? TYPE NAME = NUMBER [options]? ;`
    fn match_field(&self, pos: usize) -> Option<(Field, usize)> {
        let start = pos;
        let (label, pos) = match self.token(pos) {
            Some(Token::Ident("repeated")) => (FieldLabel::Repeated, pos + 1),
            Some(Token::Ident("optional")) => (FieldLabel::Optional, pos + 1),
            _ => (FieldLabel::None, pos),
        };
        let (ty, pos) = self.match_type(pos)?;
        let name = match self.token(pos)? {
            Token::Ident(name) => *name,
            _ => return None,
        };
        if !matches!(self.token(pos + 1), Some(Token::Equals)) {
            return None;
        }
        let number = match self.token(pos + 2)? {
            Token::IntLiteral(number) => u32::try_from(*number).ok()?,
            _ => return None,
        };
        let mut pos = pos + 3;
        if matches!(self.token(pos), Some(Token::LeftBracket)) {
            pos = self.skip_options(pos)?;
        }
        if !matches!(self.token(pos), Some(Token::Semicolon)) {
            return None;
        }

        let (comment, keywords) =
            annotations::extract(&comments::normalize_lines(&self.comment_at(start)));
        let field = Field::builder(name, ty)
            .label(label)
            .number(number)
            .comment(comment)
            .keywords(keywords)
            .build();
        Some((field, pos + 1))
    }

    /// `NAME = NUMBER [options]? ;`
    fn match_value(&self, pos: usize) -> Option<(EnumValue, usize)> {
        let name = match self.token(pos)? {
            Token::Ident(name) => *name,
            _ => return None,
        };
        if !matches!(self.token(pos + 1), Some(Token::Equals)) {
            return None;
        }
        let number = match self.token(pos + 2)? {
            Token::IntLiteral(number) => u32::try_from(*number).ok()?,
            _ => return None,
        };
        let mut next = pos + 3;
        if matches!(self.token(next), Some(Token::LeftBracket)) {
            next = self.skip_options(next)?;
        }
        if !matches!(self.token(next), Some(Token::Semicolon)) {
            return None;
        }

        let comment = self.element_comment(pos);
        Some((EnumValue::new(name, number, comment), next + 1))
    }

    /// `rpc NAME(REQUEST) returns (RESPONSE);`, where an options body
    /// `{ ... }` may stand in for the semicolon and `stream` qualifiers are
    /// consumed without being modeled.
    fn match_method(&self, pos: usize) -> Option<(RpcMethod, usize)> {
        if !matches!(self.token(pos), Some(Token::Ident("rpc"))) {
            return None;
        }
        let name = match self.token(pos + 1)? {
            Token::Ident(name) => *name,
            _ => return None,
        };
        if !matches!(self.token(pos + 2), Some(Token::LeftParen)) {
            return None;
        }
        let (request_type, next) = self.match_method_type(pos + 3)?;
        if !matches!(self.token(next), Some(Token::RightParen)) {
            return None;
        }
        if !matches!(self.token(next + 1), Some(Token::Ident("returns"))) {
            return None;
        }
        if !matches!(self.token(next + 2), Some(Token::LeftParen)) {
            return None;
        }
        let (response_type, next) = self.match_method_type(next + 3)?;
        if !matches!(self.token(next), Some(Token::RightParen)) {
            return None;
        }

        let resume = match self.token(next + 1) {
            Some(Token::Semicolon) => next + 2,
            Some(Token::LeftBrace) => {
                let body_start = self.tokens[next + 1].1.end;
                let body_end = find_block_end(self.body, body_start)?;
                self.tokens
                    .partition_point(|(_, span)| span.start <= body_end)
            }
            _ => return None,
        };

        let comment = self.element_comment(pos);
        Some((
            RpcMethod::new(name, request_type, response_type, comment),
            resume,
        ))
    }

    /// A scalar or message type reference: a dotted identifier or a
    /// `map<K, V>` literal.
    fn match_type(&self, pos: usize) -> Option<(String, usize)> {
        if matches!(self.token(pos), Some(Token::Ident("map")))
            && matches!(self.token(pos + 1), Some(Token::LeftAngleBracket))
        {
            let (key, pos) = match_full_ident(&self.tokens, pos + 2)?;
            if !matches!(self.token(pos), Some(Token::Comma)) {
                return None;
            }
            let (value, pos) = match_full_ident(&self.tokens, pos + 1)?;
            if !matches!(self.token(pos), Some(Token::RightAngleBracket)) {
                return None;
            }
            return Some((format!("map<{key}, {value}>"), pos + 1));
        }
        match_full_ident(&self.tokens, pos)
    }

    /// An RPC request or response type, with an ignored `stream` qualifier.
    fn match_method_type(&self, pos: usize) -> Option<(String, usize)> {
        let pos = if matches!(self.token(pos), Some(Token::Ident("stream")))
            && matches!(self.token(pos + 1), Some(Token::Ident(_)))
        {
            pos + 1
        } else {
            pos
        };
        match_full_ident(&self.tokens, pos)
    }

    /// Skips a bracketed option list, returning the position after `]`.
    fn skip_options(&self, pos: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (index, (token, _)) in self.tokens.iter().enumerate().skip(pos) {
            match token {
                Token::LeftBracket => depth += 1,
                Token::RightBracket => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index + 1);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// The raw comment attached to the element starting at token `pos`: the
    /// preceding block if one exists, otherwise the inline trailing comment on
    /// the element's first line.
    fn comment_at(&self, pos: usize) -> String {
        let line = self.resolver.line_index(self.tokens[pos].1.start);
        let raw = comments::block_before(&self.lines, line);
        if !raw.is_empty() {
            return raw;
        }
        match self.lines.get(line) {
            Some(text) => comments::split_inline(text).1,
            None => String::new(),
        }
    }

    fn element_comment(&self, pos: usize) -> String {
        resolve::references(&comments::normalize(&self.comment_at(pos)))
    }
}
