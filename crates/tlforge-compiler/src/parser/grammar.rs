//! Recursive-descent parser over the token stream.
//!
//! # Entry syntax
//!
//! ```text
//! name#hex {X:Type} param:type ... = Result;
//! ```
//!
//! Parameter types:
//! - `int`, `string`, `User`, `messages.Chats` - raw names
//! - `Vector<T>` / `vector<T>` - homogeneous sequence
//! - `#` - flag word
//! - `flags.N?T` - present iff bit `N` of flag word `flags` is set
//! - `flags.N?true` - presence bit without payload
//! - `!X` - request payload of a generic method
//! - `X` - generic placeholder

use std::ops::Range;

use logos::Logos;

use super::lexer::Token;
use super::tag::infer_tag;
use super::{Category, Definition, Generic, Param, line_of};
use crate::model::{FlagGroupId, TypeRef};
use crate::{Error, Result};

/// Built-in definitions that describe the wire primitives themselves.
const CORE_DEFINITIONS: &[&str] = &[
    "int", "long", "double", "float", "string", "bytes", "vector", "boolFalse", "boolTrue", "true",
    "int128", "int256",
];

const MAX_FLAG_BIT: u32 = 31;

/// Parses every entry of a schema, in source order.
pub fn parse(source: &str) -> Result<Vec<Definition>> {
    let mut parser = Parser::new(source)?;
    let mut category = Category::Type;
    let mut definitions = Vec::new();

    while let Some(token) = parser.peek() {
        match token {
            Token::TypesSection => {
                parser.advance();
                category = Category::Type;
            }
            Token::FunctionsSection => {
                parser.advance();
                category = Category::Method;
            }
            _ => {
                if let Some(definition) = parser.parse_entry(category)? {
                    definitions.push(definition);
                }
            }
        }
    }

    tracing::debug!(entries = definitions.len(), "schema parsed");
    Ok(definitions)
}

/// Per-entry scope used to validate references inside one entry.
#[derive(Default)]
struct EntryScope {
    generics: Vec<Generic>,
    flag_words: Vec<String>,
}

impl EntryScope {
    fn has_generic(&self, name: &str) -> bool {
        self.generics.iter().any(|g| g.name == name)
    }

    fn flag_group(&self, name: &str) -> Option<FlagGroupId> {
        self.flag_words
            .iter()
            .position(|w| w == name)
            .map(|i| FlagGroupId(i as u8))
    }
}

struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    source: &'src str,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Result<Self> {
        let mut tokens = Vec::new();

        for (result, span) in Token::lexer(source).spanned() {
            match result {
                Ok(Token::LineComment) => {}
                Ok(token) => tokens.push((token, span)),
                Err(_) => {
                    return Err(syntax_error(
                        source,
                        format!("unexpected character {:?}", &source[span.clone()]),
                        span,
                    ));
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            source,
        })
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_nth(&self, n: usize) -> Option<Token<'src>> {
        self.tokens.get(self.pos + n).map(|(t, _)| *t)
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| s.clone())
            .unwrap_or(self.source.len()..self.source.len())
    }

    fn previous_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |(_, s)| s.end)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        syntax_error(self.source, message.into(), self.current_span())
    }

    fn error_at(&self, message: impl Into<String>, span: Range<usize>) -> Error {
        syntax_error(self.source, message.into(), span)
    }

    fn unexpected(&self, expected: &str) -> Error {
        match self.peek() {
            Some(Token::RAngle) => self.error("unbalanced `>`"),
            Some(Token::RBrace) => self.error("unbalanced `}`"),
            Some(token) => self.error(format!("expected {expected}, found {}", token.describe())),
            None => self.error(format!("expected {expected}, found end of schema")),
        }
    }

    fn expect(&mut self, expected: Token<'src>) -> Result<()> {
        match self.peek() {
            Some(t) if t == expected => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&expected.describe())),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<&'src str> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// `ident ('.' ident)*`
    fn parse_dotted_name(&mut self, what: &str) -> Result<String> {
        let mut name = self.expect_ident(what)?.to_string();
        while self.peek() == Some(Token::Dot) && matches!(self.peek_nth(1), Some(Token::Ident(_))) {
            self.advance();
            name.push('.');
            name.push_str(self.expect_ident(what)?);
        }
        Ok(name)
    }

    /// Consumes a core definition up to and including its `;`.
    fn skip_entry(&mut self) -> Result<()> {
        loop {
            match self.advance() {
                Some(Token::Semi) => return Ok(()),
                Some(_) => {}
                None => return Err(self.error("expected `;`, found end of schema")),
            }
        }
    }

    fn parse_entry(&mut self, category: Category) -> Result<Option<Definition>> {
        let first = self.pos;
        let start = self.current_span().start;
        let name = self.parse_dotted_name("entry name")?;
        let span = start..self.previous_end();

        if CORE_DEFINITIONS.contains(&name.as_str()) {
            self.skip_entry()?;
            tracing::trace!(name = %name, "skipped core definition");
            return Ok(None);
        }

        let written_tag = match self.peek() {
            Some(Token::Tag(digits)) => {
                let tag = parse_tag(digits).ok_or_else(|| {
                    self.error(format!(
                        "invalid tag `#{digits}`: expected at most 8 hexadecimal digits"
                    ))
                })?;
                self.advance();
                Some(tag)
            }
            _ => None,
        };

        let mut scope = EntryScope::default();
        while self.peek() == Some(Token::LBrace) {
            let generic_start = self.current_span().start;
            let generic = self.parse_generic()?;
            if !scope.generics.is_empty() {
                return Err(self.error_at(
                    "an entry takes at most one generic parameter",
                    generic_start..self.previous_end(),
                ));
            }
            scope.generics.push(generic);
        }

        let mut params: Vec<Param> = Vec::new();
        while self.peek() != Some(Token::Eq) {
            let name_span = self.current_span();
            let param_name = self.expect_ident("parameter or `=`")?;
            if params.iter().any(|p| p.name == param_name) {
                return Err(self.error_at(
                    format!("duplicate parameter `{param_name}`"),
                    name_span,
                ));
            }
            self.expect(Token::Colon)?;

            let ty_start = self.current_span().start;
            let ty = self.parse_param_type(&scope)?;
            let ty_span = ty_start..self.previous_end();

            if ty.is_flag_word() {
                scope.flag_words.push(param_name.to_string());
            }
            params.push(Param {
                name: param_name.to_string(),
                ty,
                ty_span,
            });
        }
        self.expect(Token::Eq)?;

        let result_start = self.current_span().start;
        let result = self.parse_type_expr(&scope, false)?;
        let result_span = result_start..self.previous_end();

        if !matches!(result, TypeRef::Any(_)) && contains_generic(&result) {
            return Err(self.error_at(
                "a generic result must be the placeholder itself",
                result_span,
            ));
        }
        if let TypeRef::Any(generic) = &result {
            let has_payload = params
                .iter()
                .any(|p| matches!(&p.ty, TypeRef::Functional(g) if g == generic));
            if !has_payload {
                return Err(self.error_at(
                    format!("generic result `{generic}` needs a `!{generic}` parameter"),
                    result_span,
                ));
            }
        }

        let last = self.pos;
        self.expect(Token::Semi)?;

        let (tag, tag_inferred) = match written_tag {
            Some(tag) => (tag, false),
            None => (infer_tag(&self.text_between(first, last)), true),
        };

        let definition = Definition {
            category,
            name,
            tag,
            tag_inferred,
            generics: scope.generics,
            params,
            result,
            result_span,
            line: line_of(self.source, start),
            span,
        };
        tracing::trace!(name = %definition.name, tag = definition.tag, "parsed entry");
        Ok(Some(definition))
    }

    /// Source text of tokens `[from, to)` with each gap collapsed to one space.
    fn text_between(&self, from: usize, to: usize) -> String {
        let mut text = String::new();
        let mut prev_end = None;
        for (_, span) in &self.tokens[from..to] {
            if prev_end.is_some_and(|end| end < span.start) {
                text.push(' ');
            }
            text.push_str(&self.source[span.clone()]);
            prev_end = Some(span.end);
        }
        text
    }

    /// `{X:Type}`
    fn parse_generic(&mut self) -> Result<Generic> {
        self.expect(Token::LBrace)?;
        let name = self.expect_ident("generic name")?.to_string();
        self.expect(Token::Colon)?;
        let bound = self.expect_ident("generic bound")?.to_string();
        if self.peek() != Some(Token::RBrace) {
            return Err(self.error("unbalanced `{`"));
        }
        self.advance();
        Ok(Generic { name, bound })
    }

    fn parse_param_type(&mut self, scope: &EntryScope) -> Result<TypeRef> {
        match self.peek() {
            Some(Token::Hash) => {
                self.advance();
                Ok(TypeRef::FlagWord)
            }
            Some(Token::Bang) => {
                self.advance();
                let span = self.current_span();
                let generic = self.expect_ident("generic name")?;
                if !scope.has_generic(generic) {
                    return Err(self.error_at(format!("undeclared generic `{generic}`"), span));
                }
                Ok(TypeRef::Functional(generic.to_string()))
            }
            Some(Token::Ident(word))
                if self.peek_nth(1) == Some(Token::Dot)
                    && matches!(self.peek_nth(2), Some(Token::Number(_))) =>
            {
                let word_span = self.current_span();
                let group = scope
                    .flag_group(word)
                    .ok_or_else(|| {
                        self.error_at(format!("undeclared flag word `{word}`"), word_span)
                    })?;
                self.advance();
                self.advance();

                let bit_span = self.current_span();
                let Some(Token::Number(digits)) = self.advance() else {
                    return Err(self.error_at("expected flag bit", bit_span));
                };
                let bit = digits
                    .parse::<u32>()
                    .ok()
                    .filter(|bit| *bit <= MAX_FLAG_BIT)
                    .ok_or_else(|| {
                        self.error_at(
                            format!("flag bit {digits} is out of range (0..={MAX_FLAG_BIT})"),
                            bit_span,
                        )
                    })?;

                self.expect(Token::Question)?;
                let real = self.parse_type_expr(scope, true)?;
                Ok(TypeRef::Conditional {
                    group,
                    bit: bit as u8,
                    real: Box::new(real),
                })
            }
            _ => self.parse_type_expr(scope, false),
        }
    }

    /// `name` | `name<type>`
    fn parse_type_expr(&mut self, scope: &EntryScope, allow_literal: bool) -> Result<TypeRef> {
        let span = self.current_span();
        let name = self.parse_dotted_name("type")?;

        if self.peek() == Some(Token::LAngle) {
            if name != "Vector" && name != "vector" {
                return Err(self.error_at(
                    format!("`{name}` takes no type arguments, only `Vector` does"),
                    span,
                ));
            }
            self.advance();
            let element = self.parse_type_expr(scope, false)?;
            if self.peek() != Some(Token::RAngle) {
                return Err(self.error("unbalanced `<`"));
            }
            self.advance();
            return Ok(TypeRef::vector(element));
        }

        if scope.has_generic(&name) {
            return Ok(TypeRef::Any(name));
        }

        let ty = TypeRef::Raw(name);
        if ty.is_presence_literal() && !allow_literal {
            return Err(self.error_at(
                format!("`{ty}` is only valid as the type of a conditional"),
                span,
            ));
        }
        Ok(ty)
    }
}

fn contains_generic(ty: &TypeRef) -> bool {
    let mut found = false;
    ty.walk(&mut |t| found |= matches!(t, TypeRef::Any(_)));
    found
}

fn parse_tag(digits: &str) -> Option<u32> {
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

fn syntax_error(source: &str, message: String, span: Range<usize>) -> Error {
    Error::SchemaSyntax {
        line: line_of(source, span.start),
        message,
        span,
    }
}
