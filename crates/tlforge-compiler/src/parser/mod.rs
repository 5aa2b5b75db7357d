//! Schema parser.
//!
//! Turns schema text into one [`Definition`] per entry. Purely syntactic:
//! names are checked against the rest of the schema by `analyze`.

mod grammar;
mod lexer;
mod tag;

#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod tag_tests;

use std::ops::Range;

use crate::model::TypeRef;

pub use grammar::parse;
pub use tag::infer_tag;

/// Which section of the schema an entry was declared in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Type,
    Method,
}

/// `{X:Type}`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generic {
    pub name: String,
    pub bound: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    /// Source range of the type.
    pub ty_span: Range<usize>,
}

/// One parsed schema entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub category: Category,
    pub name: String,
    pub tag: u32,
    /// The tag was computed from the entry text rather than written.
    pub tag_inferred: bool,
    pub generics: Vec<Generic>,
    pub params: Vec<Param>,
    pub result: TypeRef,
    pub result_span: Range<usize>,
    pub line: usize,
    /// Source range of the entry name.
    pub span: Range<usize>,
}

/// 1-based line of a byte offset.
pub(crate) fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
