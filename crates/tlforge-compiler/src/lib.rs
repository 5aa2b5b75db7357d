//! tlforge compiler: schema parser, resolver, layout compiler, and emitters.
//!
//! This crate provides the compilation pipeline for TL-style schemas:
//! - `parser` - lexer and entry parser producing `Definition`s
//! - `model` - schema type model shared by every stage
//! - `analyze` - reference resolution, families, and flag groups
//! - `compile` - wire layouts, the constructor registry, and call signatures
//! - `emit` - Rust source, JSON descriptors, and a text dump
//! - `diagnostics` - error rendering against the schema source

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::ops::Range;

pub mod analyze;
pub mod compile;
pub mod diagnostics;
pub mod emit;
pub mod model;
pub mod naming;
pub mod parser;

#[cfg(test)]
mod diagnostics_tests;
#[cfg(test)]
mod test_utils;

pub use compile::{CompiledConstructor, CompiledMethod, CompiledSchema, Entry};
pub use diagnostics::ErrorPrinter;

/// Errors that abort a schema compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("line {line}: {message}")]
    SchemaSyntax {
        line: usize,
        message: String,
        span: Range<usize>,
    },

    /// A type name that is neither built in nor declared anywhere in the schema.
    #[error("line {line}: unknown type `{name}`")]
    UnknownTypeReference {
        line: usize,
        name: String,
        span: Range<usize>,
    },

    #[error("line {line}: tag {tag:#010x} of `{second}` is already used by `{first}`")]
    DuplicateTag {
        tag: u32,
        first: String,
        second: String,
        line: usize,
        span: Range<usize>,
    },
}

impl Error {
    pub fn line(&self) -> usize {
        match self {
            Self::SchemaSyntax { line, .. }
            | Self::UnknownTypeReference { line, .. }
            | Self::DuplicateTag { line, .. } => *line,
        }
    }

    /// Byte range of the offending source text.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::SchemaSyntax { span, .. }
            | Self::UnknownTypeReference { span, .. }
            | Self::DuplicateTag { span, .. } => span.clone(),
        }
    }

    /// The error text without the line prefix.
    pub fn message(&self) -> String {
        match self {
            Self::SchemaSyntax { message, .. } => message.clone(),
            Self::UnknownTypeReference { name, .. } => format!("unknown type `{name}`"),
            Self::DuplicateTag {
                tag, first, second, ..
            } => format!("tag {tag:#010x} of `{second}` is already used by `{first}`"),
        }
    }
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Compiles schema text into layouts, a populated registry, and call signatures.
pub fn compile(source: &str) -> Result<CompiledSchema> {
    let definitions = parser::parse(source)?;
    let schema = analyze::resolve(definitions)?;
    compile::compile_schema(schema)
}
