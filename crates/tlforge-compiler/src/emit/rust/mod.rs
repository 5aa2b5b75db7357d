//! Rust bindings from a compiled schema.
//!
//! The generated file depends only on the wire runtime crate.

mod codec;
mod config;
mod emitter;
mod families;
mod items;
mod naming;
mod surface;

#[cfg(test)]
mod codec_tests;

pub use config::{Config, Indirection};
pub use emitter::Emitter;

use crate::CompiledSchema;

/// Emit Rust from a compiled schema.
pub fn emit(schema: &CompiledSchema) -> String {
    Emitter::new(schema, Config::default()).emit()
}

/// Emit Rust from a compiled schema with custom config.
pub fn emit_with_config(schema: &CompiledSchema, config: Config) -> String {
    Emitter::new(schema, config).emit()
}
