//! JSON descriptors of a compiled schema.

use crate::CompiledSchema;

/// Constructors, methods, and families with their layouts and call signatures.
pub fn emit(schema: &CompiledSchema) -> serde_json::Result<String> {
    serde_json::to_string_pretty(schema)
}

/// Same as [`emit`] without whitespace.
pub fn emit_compact(schema: &CompiledSchema) -> serde_json::Result<String> {
    serde_json::to_string(schema)
}
