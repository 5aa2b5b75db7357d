//! Output generation from a compiled schema.
//!
//! - `rust` - Rust bindings: structs, family enums, registry, and call traits
//! - `json` - the compiled model as JSON descriptors
//! - `dump` - human-readable listing of layouts and families

pub mod dump;
pub mod json;
pub mod rust;
