//! Layout compilation, registry population, and call signatures.

mod compiler;
mod layout;
mod rpc;

#[cfg(test)]
mod compiler_tests;

pub use compiler::{CompiledConstructor, CompiledMethod, CompiledSchema, Entry, compile_schema};
pub use layout::{Layout, Step, WireKind, layout_of};
pub use rpc::{CallForm, CallSignature, ResponseDecode, call_signature};
