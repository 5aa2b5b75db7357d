//! Dynamic runtime for compiled tlforge schemas.
//!
//! Executes the layouts produced by `tlforge-compiler` over a dynamic value
//! model instead of generated types: encode, decode through the registry,
//! size, flag recomputation, empty/non-empty narrowing, and calls through an
//! executor with their responses decoded per call signature.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod error;
mod rpc;
mod runtime;
mod value;

#[cfg(test)]
mod rpc_tests;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod value_tests;

pub use error::RuntimeError;
pub use rpc::DynamicRequest;
pub use runtime::Runtime;
pub use value::{Object, Value};
