//! Wire format runtime for tlforge schemas.
//!
//! Generated code and the dynamic runtime depend only on this crate:
//! - `serializer` / `deserializer` - little-endian codec over `io::Write` / `io::Read`
//! - `traits` - `Identifiable`, `Serializable`, `Deserializable`, `Bare`
//! - `registry` - write-once tag table used for polymorphic dispatch
//! - `rpc` - request/response boundary towards an external executor

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod constants;
mod deserializer;
mod error;
mod registry;
mod rpc;
mod serializer;
mod traits;

#[cfg(test)]
mod rpc_tests;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod traits_tests;

pub use constants::{BOOL_FALSE_ID, BOOL_TRUE_ID, LONG_LENGTH_MARKER, MAX_BYTES_LEN, VECTOR_ID};
pub use deserializer::Deserializer;
pub use error::{DecodeError, RegistryError, RpcError};
pub use registry::{Registry, RegistryBuilder};
pub use rpc::{Executor, RemoteCall, SyncExecutor, read_object_response, response_from_bytes};
pub use serializer::{Serializer, bytes_size, missing_conditional, padding_for};
pub use traits::{
    Bare, DecodeFn, Deserializable, Identifiable, Serializable, decode_bare, deserialize_boxed,
    serialize_boxed,
};
