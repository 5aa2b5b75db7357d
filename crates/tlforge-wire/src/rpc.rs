//! Boundary between generated request types and the transport that runs them.
//!
//! A request is any [`RemoteCall`]: it serializes itself and knows how to
//! decode its own response. The transport plugs in through [`Executor`]
//! (async) and [`SyncExecutor`] (blocking); both forms of every generated
//! call delegate to the same executor.

use crate::deserializer::Deserializer;
use crate::error::{DecodeError, RpcError};
use crate::traits::{Deserializable, Serializable};

pub trait RemoteCall: Serializable {
    type Return;

    fn read_response(&self, d: &mut Deserializer<'_>) -> Result<Self::Return, RpcError>;
}

pub trait Executor {
    fn submit<R>(&self, request: R) -> impl Future<Output = Result<R::Return, RpcError>> + Send
    where
        R: RemoteCall + Send + 'static,
        R::Return: Send;
}

pub trait SyncExecutor {
    fn submit_sync<R: RemoteCall>(&self, request: R) -> Result<R::Return, RpcError>;
}

/// Decodes a single boxed object as the response of a call.
///
/// An exhausted stream is an empty response. A known tag outside `T` is
/// reported as a type mismatch against `expected`; an unknown tag stays a
/// decode error.
pub fn read_object_response<T: Deserializable>(
    d: &mut Deserializer<'_>,
    expected: &str,
) -> Result<T, RpcError> {
    let start = d.consumed();
    match T::deserialize(d) {
        Ok(value) => Ok(value),
        Err(e) if e.is_eof() && d.consumed() == start => Err(RpcError::EmptyResponse),
        Err(DecodeError::UnexpectedConstructor { tag }) if d.consumed() == start + 4 => {
            Err(RpcError::ResponseTypeMismatch {
                expected: expected.to_string(),
                found: tag,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Decodes a response body received by an executor for `request`.
pub fn response_from_bytes<R: RemoteCall>(
    request: &R,
    mut bytes: &[u8],
) -> Result<R::Return, RpcError> {
    let mut d = Deserializer::new(&mut bytes);
    request.read_response(&mut d)
}
