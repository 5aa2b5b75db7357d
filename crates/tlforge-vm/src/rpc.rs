//! Dynamic requests and response decoding.
//!
//! A [`DynamicRequest`] is an ordinary [`RemoteCall`], so it goes through the
//! same executors as generated requests. Both call forms build the request
//! the same way and differ only in the executor they hand it to.

use std::io;

use tlforge_compiler::Entry;
use tlforge_compiler::compile::ResponseDecode;
use tlforge_wire::{
    DecodeError, Deserializer, Executor, RemoteCall, RpcError, Serializable, Serializer,
    SyncExecutor,
};

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use crate::value::{Object, Value};

/// A request built at runtime. Its response decodes to a [`Value`].
#[derive(Clone, Debug)]
pub struct DynamicRequest {
    runtime: Runtime,
    object: Object,
    /// Encoded size, computed when the request is built.
    size: usize,
}

impl DynamicRequest {
    pub fn object(&self) -> &Object {
        &self.object
    }
}

impl Serializable for DynamicRequest {
    fn serialize(&self, s: &mut Serializer<'_>) -> io::Result<()> {
        self.runtime
            .serialize(&self.object, s)
            .map_err(io::Error::from)
    }

    fn serialized_size(&self) -> usize {
        self.size
    }
}

impl RemoteCall for DynamicRequest {
    type Return = Value;

    fn read_response(&self, d: &mut Deserializer<'_>) -> Result<Value, RpcError> {
        self.runtime.read_response(&self.object, d)
    }
}

impl Runtime {
    /// Builds a request for the method `name`.
    ///
    /// The request is sized once here, so a value that cannot be encoded is
    /// rejected before it reaches an executor.
    pub fn request<K: Into<String>>(
        &self,
        name: &str,
        params: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<DynamicRequest, RuntimeError> {
        if self.schema().method(name).is_none() {
            return Err(match self.schema().entry(name) {
                Some(_) => RuntimeError::NotAMethod {
                    name: name.to_string(),
                },
                None => RuntimeError::UnknownEntry {
                    name: name.to_string(),
                },
            });
        }
        let object = self.instantiate(name, params)?;
        let size = self.size(&object)?;
        Ok(DynamicRequest {
            runtime: self.clone(),
            object,
            size,
        })
    }

    pub async fn call<E: Executor, K: Into<String>>(
        &self,
        executor: &E,
        name: &str,
        params: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Value, RpcError> {
        let request = self.request(name, params).map_err(io::Error::from)?;
        tracing::debug!(method = name, "submitting dynamic request");
        executor.submit(request).await
    }

    pub fn call_sync<E: SyncExecutor, K: Into<String>>(
        &self,
        executor: &E,
        name: &str,
        params: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Value, RpcError> {
        let request = self.request(name, params).map_err(io::Error::from)?;
        tracing::debug!(method = name, "submitting dynamic request");
        executor.submit_sync(request)
    }

    /// Decodes the response to `request` as its method's call signature describes.
    pub fn read_response(
        &self,
        request: &Object,
        d: &mut Deserializer<'_>,
    ) -> Result<Value, RpcError> {
        let method = match self.schema().resolve(request.tag)? {
            Entry::Method(i) => self.schema().methods.get(i),
            Entry::Type(_) => None,
        };
        let Some(method) = method else {
            return Err(DecodeError::UnexpectedConstructor { tag: request.tag }.into());
        };

        match &method.call.response {
            ResponseDecode::PassThrough { param } => match request.get(param) {
                Some(Value::Object(inner)) => self.read_response(inner, d),
                _ => Err(io::Error::from(RuntimeError::MissingField {
                    field: param.clone(),
                })
                .into()),
            },
            ResponseDecode::IntVector => Ok(Value::Vector(
                d.read_int_vector()?.into_iter().map(Value::Int).collect(),
            )),
            ResponseDecode::LongVector => Ok(Value::Vector(
                d.read_long_vector()?.into_iter().map(Value::Long).collect(),
            )),
            ResponseDecode::StringVector => Ok(Value::Vector(
                d.read_string_vector()?.into_iter().map(Value::String).collect(),
            )),
            ResponseDecode::ObjectVector(kind) => Ok(Value::Vector(
                d.read_vector_with(|d| self.read_value(kind, d))?,
            )),
            ResponseDecode::Primitive(kind) => Ok(self.read_value(kind, d)?),
            ResponseDecode::Object { family } => {
                let start = d.consumed();
                match self.deserialize_in(family, d) {
                    Ok(object) => Ok(Value::from(object)),
                    Err(e) if e.is_eof() && d.consumed() == start => Err(RpcError::EmptyResponse),
                    Err(DecodeError::UnexpectedConstructor { tag })
                        if d.consumed() == start + 4 =>
                    {
                        Err(RpcError::ResponseTypeMismatch {
                            expected: family.clone(),
                            found: tag,
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}
