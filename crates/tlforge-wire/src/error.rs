use std::io;

/// Failure while reading a value from the wire.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// No constructor is registered for the tag.
    #[error("unknown constructor {tag:#010x}")]
    UnknownConstructor { tag: u32 },

    /// The tag is known but not valid at this position.
    #[error("unexpected constructor {tag:#010x}")]
    UnexpectedConstructor { tag: u32 },

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("malformed length header {marker:#04x}")]
    MalformedLength { marker: u8 },
}

impl DecodeError {
    /// True when the stream ended before any byte of the value was read.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

/// Registry population error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate constructor tag {tag:#010x}")]
    DuplicateTag { tag: u32 },
}

/// Failure of a remote call, as seen by the caller.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The response decoded to a constructor outside the expected family.
    #[error("response type mismatch: expected {expected}, found {found:#010x}")]
    ResponseTypeMismatch { expected: String, found: u32 },

    /// The response carried no decodable object.
    #[error("empty response")]
    EmptyResponse,

    /// The remote side answered with an error.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// Transport-level failure reported by the executor.
    #[error("transport error: {0}")]
    Transport(String),
}
