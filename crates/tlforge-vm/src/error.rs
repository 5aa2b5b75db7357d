use std::io;

/// Failure to build or encode a dynamic value.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("no constructor or method named `{name}`")]
    UnknownEntry { name: String },

    #[error("`{name}` is a constructor, not a method")]
    NotAMethod { name: String },

    #[error("unknown constructor {tag:#010x}")]
    UnknownConstructor { tag: u32 },

    /// Flag words are derived and cannot be set.
    #[error("`{entry}` has no field `{field}`")]
    UnknownField { entry: String, field: String },

    #[error("missing value for field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` does not hold a value of type `{expected}`")]
    TypeMismatch { field: String, expected: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<RuntimeError> for io::Error {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
