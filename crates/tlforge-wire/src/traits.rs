//! Codec traits implemented by generated types, plus the primitive impls.

use std::io;

use crate::deserializer::Deserializer;
use crate::error::DecodeError;
use crate::serializer::{Serializer, bytes_size};

/// A schema constructor with a fixed 32-bit tag.
pub trait Identifiable {
    const CONSTRUCTOR_ID: u32;
}

/// A value that can write itself in boxed form.
pub trait Serializable {
    fn serialize(&self, s: &mut Serializer<'_>) -> io::Result<()>;

    /// Exact number of bytes [`serialize`](Self::serialize) writes.
    fn serialized_size(&self) -> usize;

    fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        let mut s = Serializer::new(&mut buf);
        self.serialize(&mut s)?;
        Ok(buf)
    }
}

/// A value that can read itself in boxed form.
pub trait Deserializable: Sized {
    fn deserialize(d: &mut Deserializer<'_>) -> Result<Self, DecodeError>;

    fn from_bytes(mut bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut d = Deserializer::new(&mut bytes);
        Self::deserialize(&mut d)
    }
}

/// Constructor body without the leading tag.
///
/// Boxed forms are derived from it with [`serialize_boxed`] and
/// [`deserialize_boxed`]; bare references in a schema use it directly.
pub trait Bare: Sized {
    fn serialize_bare(&self, s: &mut Serializer<'_>) -> io::Result<()>;
    fn bare_size(&self) -> usize;
    fn deserialize_bare(d: &mut Deserializer<'_>) -> Result<Self, DecodeError>;
}

/// Decoder entry stored in a registry of generated constructors.
pub type DecodeFn<O> = fn(&mut Deserializer<'_>) -> Result<O, DecodeError>;

pub fn serialize_boxed<T: Identifiable + Bare>(
    value: &T,
    s: &mut Serializer<'_>,
) -> io::Result<()> {
    s.write_u32(T::CONSTRUCTOR_ID)?;
    value.serialize_bare(s)
}

/// Reads the tag, checks it names `T`, then reads the body.
pub fn deserialize_boxed<T: Identifiable + Bare>(
    d: &mut Deserializer<'_>,
) -> Result<T, DecodeError> {
    let tag = d.read_u32()?;
    if tag != T::CONSTRUCTOR_ID {
        return Err(DecodeError::UnexpectedConstructor { tag });
    }
    T::deserialize_bare(d)
}

/// Reads a body of `T` (tag already consumed) and lifts it into `O`.
pub fn decode_bare<T: Bare, O: From<T>>(d: &mut Deserializer<'_>) -> Result<O, DecodeError> {
    T::deserialize_bare(d).map(O::from)
}

macro_rules! fixed_width {
    ($ty:ty, $size:expr, $write:ident, $read:ident) => {
        impl Serializable for $ty {
            fn serialize(&self, s: &mut Serializer<'_>) -> io::Result<()> {
                s.$write(*self)
            }

            fn serialized_size(&self) -> usize {
                $size
            }
        }

        impl Deserializable for $ty {
            fn deserialize(d: &mut Deserializer<'_>) -> Result<Self, DecodeError> {
                d.$read()
            }
        }
    };
}

fixed_width!(i32, 4, write_i32, read_i32);
fixed_width!(i64, 8, write_i64, read_i64);
fixed_width!(f32, 4, write_f32, read_f32);
fixed_width!(f64, 8, write_f64, read_f64);
fixed_width!(bool, 4, write_bool, read_bool);

impl Serializable for String {
    fn serialize(&self, s: &mut Serializer<'_>) -> io::Result<()> {
        s.write_string(self)
    }

    fn serialized_size(&self) -> usize {
        bytes_size(self.len())
    }
}

impl Deserializable for String {
    fn deserialize(d: &mut Deserializer<'_>) -> Result<Self, DecodeError> {
        d.read_string()
    }
}

// `bytes`
impl Serializable for Vec<u8> {
    fn serialize(&self, s: &mut Serializer<'_>) -> io::Result<()> {
        s.write_bytes(self)
    }

    fn serialized_size(&self) -> usize {
        bytes_size(self.len())
    }
}

impl Deserializable for Vec<u8> {
    fn deserialize(d: &mut Deserializer<'_>) -> Result<Self, DecodeError> {
        d.read_bytes()
    }
}

// `Vector<T>`
impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, s: &mut Serializer<'_>) -> io::Result<()> {
        s.write_vector_header(self.len())?;
        self.iter().try_for_each(|item| item.serialize(s))
    }

    fn serialized_size(&self) -> usize {
        8 + self.iter().map(Serializable::serialized_size).sum::<usize>()
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize(d: &mut Deserializer<'_>) -> Result<Self, DecodeError> {
        d.read_vector_with(T::deserialize)
    }
}
