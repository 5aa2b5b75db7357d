//! Little-endian reader for the wire format.

use std::io::Read;

use crate::constants::{BOOL_FALSE_ID, BOOL_TRUE_ID, LONG_LENGTH_MARKER, VECTOR_ID};
use crate::error::DecodeError;
use crate::serializer::padding_for;

/// Reads wire primitives from a caller-owned stream and counts the bytes.
pub struct Deserializer<'r> {
    input: &'r mut dyn Read,
    consumed: usize,
}

impl<'r> Deserializer<'r> {
    pub fn new(input: &'r mut dyn Read) -> Self {
        Self { input, consumed: 0 }
    }

    /// Bytes consumed from the stream so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        self.input.read_exact(&mut buf)?;
        self.consumed += N;
        Ok(buf)
    }

    fn take_vec(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        let mut buf = vec![0u8; len];
        self.input.read_exact(&mut buf)?;
        self.consumed += len;
        Ok(buf)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.take()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.take()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        match self.read_u32()? {
            BOOL_TRUE_ID => Ok(true),
            BOOL_FALSE_ID => Ok(false),
            tag => Err(DecodeError::UnexpectedConstructor { tag }),
        }
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let [first] = self.take::<1>()?;
        let (header, len) = match first {
            LONG_LENGTH_MARKER => {
                let [b0, b1, b2] = self.take::<3>()?;
                (4, u32::from_le_bytes([b0, b1, b2, 0]) as usize)
            }
            0xFF => return Err(DecodeError::MalformedLength { marker: first }),
            short => (1, short as usize),
        };

        let data = self.take_vec(len)?;
        let mut pad = [0u8; 3];
        let pad_len = padding_for(header + len);
        self.input.read_exact(&mut pad[..pad_len])?;
        self.consumed += pad_len;
        Ok(data)
    }

    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        String::from_utf8(self.read_bytes()?).map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Reads the vector tag and returns the element count.
    pub fn read_vector_header(&mut self) -> Result<usize, DecodeError> {
        match self.read_u32()? {
            VECTOR_ID => Ok(self.read_u32()? as usize),
            tag => Err(DecodeError::UnexpectedConstructor { tag }),
        }
    }

    /// Reads a boxed vector, decoding each element with `read`.
    pub fn read_vector_with<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let count = self.read_vector_header()?;
        // The count comes off the wire; cap the preallocation.
        let mut items = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }

    pub fn read_int_vector(&mut self) -> Result<Vec<i32>, DecodeError> {
        self.read_vector_with(Self::read_i32)
    }

    pub fn read_long_vector(&mut self) -> Result<Vec<i64>, DecodeError> {
        self.read_vector_with(Self::read_i64)
    }

    pub fn read_string_vector(&mut self) -> Result<Vec<String>, DecodeError> {
        self.read_vector_with(Self::read_string)
    }
}
