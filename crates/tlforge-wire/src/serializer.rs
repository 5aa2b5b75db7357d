//! Little-endian writer for the wire format.

use std::io::{self, Write};

use crate::constants::{BOOL_FALSE_ID, BOOL_TRUE_ID, LONG_LENGTH_MARKER, MAX_BYTES_LEN, VECTOR_ID};

/// Number of zero bytes needed to bring `len` up to a multiple of 4.
pub const fn padding_for(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Encoded size of a string/bytes payload of `len` bytes, header and padding included.
pub const fn bytes_size(len: usize) -> usize {
    let header = if len < LONG_LENGTH_MARKER as usize { 1 } else { 4 };
    header + len + padding_for(header + len)
}

/// Error for a conditional field whose bit is set but whose value is absent.
pub fn missing_conditional(field: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("conditional field `{field}` is flagged present but has no value"),
    )
}

/// Writes wire primitives into a caller-owned stream and counts the bytes.
pub struct Serializer<'w> {
    out: &'w mut dyn Write,
    written: usize,
}

impl<'w> Serializer<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out, written: 0 }
    }

    /// Bytes written through this serializer so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> io::Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> io::Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> io::Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn write_f64(&mut self, value: f64) -> io::Result<()> {
        self.put(&value.to_le_bytes())
    }

    /// Writes one of the two boolean sentinel tags.
    pub fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.write_u32(if value { BOOL_TRUE_ID } else { BOOL_FALSE_ID })
    }

    /// Writes a length-prefixed payload padded to a multiple of 4.
    ///
    /// Payloads longer than [`MAX_BYTES_LEN`] cannot be described by the
    /// header and fail with `InvalidInput`.
    pub fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        let len = data.len();
        if len > MAX_BYTES_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("payload of {len} bytes exceeds the {MAX_BYTES_LEN} byte limit"),
            ));
        }

        let header = if len < LONG_LENGTH_MARKER as usize {
            self.put(&[len as u8])?;
            1
        } else {
            let [b0, b1, b2, _] = (len as u32).to_le_bytes();
            self.put(&[LONG_LENGTH_MARKER, b0, b1, b2])?;
            4
        };

        self.put(data)?;
        let pad = padding_for(header + len);
        self.put(&[0u8; 3][..pad])
    }

    pub fn write_string(&mut self, value: &str) -> io::Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Writes the vector tag followed by the element count.
    pub fn write_vector_header(&mut self, count: usize) -> io::Result<()> {
        let count = u32::try_from(count).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "vector too long for the wire")
        })?;
        self.write_u32(VECTOR_ID)?;
        self.write_u32(count)
    }
}
