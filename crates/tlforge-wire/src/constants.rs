//! Wire format constants.

/// Tag written in place of a boxed `Bool` holding `true` (`boolTrue = Bool`).
pub const BOOL_TRUE_ID: u32 = 0x997275B5;

/// Tag written in place of a boxed `Bool` holding `false` (`boolFalse = Bool`).
pub const BOOL_FALSE_ID: u32 = 0xBC799737;

/// Tag preceding every boxed vector.
pub const VECTOR_ID: u32 = 0x1CB5C415;

/// First byte of a string/bytes header whose length needs three bytes.
///
/// Lengths below this value fit in the single header byte.
pub const LONG_LENGTH_MARKER: u8 = 0xFE;

/// Largest payload the 3-byte length header can describe.
pub const MAX_BYTES_LEN: usize = 0xFF_FFFF;
