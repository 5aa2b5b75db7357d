//! Hand-written constructor fixtures shaped like generated code.

use std::io;

use crate::{
    Bare, DecodeError, Deserializable, Deserializer, Identifiable, Serializable, Serializer,
    deserialize_boxed, serialize_boxed,
};

/// `messages.affectedHistory#b45c69d1 pts:int pts_count:int offset:int = messages.AffectedHistory;`
#[derive(Debug, Clone, PartialEq)]
pub struct AffectedHistory {
    pub pts: i32,
    pub pts_count: i32,
    pub offset: i32,
}

impl Identifiable for AffectedHistory {
    const CONSTRUCTOR_ID: u32 = 0xb45c69d1;
}

impl Bare for AffectedHistory {
    fn serialize_bare(&self, s: &mut Serializer<'_>) -> io::Result<()> {
        s.write_i32(self.pts)?;
        s.write_i32(self.pts_count)?;
        s.write_i32(self.offset)
    }

    fn bare_size(&self) -> usize {
        12
    }

    fn deserialize_bare(d: &mut Deserializer<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            pts: d.read_i32()?,
            pts_count: d.read_i32()?,
            offset: d.read_i32()?,
        })
    }
}

impl Serializable for AffectedHistory {
    fn serialize(&self, s: &mut Serializer<'_>) -> io::Result<()> {
        serialize_boxed(self, s)
    }

    fn serialized_size(&self) -> usize {
        4 + self.bare_size()
    }
}

impl Deserializable for AffectedHistory {
    fn deserialize(d: &mut Deserializer<'_>) -> Result<Self, DecodeError> {
        deserialize_boxed(d)
    }
}

pub fn sample() -> AffectedHistory {
    AffectedHistory {
        pts: 10,
        pts_count: 2,
        offset: 100,
    }
}
