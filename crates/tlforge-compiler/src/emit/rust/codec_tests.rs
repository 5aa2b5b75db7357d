use super::codec::{compute_body, deserialize_body, serialize_body, size_body, sync_body};
use crate::compile::Layout;
use crate::model::FlagGroupId;
use crate::test_utils::compiled;

fn layout(name: &str) -> Layout {
    compiled().constructor(name).unwrap().layout.clone()
}

#[test]
fn compute_flags_from_drivers() {
    insta::assert_snapshot!(compute_body(&layout("channel"), FlagGroupId(0)), @r"
    let mut word = 0;
    if self.creator {
        word |= 1 << 0;
    }
    if self.broadcast {
        word |= 1 << 5;
    }
    if self.photo.is_some() {
        word |= 1 << 1;
    }
    if self.participants_count.is_some() {
        word |= 1 << 2;
    }
    word
    ");
}

#[test]
fn sync_flags_from_words() {
    insta::assert_snapshot!(sync_body(&layout("channel")).unwrap(), @r"
    let word0 = self.compute_flags();
    self.creator = word0 & (1 << 0) != 0;
    self.broadcast = word0 & (1 << 5) != 0;
    self.verified = self.verified && word0 & (1 << 1) != 0;
    ");
    assert_eq!(sync_body(&layout("config")), None);
    assert_eq!(sync_body(&layout("inputPeerEmpty")), None);
}

#[test]
fn presence_sharing_a_bit_with_an_optional() {
    let source = "shared#00000003 flags:# flag:flags.0?true value:flags.0?int = Shared;";
    let schema = crate::compile(source).unwrap();
    let shared = &schema.constructor("shared").unwrap().layout;

    insta::assert_snapshot!(compute_body(shared, FlagGroupId(0)), @r"
    let mut word = 0;
    if self.flag {
        word |= 1 << 0;
    }
    if self.value.is_some() {
        word |= 1 << 0;
    }
    word
    ");
    insta::assert_snapshot!(sync_body(shared).unwrap(), @r"
    let word0 = self.compute_flags();
    self.flag = word0 & (1 << 0) != 0;
    ");
}

#[test]
fn serialize_conditionals() {
    insta::assert_snapshot!(serialize_body(&layout("channel")), @r#"
    let word0 = self.compute_flags();
    buf.write_u32(word0)?;
    buf.write_i64(self.id)?;
    buf.write_string(&self.title)?;
    if word0 & (1 << 1) != 0 {
        let Some(v) = &self.photo else {
            return Err(wire::missing_conditional("photo"));
        };
        wire::Serializable::serialize(v, buf)?;
    }
    if word0 & (1 << 1) != 0 {
        buf.write_bool(self.verified)?;
    }
    if word0 & (1 << 2) != 0 {
        let Some(v) = &self.participants_count else {
            return Err(wire::missing_conditional("participants_count"));
        };
        buf.write_i32(*v)?;
    }
    Ok(())
    "#);
}

#[test]
fn size_of_conditionals() {
    insta::assert_snapshot!(size_body(&layout("channel"), 0), @r"
    let word0 = self.compute_flags();
    let mut size = 12;
    size += wire::bytes_size(self.title.len());
    if let Some(v) = &self.photo {
        size += wire::Serializable::serialized_size(v);
    }
    if word0 & (1 << 1) != 0 {
        size += 4;
    }
    if let Some(v) = &self.participants_count {
        size += 4;
    }
    size
    ");
}

#[test]
fn deserialize_conditionals() {
    insta::assert_snapshot!(deserialize_body(&layout("channel"), "super::"), @r"
    let word0 = buf.read_u32()?;
    let creator = word0 & (1 << 0) != 0;
    let broadcast = word0 & (1 << 5) != 0;
    let id = buf.read_i64()?;
    let title = buf.read_string()?;
    let photo = if word0 & (1 << 1) != 0 {
        Some(<super::enums::ChatPhoto as wire::Deserializable>::deserialize(buf)?)
    } else {
        None
    };
    let verified = if word0 & (1 << 1) != 0 {
        buf.read_bool()?
    } else {
        false
    };
    let participants_count = if word0 & (1 << 2) != 0 {
        Some(buf.read_i32()?)
    } else {
        None
    };
    Ok(Self { creator, broadcast, id, title, photo, verified, participants_count })
    ");
}

#[test]
fn fixed_size_body_is_a_literal() {
    assert_eq!(size_body(&layout("messages.affectedHistory"), 0), "12");
    assert_eq!(size_body(&layout("messages.affectedHistory"), 4), "16");
    assert_eq!(size_body(&layout("inputPeerEmpty"), 0), "0");
}

#[test]
fn bare_vector_codec() {
    let config = layout("config");

    insta::assert_snapshot!(serialize_body(&config), @r"
    buf.write_i32(self.date)?;
    buf.write_vector_header(self.dc_options.len())?;
    for item0 in &self.dc_options {
        wire::Bare::serialize_bare(item0, buf)?;
    }
    Ok(())
    ");
    insta::assert_snapshot!(size_body(&config, 0), @r"
    let mut size = 4;
    size += 8 + self.dc_options.iter().map(|item0| wire::Bare::bare_size(item0)).sum::<usize>();
    size
    ");
    insta::assert_snapshot!(deserialize_body(&config, "super::"), @r"
    let date = buf.read_i32()?;
    let dc_options = buf.read_vector_with(|buf| Ok(<super::types::DcOption as wire::Bare>::deserialize_bare(buf)?))?;
    Ok(Self { date, dc_options })
    ");
}

#[test]
fn empty_body() {
    let empty = layout("inputPeerEmpty");

    assert_eq!(serialize_body(&empty), "Ok(())");
    assert_eq!(deserialize_body(&empty, "super::"), "Ok(Self {})");
}
