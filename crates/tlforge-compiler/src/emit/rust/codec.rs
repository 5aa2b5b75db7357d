//! Codec bodies: the statements that write, size, and read one layout.
//!
//! Generated code names its serializer/deserializer argument `buf` and the
//! `i`-th flag word of a body `word{i}`.

use crate::compile::{Layout, Step, WireKind};
use crate::model::FlagGroupId;
use crate::naming::{field_ident, to_snake_case};

use super::naming::rust_type;

/// Where a value lives in generated code.
#[derive(Clone, Debug)]
pub(crate) enum Place {
    /// `self.<ident>`
    Field(String),
    /// A local bound to a reference.
    Binding(String),
}

impl Place {
    fn by_ref(&self) -> String {
        match self {
            Self::Field(ident) => format!("&self.{ident}"),
            Self::Binding(name) => name.clone(),
        }
    }

    /// For `Copy` values.
    fn by_value(&self) -> String {
        match self {
            Self::Field(ident) => format!("self.{ident}"),
            Self::Binding(name) => format!("*{name}"),
        }
    }

    fn receiver(&self) -> String {
        match self {
            Self::Field(ident) => format!("self.{ident}"),
            Self::Binding(name) => name.clone(),
        }
    }
}

pub(crate) fn word(group: FlagGroupId) -> String {
    format!("word{}", group.0)
}

pub(crate) fn compute_fn(flag_word: &str) -> String {
    format!("compute_{}", to_snake_case(flag_word))
}

fn bit_test(group: FlagGroupId, bit: u8) -> String {
    format!("{} & (1 << {bit}) != 0", word(group))
}

pub(crate) fn indent(text: &str, levels: usize) -> String {
    let pad = "    ".repeat(levels);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Statement writing one value.
pub(crate) fn write_value(kind: &WireKind, place: &Place, depth: usize) -> String {
    match kind {
        WireKind::Int => format!("buf.write_i32({})?;", place.by_value()),
        WireKind::Long => format!("buf.write_i64({})?;", place.by_value()),
        WireKind::Double => format!("buf.write_f64({})?;", place.by_value()),
        WireKind::Float => format!("buf.write_f32({})?;", place.by_value()),
        WireKind::Bool => format!("buf.write_bool({})?;", place.by_value()),
        WireKind::String => format!("buf.write_string({})?;", place.by_ref()),
        WireKind::Bytes => format!("buf.write_bytes({})?;", place.by_ref()),
        WireKind::Bare { .. } => format!("wire::Bare::serialize_bare({}, buf)?;", place.by_ref()),
        WireKind::Vector(inner) if inner.contains_bare() => {
            let item = format!("item{depth}");
            let body = write_value(inner, &Place::Binding(item.clone()), depth + 1);
            format!(
                "buf.write_vector_header({}.len())?;\nfor {item} in {} {{\n{}\n}}",
                place.receiver(),
                place.by_ref(),
                indent(&body, 1)
            )
        }
        WireKind::Vector(_) | WireKind::Object { .. } | WireKind::Query { .. } => {
            format!("wire::Serializable::serialize({}, buf)?;", place.by_ref())
        }
    }
}

/// Expression for the encoded size of one value.
pub(crate) fn size_value(kind: &WireKind, place: &Place, depth: usize) -> String {
    if let Some(size) = kind.fixed_size() {
        return size.to_string();
    }
    match kind {
        WireKind::String | WireKind::Bytes => {
            format!("wire::bytes_size({}.len())", place.receiver())
        }
        WireKind::Bare { .. } => format!("wire::Bare::bare_size({})", place.by_ref()),
        WireKind::Vector(inner) if inner.contains_bare() => {
            let item = format!("item{depth}");
            let element = size_value(inner, &Place::Binding(item.clone()), depth + 1);
            format!(
                "8 + {}.iter().map(|{item}| {element}).sum::<usize>()",
                place.receiver()
            )
        }
        _ => format!("wire::Serializable::serialized_size({})", place.by_ref()),
    }
}

/// Expression reading one value; propagates errors with `?`.
pub(crate) fn read_value(kind: &WireKind, prefix: &str) -> String {
    match kind {
        WireKind::Int => "buf.read_i32()?".to_string(),
        WireKind::Long => "buf.read_i64()?".to_string(),
        WireKind::Double => "buf.read_f64()?".to_string(),
        WireKind::Float => "buf.read_f32()?".to_string(),
        WireKind::Bool => "buf.read_bool()?".to_string(),
        WireKind::String => "buf.read_string()?".to_string(),
        WireKind::Bytes => "buf.read_bytes()?".to_string(),
        WireKind::Vector(inner) => match inner.as_ref() {
            WireKind::Int => "buf.read_int_vector()?".to_string(),
            WireKind::Long => "buf.read_long_vector()?".to_string(),
            WireKind::String => "buf.read_string_vector()?".to_string(),
            inner if inner.contains_bare() => {
                format!("buf.read_vector_with(|buf| Ok({}))?", read_value(inner, prefix))
            }
            _ => format!(
                "<{} as wire::Deserializable>::deserialize(buf)?",
                rust_type(kind, prefix)
            ),
        },
        WireKind::Bare { .. } => format!(
            "<{} as wire::Bare>::deserialize_bare(buf)?",
            rust_type(kind, prefix)
        ),
        WireKind::Object { .. } | WireKind::Query { .. } => format!(
            "<{} as wire::Deserializable>::deserialize(buf)?",
            rust_type(kind, prefix)
        ),
    }
}

/// Body of the `compute_<word>` method for flag word `group`.
pub(crate) fn compute_body(layout: &Layout, group: FlagGroupId) -> String {
    let drivers: Vec<String> = layout
        .steps
        .iter()
        .filter_map(|step| match step {
            Step::Optional {
                name,
                group: g,
                bit,
                ..
            } if *g == group => Some(format!(
                "if self.{}.is_some() {{\n    word |= 1 << {bit};\n}}",
                field_ident(name)
            )),
            Step::Presence { name, group: g, bit } if *g == group => Some(format!(
                "if self.{} {{\n    word |= 1 << {bit};\n}}",
                field_ident(name)
            )),
            _ => None,
        })
        .collect();

    if drivers.is_empty() {
        return "0".to_string();
    }
    format!("let mut word = 0;\n{}\nword", drivers.join("\n"))
}

/// Body of `sync_flags`: every `true` field takes its bit and every shared
/// `Bool` is cleared while its bit is clear. `None` when the layout has neither.
pub(crate) fn sync_body(layout: &Layout) -> Option<String> {
    let words = layout.flag_words();
    let mut needed = Vec::new();
    let mut assigns = Vec::new();

    for step in &layout.steps {
        let (group, line) = match step {
            Step::Presence { name, group, bit } => (
                *group,
                format!("self.{} = {};", field_ident(name), bit_test(*group, *bit)),
            ),
            Step::SharedBool { name, group, bit } => {
                let ident = field_ident(name);
                (
                    *group,
                    format!("self.{ident} = self.{ident} && {};", bit_test(*group, *bit)),
                )
            }
            _ => continue,
        };
        if !needed.contains(&group) {
            needed.push(group);
        }
        assigns.push(line);
    }

    if assigns.is_empty() {
        return None;
    }
    let mut lines: Vec<String> = needed
        .iter()
        .filter_map(|g| {
            let name = words.get(g.0 as usize)?;
            Some(format!("let {} = self.{}();", word(*g), compute_fn(name)))
        })
        .collect();
    lines.extend(assigns);
    Some(lines.join("\n"))
}

/// Statements of `serialize_bare`, or of `serialize` after the tag for generic bodies.
pub(crate) fn serialize_body(layout: &Layout) -> String {
    let mut lines = Vec::new();
    for step in &layout.steps {
        match step {
            Step::FlagWord { name, group } => {
                let w = word(*group);
                lines.push(format!("let {w} = self.{}();", compute_fn(name)));
                lines.push(format!("buf.write_u32({w})?;"));
            }
            Step::Field { name, kind } => {
                lines.push(write_value(kind, &Place::Field(field_ident(name)), 0));
            }
            Step::Optional {
                name,
                group,
                bit,
                kind,
            } => {
                let write = write_value(kind, &Place::Binding("v".to_string()), 0);
                lines.push(format!(
                    "if {} {{\n    let Some(v) = &self.{} else {{\n        return Err(wire::missing_conditional(\"{name}\"));\n    }};\n{}\n}}",
                    bit_test(*group, *bit),
                    field_ident(name),
                    indent(&write, 1)
                ));
            }
            Step::SharedBool { name, group, bit } => {
                lines.push(format!(
                    "if {} {{\n    buf.write_bool(self.{})?;\n}}",
                    bit_test(*group, *bit),
                    field_ident(name)
                ));
            }
            Step::Presence { .. } => {}
        }
    }
    lines.push("Ok(())".to_string());
    lines.join("\n")
}

/// Body of a size method: `base` bytes plus everything after the tag.
pub(crate) fn size_body(layout: &Layout, base: usize) -> String {
    let fixed = layout.fixed_size() - 4 + base;
    let words = layout.flag_words();
    let mut words_needed = Vec::new();
    let mut parts = Vec::new();

    for step in &layout.steps {
        match step {
            Step::Field { name, kind } if kind.fixed_size().is_none() => {
                let size = size_value(kind, &Place::Field(field_ident(name)), 0);
                parts.push(format!("size += {size};"));
            }
            Step::Optional { name, kind, .. } => {
                let size = size_value(kind, &Place::Binding("v".to_string()), 0);
                parts.push(format!(
                    "if let Some(v) = &self.{} {{\n    size += {size};\n}}",
                    field_ident(name)
                ));
            }
            Step::SharedBool { group, bit, .. } => {
                if !words_needed.contains(group) {
                    words_needed.push(*group);
                }
                parts.push(format!("if {} {{\n    size += 4;\n}}", bit_test(*group, *bit)));
            }
            _ => {}
        }
    }

    if parts.is_empty() {
        return fixed.to_string();
    }

    let mut lines: Vec<String> = words_needed
        .iter()
        .filter_map(|g| {
            let name = words.get(g.0 as usize)?;
            Some(format!("let {} = self.{}();", word(*g), compute_fn(name)))
        })
        .collect();
    lines.push(format!("let mut size = {fixed};"));
    lines.extend(parts);
    lines.push("size".to_string());
    lines.join("\n")
}

/// Statements of `deserialize_bare`, ending in `Ok(Self { .. })`.
pub(crate) fn deserialize_body(layout: &Layout, prefix: &str) -> String {
    let mut lines = Vec::new();
    let mut idents = Vec::new();

    for step in &layout.steps {
        match step {
            Step::FlagWord { group, .. } => {
                lines.push(format!("let {} = buf.read_u32()?;", word(*group)));
            }
            Step::Field { name, kind } => {
                let ident = field_ident(name);
                lines.push(format!("let {ident} = {};", read_value(kind, prefix)));
                idents.push(ident);
            }
            Step::Optional {
                name,
                group,
                bit,
                kind,
            } => {
                let ident = field_ident(name);
                lines.push(format!(
                    "let {ident} = if {} {{\n    Some({})\n}} else {{\n    None\n}};",
                    bit_test(*group, *bit),
                    read_value(kind, prefix)
                ));
                idents.push(ident);
            }
            Step::SharedBool { name, group, bit } => {
                let ident = field_ident(name);
                lines.push(format!(
                    "let {ident} = if {} {{\n    buf.read_bool()?\n}} else {{\n    false\n}};",
                    bit_test(*group, *bit)
                ));
                idents.push(ident);
            }
            Step::Presence { name, group, bit } => {
                let ident = field_ident(name);
                lines.push(format!("let {ident} = {};", bit_test(*group, *bit)));
                idents.push(ident);
            }
        }
    }

    if idents.is_empty() {
        lines.push("Ok(Self {})".to_string());
    } else {
        lines.push(format!("Ok(Self {{ {} }})", idents.join(", ")));
    }
    lines.join("\n")
}
