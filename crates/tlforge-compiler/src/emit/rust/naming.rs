//! Rust names and types for schema entities.

use std::collections::HashMap;

use crate::compile::{Step, WireKind};
use crate::model::{Supertype, short_name};
use crate::naming::to_pascal_case;

/// Rust type of a wire kind. `prefix` is how the generated module tree is reached.
///
/// Std types are spelled out in full: schema constructors may be named `Option` or `String`.
pub(crate) fn rust_type(kind: &WireKind, prefix: &str) -> String {
    match kind {
        WireKind::Int => "i32".to_string(),
        WireKind::Long => "i64".to_string(),
        WireKind::Double => "f64".to_string(),
        WireKind::Float => "f32".to_string(),
        WireKind::Bool => "bool".to_string(),
        WireKind::String => "::std::string::String".to_string(),
        WireKind::Bytes => "::std::vec::Vec<u8>".to_string(),
        WireKind::Vector(inner) => format!("::std::vec::Vec<{}>", rust_type(inner, prefix)),
        WireKind::Object { family } => format!("{prefix}enums::{}", to_pascal_case(family)),
        WireKind::Bare { constructor } => format!("{prefix}types::{}", to_pascal_case(constructor)),
        WireKind::Query { generic } => generic.clone(),
    }
}

/// Type of the struct field a step occupies; `None` for flag words.
pub(crate) fn step_type(step: &Step, prefix: &str) -> Option<String> {
    match step {
        Step::FlagWord { .. } => None,
        Step::Field { kind, .. } => Some(rust_type(kind, prefix)),
        Step::Optional { kind, .. } => Some(format!(
            "::std::option::Option<{}>",
            rust_type(kind, prefix)
        )),
        Step::SharedBool { .. } | Step::Presence { .. } => Some("bool".to_string()),
    }
}

/// Variant names of a family enum, keyed by constructor name.
///
/// `inputPeerEmpty` in `InputPeer` becomes `Empty`; names that would
/// collide fall back to the full constructor name.
pub(crate) fn variant_names(family: &Supertype) -> HashMap<String, String> {
    let family_short = to_pascal_case(short_name(&family.name));
    let stripped: Vec<String> = family
        .variants
        .iter()
        .map(|ctor| {
            let short = to_pascal_case(short_name(ctor));
            match short.strip_prefix(&family_short) {
                Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => {
                    rest.to_string()
                }
                _ => short,
            }
        })
        .collect();

    family
        .variants
        .iter()
        .zip(&stripped)
        .map(|(ctor, name)| {
            let collides = stripped.iter().filter(|other| *other == name).count() > 1;
            let name = if collides {
                to_pascal_case(ctor)
            } else {
                name.clone()
            };
            (ctor.clone(), name)
        })
        .collect()
}
