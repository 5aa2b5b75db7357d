//! Family enums, plus the enum plumbing shared with `Object`.

use crate::model::Supertype;
use crate::naming::{field_ident, to_pascal_case};

use super::Emitter;
use super::codec::indent;
use super::naming::step_type;

const IN_MODULE: &str = "super::";

/// One variant of a generated enum.
pub(super) struct Variant {
    pub name: String,
    /// Path of the wrapped struct.
    pub ty: String,
    pub tag: u32,
}

impl Emitter<'_> {
    pub(super) fn family_items(&self, family: &Supertype) -> String {
        let name = to_pascal_case(&family.name);
        let variants: Vec<Variant> = family
            .variants
            .iter()
            .filter_map(|ctor| {
                let c = self.schema.constructor(ctor)?;
                Some(Variant {
                    name: self.variant(ctor).to_string(),
                    ty: format!("{IN_MODULE}types::{}", to_pascal_case(ctor)),
                    tag: c.descriptor.tag,
                })
            })
            .collect();

        let mut doc = format!("/// Constructors of `{}`:\n", family.name);
        for ctor in &family.variants {
            if let Some(c) = self.schema.constructor(ctor) {
                doc.push_str(&format!("/// - `{}`\n", c.descriptor));
            }
        }

        let deserialize = format!(
            "let tag = buf.read_u32()?;\nOk(match tag {{\n{}\n    _ if super::TAGS.contains(&tag) => {{\n        return Err(wire::DecodeError::UnexpectedConstructor {{ tag }});\n    }}\n    _ => return Err(wire::DecodeError::UnknownConstructor {{ tag }}),\n}})",
            variants
                .iter()
                .map(|v| format!(
                    "    {:#010x} => <{} as wire::Bare>::deserialize_bare(buf)?.into(),",
                    v.tag, v.ty
                ))
                .collect::<Vec<_>>()
                .join("\n")
        );

        let mut inherent = vec![constructor_id_fn(&variants)];
        inherent.extend(self.empty_helpers(family));
        inherent.extend(self.inherited_accessors(family, &variants));

        [
            self.enum_def(&doc, &name, &variants),
            format!(
                "impl {name} {{\n{}\n}}",
                indent(&inherent.join("\n\n"), 1)
            ),
            self.union_impls(&name, &variants, Some(&deserialize)),
        ]
        .join("\n\n")
    }

    pub(super) fn enum_def(&self, doc: &str, name: &str, variants: &[Variant]) -> String {
        let indirection = self.config.indirection;
        let body: String = variants
            .iter()
            .map(|v| format!("    {}({}),\n", v.name, indirection.wrap(&v.ty)))
            .collect();
        format!("{doc}{}pub enum {name} {{\n{body}}}", self.derives())
    }

    /// `Serializable`, optionally `Deserializable`, `From` for each variant, and `Display`.
    pub(super) fn union_impls(
        &self,
        name: &str,
        variants: &[Variant],
        deserialize: Option<&str>,
    ) -> String {
        let mut impls = vec![format!(
            "impl wire::Serializable for {name} {{\n    fn serialize(&self, buf: &mut wire::Serializer<'_>) -> ::std::io::Result<()> {{\n{}\n    }}\n\n    fn serialized_size(&self) -> usize {{\n{}\n    }}\n}}",
            indent(&delegate(variants, "wire::Serializable::serialize(&**v, buf)"), 2),
            indent(&delegate(variants, "wire::Serializable::serialized_size(&**v)"), 2),
        )];

        if let Some(body) = deserialize {
            impls.push(format!(
                "impl wire::Deserializable for {name} {{\n    fn deserialize(buf: &mut wire::Deserializer<'_>) -> ::std::result::Result<Self, wire::DecodeError> {{\n{}\n    }}\n}}",
                indent(body, 2)
            ));
        }

        let path = self.config.indirection.path();
        for v in variants {
            impls.push(format!(
                "impl ::std::convert::From<{ty}> for {name} {{\n    fn from(v: {ty}) -> Self {{\n        Self::{variant}({path}::new(v))\n    }}\n}}",
                ty = v.ty,
                variant = v.name,
            ));
        }

        impls.push(format!(
            "impl ::std::fmt::Display for {name} {{\n    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {{\n{}\n    }}\n}}",
            indent(&delegate(variants, "::std::fmt::Display::fmt(&**v, f)"), 2)
        ));

        impls.join("\n\n")
    }

    fn empty_helpers(&self, family: &Supertype) -> Vec<String> {
        let Some(pattern) = &family.empty else {
            return Vec::new();
        };
        let empty = self.variant(&pattern.empty);
        let non_empty = self.variant(&pattern.non_empty);
        let ty = format!("{IN_MODULE}types::{}", to_pascal_case(&pattern.non_empty));

        vec![
            format!("pub fn is_empty(&self) -> bool {{\n    matches!(self, Self::{empty}(_))\n}}"),
            "pub fn is_not_empty(&self) -> bool {\n    !self.is_empty()\n}".to_string(),
            format!(
                "pub fn as_non_empty(&self) -> ::std::option::Option<&{ty}> {{\n    match self {{\n        Self::{non_empty}(v) => Some(v),\n        _ => None,\n    }}\n}}"
            ),
        ]
    }

    /// One accessor per field every variant carries.
    fn inherited_accessors(&self, family: &Supertype, variants: &[Variant]) -> Vec<String> {
        let Some(first) = family
            .variants
            .first()
            .and_then(|ctor| self.schema.constructor(ctor))
        else {
            return Vec::new();
        };

        family
            .inherited
            .iter()
            .filter_map(|field| {
                let step = first.layout.steps.iter().find(|s| s.name() == field.name)?;
                let ty = step_type(step, IN_MODULE)?;
                let ident = field_ident(&field.name);
                let arms: String = variants
                    .iter()
                    .map(|v| format!("        Self::{}(v) => &v.{ident},\n", v.name))
                    .collect();
                Some(format!(
                    "pub fn {ident}(&self) -> &{ty} {{\n    match self {{\n{arms}    }}\n}}"
                ))
            })
            .collect()
    }
}

/// `match` over every variant, evaluating `expr` with `v` bound to the wrapper.
pub(super) fn delegate(variants: &[Variant], expr: &str) -> String {
    if variants.is_empty() {
        return "match *self {}".to_string();
    }
    let arms: String = variants
        .iter()
        .map(|v| format!("    Self::{}(v) => {expr},\n", v.name))
        .collect();
    format!("match self {{\n{arms}}}")
}

pub(super) fn constructor_id_fn(variants: &[Variant]) -> String {
    let body = if variants.is_empty() {
        "match *self {}".to_string()
    } else {
        let arms: String = variants
            .iter()
            .map(|v| format!("    Self::{}(_) => {:#010x},\n", v.name, v.tag))
            .collect();
        format!("match self {{\n{arms}}}")
    };
    format!(
        "/// Tag of the held constructor.\npub fn constructor_id(&self) -> u32 {{\n{}\n}}",
        indent(&body, 1)
    )
}
