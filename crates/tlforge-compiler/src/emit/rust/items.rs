//! Constructor and request structs with their codec impls.

use crate::compile::{
    CompiledConstructor, CompiledMethod, Layout, ResponseDecode, Step, WireKind,
};
use crate::naming::{field_ident, to_pascal_case};

use super::Emitter;
use super::codec::{
    compute_body, compute_fn, deserialize_body, indent, read_value, serialize_body, size_body,
    sync_body,
};
use super::naming::{rust_type, step_type};

/// Path prefix from inside a generated module.
const IN_MODULE: &str = "super::";

const SERIALIZER: &str = "buf: &mut wire::Serializer<'_>";
const DESERIALIZER: &str = "buf: &mut wire::Deserializer<'_>";

impl Emitter<'_> {
    pub(super) fn constructor_items(&self, c: &CompiledConstructor) -> String {
        let name = to_pascal_case(&c.descriptor.name);
        let doc = format!("/// `{}`", c.descriptor);
        let mut items = vec![
            self.struct_def(&doc, &name, "", &c.layout),
            flag_impl(&name, "", "", &c.layout),
            identifiable_impl(&name, "", c.descriptor.tag),
            bare_impls(&name, &c.layout),
            display_impl(&name, "", &c.descriptor.to_string()),
        ];
        items.retain(|item| !item.is_empty());
        items.join("\n\n")
    }

    pub(super) fn method_items(&self, m: &CompiledMethod) -> String {
        let name = to_pascal_case(&m.descriptor.name);
        let doc = format!("/// `{}` returns `{}`", m.descriptor, m.descriptor.result);
        let mut items = Vec::new();

        match &m.call.generic {
            Some(generic) => {
                let params = format!("<{generic}>");
                let bound = format!("<{generic}: wire::RemoteCall>");
                items.push(self.struct_def(&doc, &name, &params, &m.layout));
                items.push(flag_impl(&name, &params, &params, &m.layout));
                items.push(identifiable_impl(&name, &params, m.descriptor.tag));
                items.push(boxed_serializable_impl(&name, &params, &bound, &m.layout));
                items.push(remote_call_impl(&name, &params, &bound, &m.call.response, generic));
                items.push(display_impl(&name, &params, &m.descriptor.to_string()));
            }
            None => {
                items.push(self.struct_def(&doc, &name, "", &m.layout));
                items.push(flag_impl(&name, "", "", &m.layout));
                items.push(identifiable_impl(&name, "", m.descriptor.tag));
                items.push(bare_impls(&name, &m.layout));
                items.push(remote_call_impl(&name, "", "", &m.call.response, ""));
                items.push(display_impl(&name, "", &m.descriptor.to_string()));
            }
        }

        items.retain(|item| !item.is_empty());
        items.join("\n\n")
    }

    fn struct_def(&self, doc: &str, name: &str, params: &str, layout: &Layout) -> String {
        let fields: Vec<String> = layout
            .value_steps()
            .filter_map(|step| {
                let ty = step_type(step, IN_MODULE)?;
                Some(format!("    pub {}: {ty},\n", field_ident(step.name())))
            })
            .collect();

        let body = if fields.is_empty() {
            "{}".to_string()
        } else {
            format!("{{\n{}}}", fields.concat())
        };
        format!("{doc}\n{}pub struct {name}{params} {body}", self.derives())
    }
}

/// `compute_<word>` for every flag word of the body, plus `sync_flags`.
fn flag_impl(name: &str, impl_params: &str, type_params: &str, layout: &Layout) -> String {
    let mut methods: Vec<String> = layout
        .steps
        .iter()
        .filter_map(|step| match step {
            Step::FlagWord { name, group } => Some(format!(
                "/// Flag word `{name}` as implied by the conditional fields.\npub fn {}(&self) -> u32 {{\n{}\n}}",
                compute_fn(name),
                indent(&compute_body(layout, *group), 1)
            )),
            _ => None,
        })
        .collect();
    if let Some(body) = sync_body(layout) {
        methods.push(format!(
            "/// Sets the flag-bound booleans from the flag words, as decoding would.\npub fn sync_flags(&mut self) {{\n{}\n}}",
            indent(&body, 1)
        ));
    }

    if methods.is_empty() {
        return String::new();
    }
    format!(
        "impl{impl_params} {name}{type_params} {{\n{}\n}}",
        indent(&methods.join("\n\n"), 1)
    )
}

fn identifiable_impl(name: &str, params: &str, tag: u32) -> String {
    format!(
        "impl{params} wire::Identifiable for {name}{params} {{\n    const CONSTRUCTOR_ID: u32 = {tag:#010x};\n}}"
    )
}

/// `Bare`, plus the boxed `Serializable`/`Deserializable` derived from it.
fn bare_impls(name: &str, layout: &Layout) -> String {
    let bare = format!(
        "impl wire::Bare for {name} {{\n    fn serialize_bare(&self, {SERIALIZER}) -> ::std::io::Result<()> {{\n{}\n    }}\n\n    fn bare_size(&self) -> usize {{\n{}\n    }}\n\n    fn deserialize_bare({DESERIALIZER}) -> ::std::result::Result<Self, wire::DecodeError> {{\n{}\n    }}\n}}",
        indent(&serialize_body(layout), 2),
        indent(&size_body(layout, 0), 2),
        indent(&deserialize_body(layout, IN_MODULE), 2),
    );
    let serializable = format!(
        "impl wire::Serializable for {name} {{\n    fn serialize(&self, {SERIALIZER}) -> ::std::io::Result<()> {{\n        wire::serialize_boxed(self, buf)\n    }}\n\n    fn serialized_size(&self) -> usize {{\n        4 + wire::Bare::bare_size(self)\n    }}\n}}"
    );
    let deserializable = format!(
        "impl wire::Deserializable for {name} {{\n    fn deserialize({DESERIALIZER}) -> ::std::result::Result<Self, wire::DecodeError> {{\n        wire::deserialize_boxed(buf)\n    }}\n}}"
    );
    [bare, serializable, deserializable].join("\n\n")
}

/// Generic requests are written but never read back.
fn boxed_serializable_impl(name: &str, params: &str, bound: &str, layout: &Layout) -> String {
    let body = format!(
        "buf.write_u32(<Self as wire::Identifiable>::CONSTRUCTOR_ID)?;\n{}",
        serialize_body(layout)
    );
    format!(
        "impl{bound} wire::Serializable for {name}{params} {{\n    fn serialize(&self, {SERIALIZER}) -> ::std::io::Result<()> {{\n{}\n    }}\n\n    fn serialized_size(&self) -> usize {{\n{}\n    }}\n}}",
        indent(&body, 2),
        indent(&size_body(layout, 4), 2),
    )
}

/// Rust type a call resolves to.
pub(super) fn return_type(response: &ResponseDecode, generic: &str, prefix: &str) -> String {
    match response {
        ResponseDecode::PassThrough { .. } => format!("{generic}::Return"),
        ResponseDecode::IntVector => "::std::vec::Vec<i32>".to_string(),
        ResponseDecode::LongVector => "::std::vec::Vec<i64>".to_string(),
        ResponseDecode::StringVector => "::std::vec::Vec<::std::string::String>".to_string(),
        ResponseDecode::ObjectVector(kind) => {
            rust_type(&WireKind::Vector(Box::new(kind.clone())), prefix)
        }
        ResponseDecode::Primitive(kind) => rust_type(kind, prefix),
        ResponseDecode::Object { family } => rust_type(
            &WireKind::Object {
                family: family.clone(),
            },
            prefix,
        ),
    }
}

fn read_response_body(response: &ResponseDecode) -> String {
    match response {
        ResponseDecode::PassThrough { param } => {
            format!("wire::RemoteCall::read_response(&self.{}, buf)", field_ident(param))
        }
        ResponseDecode::IntVector => "Ok(buf.read_int_vector()?)".to_string(),
        ResponseDecode::LongVector => "Ok(buf.read_long_vector()?)".to_string(),
        ResponseDecode::StringVector => "Ok(buf.read_string_vector()?)".to_string(),
        ResponseDecode::ObjectVector(kind) => format!(
            "Ok({})",
            read_value(&WireKind::Vector(Box::new(kind.clone())), IN_MODULE)
        ),
        ResponseDecode::Primitive(kind) => format!("Ok({})", read_value(kind, IN_MODULE)),
        ResponseDecode::Object { family } => {
            format!("wire::read_object_response(buf, \"{family}\")")
        }
    }
}

fn remote_call_impl(
    name: &str,
    params: &str,
    bound: &str,
    response: &ResponseDecode,
    generic: &str,
) -> String {
    format!(
        "impl{bound} wire::RemoteCall for {name}{params} {{\n    type Return = {};\n\n    fn read_response(&self, {DESERIALIZER}) -> ::std::result::Result<Self::Return, wire::RpcError> {{\n        {}\n    }}\n}}",
        return_type(response, generic, IN_MODULE),
        read_response_body(response)
    )
}

fn display_impl(name: &str, params: &str, text: &str) -> String {
    format!(
        "impl{params} ::std::fmt::Display for {name}{params} {{\n    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {{\n        f.write_str(\"{text}\")\n    }}\n}}"
    )
}
