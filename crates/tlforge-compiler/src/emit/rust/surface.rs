//! Top-level items: the `Object` enum, its registry, and the call traits.

use std::collections::HashSet;

use crate::compile::{CallForm, CompiledMethod};
use crate::naming::{field_ident, to_pascal_case};

use super::Emitter;
use super::codec::indent;
use super::families::{Variant, constructor_id_fn};
use super::items::return_type;
use super::naming::step_type;

impl Emitter<'_> {
    /// Every constructor and non-generic method, keyed by tag.
    pub(super) fn object_variants(&self) -> Vec<Variant> {
        let mut taken = HashSet::new();
        let mut variants = Vec::new();

        for c in &self.schema.constructors {
            let name = to_pascal_case(&c.descriptor.name);
            taken.insert(name.clone());
            variants.push(Variant {
                ty: format!("types::{name}"),
                name,
                tag: c.descriptor.tag,
            });
        }

        for m in &self.schema.methods {
            if m.call.generic.is_some() {
                continue;
            }
            let ty = format!("functions::{}", to_pascal_case(&m.descriptor.name));
            let mut name = to_pascal_case(&m.descriptor.name);
            if taken.contains(&name) {
                name.push_str("Request");
            }
            taken.insert(name.clone());
            variants.push(Variant {
                name,
                ty,
                tag: m.descriptor.tag,
            });
        }

        variants
    }

    pub(super) fn object_items(&self) -> String {
        let variants = self.object_variants();
        let doc = "/// Any constructor or request of the schema, decoded through [`registry`].\n";
        [
            self.enum_def(doc, "Object", &variants),
            format!(
                "impl Object {{\n{}\n}}",
                indent(&constructor_id_fn(&variants), 1)
            ),
            self.union_impls("Object", &variants, Some("registry().decode(buf)")),
        ]
        .join("\n\n")
    }

    pub(super) fn registry_fn(&self) -> String {
        let variants = self.object_variants();
        let entries: String = variants
            .iter()
            .map(|v| {
                format!(
                    "            ({:#010x}, wire::decode_bare::<{}, Object>),\n",
                    v.tag, v.ty
                )
            })
            .collect();

        format!(
            "/// Decoders for every tag of the schema, built on first use.
pub fn registry() -> &'static wire::Registry<wire::DecodeFn<Object>> {{
    static REGISTRY: ::std::sync::OnceLock<wire::Registry<wire::DecodeFn<Object>>> =
        ::std::sync::OnceLock::new();
    REGISTRY.get_or_init(|| {{
        let entries: [(u32, wire::DecodeFn<Object>); {count}] = [
{entries}        ];
        let mut builder = wire::RegistryBuilder::new();
        for (tag, decode) in entries {{
            // Tags were checked for uniqueness when the schema was compiled.
            let _ = builder.register(tag, decode);
        }}
        builder.build()
    }})
}}",
            count = variants.len(),
        )
    }

    pub(super) fn api_trait(&self) -> String {
        let fns: Vec<String> = self
            .schema
            .methods
            .iter()
            .map(|m| call_fn(m, CallForm::Async))
            .collect();
        format!(
            "/// Every call of the schema, submitted through a [`wire::Executor`].\npub trait Api: wire::Executor {{\n{}\n}}\n\nimpl<E: wire::Executor> Api for E {{}}",
            indent(&fns.join("\n\n"), 1)
        )
    }

    pub(super) fn sync_api_trait(&self) -> String {
        let fns: Vec<String> = self
            .schema
            .methods
            .iter()
            .map(|m| call_fn(m, CallForm::Blocking))
            .collect();
        format!(
            "/// Blocking form of every call, submitted through a [`wire::SyncExecutor`].\npub trait SyncApi: wire::SyncExecutor {{\n{}\n}}\n\nimpl<E: wire::SyncExecutor> SyncApi for E {{}}",
            indent(&fns.join("\n\n"), 1)
        )
    }
}

/// One call function. Both forms take the same parameters and build the same request.
fn call_fn(m: &CompiledMethod, form: CallForm) -> String {
    let call = &m.call;
    let generic = call.generic.as_deref().unwrap_or_default();
    let params: Vec<(String, String)> = m
        .layout
        .value_steps()
        .filter_map(|step| Some((field_ident(step.name()), step_type(step, "")?)))
        .collect();

    let signature: String = params
        .iter()
        .map(|(ident, ty)| format!(", {ident}: {ty}"))
        .collect();
    let fields = params
        .iter()
        .map(|(ident, _)| ident.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let request = if fields.is_empty() {
        format!("functions::{} {{}}", to_pascal_case(&m.descriptor.name))
    } else {
        format!(
            "functions::{} {{ {fields} }}",
            to_pascal_case(&m.descriptor.name)
        )
    };
    let result = format!(
        "::std::result::Result<{}, wire::RpcError>",
        return_type(&call.response, generic, "")
    );
    let name = call.fn_name_for(form);
    let doc = format!("/// `{}`", m.descriptor);

    match (form, call.generic.is_some()) {
        (CallForm::Async, false) => format!(
            "{doc}\nfn {name}(&self{signature}) -> impl ::std::future::Future<Output = {result}> + Send {{\n    self.submit({request})\n}}"
        ),
        (CallForm::Async, true) => format!(
            "{doc}\nfn {name}<{generic}>(&self{signature}) -> impl ::std::future::Future<Output = {result}> + Send\nwhere\n    {generic}: wire::RemoteCall + Send + 'static,\n    {generic}::Return: Send,\n{{\n    self.submit({request})\n}}"
        ),
        (CallForm::Blocking, false) => format!(
            "{doc}\nfn {name}(&self{signature}) -> {result} {{\n    self.submit_sync({request})\n}}"
        ),
        (CallForm::Blocking, true) => format!(
            "{doc}\nfn {name}<{generic}: wire::RemoteCall>(&self{signature}) -> {result} {{\n    self.submit_sync({request})\n}}"
        ),
    }
}
