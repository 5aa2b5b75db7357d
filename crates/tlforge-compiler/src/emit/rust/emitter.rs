//! Core emitter struct and main emit logic.

use std::collections::HashMap;

use crate::CompiledSchema;

use super::Config;
use super::codec::indent;
use super::naming::variant_names;

const HEADER: &str = "// Generated by tlforge from a TL schema. Do not edit.\n";

/// Rust emitter over a compiled schema.
///
/// Output is one file: `types` (constructor structs), `enums` (one enum per
/// family), `functions` (request structs), then the `Object` enum with its
/// registry and the call traits.
pub struct Emitter<'a> {
    pub(super) schema: &'a CompiledSchema,
    pub(super) config: Config,
    /// Constructor name -> variant name inside its family enum
    pub(super) variants: HashMap<String, String>,
    /// Output buffer
    pub(super) output: String,
}

impl<'a> Emitter<'a> {
    pub fn new(schema: &'a CompiledSchema, config: Config) -> Self {
        let variants = schema.supertypes.values().flat_map(variant_names).collect();
        Self {
            schema,
            config,
            variants,
            output: String::new(),
        }
    }

    pub fn emit(mut self) -> String {
        self.output.push_str(HEADER);
        self.output.push_str(&format!(
            "\n#[allow(unused_imports)]\nuse {} as wire;\n",
            self.config.wire_crate
        ));

        let types: Vec<String> = self
            .schema
            .constructors
            .iter()
            .map(|c| self.constructor_items(c))
            .collect();
        self.push_module("types", &types);

        let enums: Vec<String> = self
            .schema
            .supertypes
            .values()
            .map(|family| self.family_items(family))
            .collect();
        self.push_module("enums", &enums);

        let functions: Vec<String> = self
            .schema
            .methods
            .iter()
            .map(|m| self.method_items(m))
            .collect();
        self.push_module("functions", &functions);

        let tags = self.tags_const();
        self.push_item(&tags);

        if self.config.emit_registry {
            let object = self.object_items();
            self.push_item(&object);
            let registry = self.registry_fn();
            self.push_item(&registry);
        }

        if self.config.emit_api && !self.schema.methods.is_empty() {
            if self.config.indirection.is_send() {
                let api = self.api_trait();
                self.push_item(&api);
            }
            let sync_api = self.sync_api_trait();
            self.push_item(&sync_api);
        }

        tracing::debug!(bytes = self.output.len(), "emitted rust bindings");

        self.output.truncate(self.output.trim_end().len());
        self.output.push('\n');
        self.output
    }

    fn push_item(&mut self, item: &str) {
        self.output.push('\n');
        self.output.push_str(item);
        self.output.push('\n');
    }

    fn push_module(&mut self, name: &str, items: &[String]) {
        self.output.push_str(&format!(
            "\npub mod {name} {{\n    #![allow(unused_imports, unused_variables, clippy::all)]\n\n    use {} as wire;\n",
            self.config.wire_crate
        ));
        for item in items {
            self.output.push('\n');
            self.output.push_str(&indent(item, 1));
            self.output.push('\n');
        }
        self.output.push_str("}\n");
    }

    pub(super) fn derives(&self) -> String {
        self.config.derives()
    }

    /// Every constructor and method tag, generic methods included.
    fn tags_const(&self) -> String {
        let tags: String = self
            .schema
            .constructors
            .iter()
            .map(|c| c.descriptor.tag)
            .chain(self.schema.methods.iter().map(|m| m.descriptor.tag))
            .map(|tag| format!("    {tag:#010x},\n"))
            .collect();
        format!(
            "/// Every constructor and method tag of the schema.\npub const TAGS: &[u32] = &[\n{tags}];"
        )
    }

    /// Variant of `constructor` in its family enum.
    pub(super) fn variant<'b>(&'b self, constructor: &'b str) -> &'b str {
        self.variants
            .get(constructor)
            .map_or(constructor, String::as_str)
    }
}
