//! Turns a resolved schema into layouts, call signatures, and a populated registry.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tlforge_wire::{DecodeError, Registry, RegistryBuilder, RegistryError};

use super::layout::{Layout, layout_of};
use super::rpc::{CallSignature, call_signature};
use crate::model::{MethodDescriptor, Schema, Supertype, TypeDescriptor};
use crate::{Error, Result};

/// What a registered tag decodes to: an index into the compiled constructors or methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Entry {
    Type(usize),
    Method(usize),
}

#[derive(Clone, Debug, Serialize)]
pub struct CompiledConstructor {
    pub descriptor: TypeDescriptor,
    pub layout: Layout,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompiledMethod {
    pub descriptor: MethodDescriptor,
    pub layout: Layout,
    pub call: CallSignature,
}

/// Everything the emitters and the runtime need, immutable once built.
#[derive(Debug, Serialize)]
pub struct CompiledSchema {
    pub constructors: Vec<CompiledConstructor>,
    pub methods: Vec<CompiledMethod>,
    pub supertypes: IndexMap<String, Supertype>,
    #[serde(skip)]
    registry: Registry<Entry>,
    #[serde(skip)]
    by_name: HashMap<String, Entry>,
}

impl CompiledSchema {
    /// Tag table over constructors and methods.
    pub fn registry(&self) -> &Registry<Entry> {
        &self.registry
    }

    pub fn resolve(&self, tag: u32) -> std::result::Result<Entry, DecodeError> {
        self.registry.resolve(tag).copied()
    }

    /// Looks up a constructor or method by its schema name.
    pub fn entry(&self, name: &str) -> Option<Entry> {
        self.by_name.get(name).copied()
    }

    pub fn constructor(&self, name: &str) -> Option<&CompiledConstructor> {
        match self.entry(name)? {
            Entry::Type(i) => self.constructors.get(i),
            Entry::Method(_) => None,
        }
    }

    pub fn method(&self, name: &str) -> Option<&CompiledMethod> {
        match self.entry(name)? {
            Entry::Method(i) => self.methods.get(i),
            Entry::Type(_) => None,
        }
    }

    pub fn supertype(&self, name: &str) -> Option<&Supertype> {
        self.supertypes.get(name)
    }

    /// Tag and layout of an entry.
    pub fn layout(&self, entry: Entry) -> Option<(u32, &Layout)> {
        match entry {
            Entry::Type(i) => self
                .constructors
                .get(i)
                .map(|c| (c.descriptor.tag, &c.layout)),
            Entry::Method(i) => self.methods.get(i).map(|m| (m.descriptor.tag, &m.layout)),
        }
    }

    /// Schema name of an entry.
    pub fn name(&self, entry: Entry) -> Option<&str> {
        match entry {
            Entry::Type(i) => self.constructors.get(i).map(|c| c.descriptor.name.as_str()),
            Entry::Method(i) => self.methods.get(i).map(|m| m.descriptor.name.as_str()),
        }
    }

    /// True if `tag` names a constructor of `family`.
    pub fn is_member(&self, family: &str, tag: u32) -> bool {
        matches!(
            self.resolve(tag),
            Ok(Entry::Type(i)) if self.constructors[i].descriptor.supertype == family
        )
    }
}

/// Compiles every descriptor and registers every tag.
///
/// Constructors and methods share one tag space; a reused tag fails with
/// [`Error::DuplicateTag`] before anything can be decoded.
pub fn compile_schema(schema: Schema) -> Result<CompiledSchema> {
    let Schema {
        types,
        methods,
        supertypes,
    } = schema;

    let mut builder = RegistryBuilder::new();
    let mut owners: HashMap<u32, String> = HashMap::new();
    let mut by_name = HashMap::new();

    let mut register =
        |tag: u32, name: &str, line: usize, span: &std::ops::Range<usize>, entry: Entry| {
            builder.register(tag, entry).map_err(|RegistryError::DuplicateTag { tag }| {
                Error::DuplicateTag {
                    tag,
                    first: owners.get(&tag).cloned().unwrap_or_default(),
                    second: name.to_string(),
                    line,
                    span: span.clone(),
                }
            })?;
            owners.insert(tag, name.to_string());
            by_name.insert(name.to_string(), entry);
            Ok::<_, Error>(())
        };

    let mut constructors = Vec::with_capacity(types.len());
    for (i, descriptor) in types.into_iter().enumerate() {
        register(
            descriptor.tag,
            &descriptor.name,
            descriptor.line,
            &descriptor.span,
            Entry::Type(i),
        )?;
        let layout = layout_of(&descriptor.fields, &descriptor.flags, &supertypes);
        tracing::trace!(
            constructor = %descriptor,
            steps = layout.steps.len(),
            "compiled constructor"
        );
        constructors.push(CompiledConstructor { descriptor, layout });
    }

    let mut compiled_methods = Vec::with_capacity(methods.len());
    for (i, descriptor) in methods.into_iter().enumerate() {
        register(
            descriptor.tag,
            &descriptor.name,
            descriptor.line,
            &descriptor.span,
            Entry::Method(i),
        )?;
        let layout = layout_of(&descriptor.parameters, &descriptor.flags, &supertypes);
        let call = call_signature(&descriptor, &supertypes);
        tracing::trace!(method = %descriptor, function = %call.fn_name, "compiled method");
        compiled_methods.push(CompiledMethod {
            descriptor,
            layout,
            call,
        });
    }

    let registry = builder.build();
    tracing::debug!(
        constructors = constructors.len(),
        methods = compiled_methods.len(),
        families = supertypes.len(),
        "schema compiled"
    );

    Ok(CompiledSchema {
        constructors,
        methods: compiled_methods,
        supertypes,
        registry,
        by_name,
    })
}
