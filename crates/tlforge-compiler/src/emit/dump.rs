//! Dump helpers for inspecting a compiled schema.
//!
//! Lists every constructor and method with its wire layout, then every
//! family. Stable enough for snapshot tests.

use std::fmt;

use crate::CompiledSchema;
use crate::compile::Layout;
use crate::model::Supertype;

/// Printer for a `CompiledSchema`.
pub struct SchemaDump<'a> {
    schema: &'a CompiledSchema,
}

impl<'a> SchemaDump<'a> {
    pub fn new(schema: &'a CompiledSchema) -> Self {
        Self { schema }
    }
}

pub fn dump(schema: &CompiledSchema) -> String {
    SchemaDump::new(schema).to_string()
}

impl fmt::Display for SchemaDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "constructors")?;
        for c in &self.schema.constructors {
            writeln!(f, "  {} = {}", c.descriptor, c.descriptor.supertype)?;
            write_layout(f, &c.layout)?;
        }

        writeln!(f, "functions")?;
        for m in &self.schema.methods {
            writeln!(
                f,
                "  {} -> {} ({})",
                m.descriptor, m.descriptor.result, m.call.fn_name
            )?;
            write_layout(f, &m.layout)?;
        }

        writeln!(f, "families")?;
        for family in self.schema.supertypes.values() {
            write_family(f, family)?;
        }
        Ok(())
    }
}

fn write_layout(f: &mut fmt::Formatter<'_>, layout: &Layout) -> fmt::Result {
    for step in &layout.steps {
        writeln!(f, "    {step}")?;
    }
    Ok(())
}

fn write_family(f: &mut fmt::Formatter<'_>, family: &Supertype) -> fmt::Result {
    write!(f, "  {} = {}", family.name, family.variants.join(" | "))?;
    if let Some(pattern) = &family.empty {
        write!(f, "  (empty: {})", pattern.empty)?;
    }
    if !family.inherited.is_empty() {
        let names: Vec<&str> = family.inherited.iter().map(|field| field.name.as_str()).collect();
        write!(f, "  (inherits: {})", names.join(", "))?;
    }
    writeln!(f)
}
