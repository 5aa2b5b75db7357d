//! Reference resolution and family construction.
//!
//! Runs in two passes so that entries may refer to types declared later in
//! the same schema: the first pass collects every family and constructor
//! name, the second validates every raw reference against them.

use std::collections::HashSet;
use std::ops::Range;

use indexmap::IndexMap;

use super::flags::flag_groups;
use crate::model::{
    EmptyPattern, FieldSpec, MethodDescriptor, Primitive, Schema, Supertype, TypeDescriptor,
    TypeRef, short_name,
};
use crate::parser::{Category, Definition};
use crate::{Error, Result};

/// Names visible to every entry of the schema.
struct Names {
    families: IndexMap<String, Vec<String>>,
    constructors: HashSet<String>,
}

impl Names {
    fn is_known(&self, name: &str) -> bool {
        Primitive::from_name(name).is_some()
            || self.families.contains_key(name)
            || self.constructors.contains(name)
    }

    /// First raw name in `ty` that resolves to nothing.
    fn first_unknown<'a>(&self, ty: &'a TypeRef) -> Option<&'a str> {
        let mut unknown = None;
        ty.walk(&mut |t| {
            if unknown.is_some() {
                return;
            }
            if let TypeRef::Raw(name) = t
                && !self.is_known(name)
            {
                unknown = Some(name.as_str());
            }
        });
        unknown
    }
}

/// Resolves parsed entries into descriptors and families.
pub fn resolve(definitions: Vec<Definition>) -> Result<Schema> {
    let (type_defs, method_defs): (Vec<_>, Vec<_>) = definitions
        .into_iter()
        .partition(|d| d.category == Category::Type);

    let names = collect_names(&type_defs, &method_defs)?;

    for def in type_defs.iter().chain(&method_defs) {
        for param in &def.params {
            check_known(&names, &param.ty, def.line, &param.ty_span)?;
        }
    }
    for def in &method_defs {
        check_known(&names, &def.result, def.line, &def.result_span)?;
    }

    let mut types: Vec<TypeDescriptor> = type_defs
        .into_iter()
        .map(|def| {
            let fields = fields_of(&def);
            TypeDescriptor {
                tag: def.tag,
                flags: flag_groups(&fields),
                fields,
                supertype: family_of(&def).unwrap_or_default().to_string(),
                name: def.name,
                line: def.line,
                span: def.span,
            }
        })
        .collect();

    let methods: Vec<MethodDescriptor> = method_defs
        .into_iter()
        .map(|def| {
            let parameters = fields_of(&def);
            MethodDescriptor {
                tag: def.tag,
                generics: def.generics.into_iter().map(|g| g.name).collect(),
                flags: flag_groups(&parameters),
                parameters,
                name: def.name,
                result: def.result,
                line: def.line,
                span: def.span,
            }
        })
        .collect();

    let mut supertypes = IndexMap::new();
    for (family, variants) in names.families {
        let supertype = build_supertype(family.clone(), variants, &types);
        supertypes.insert(family, supertype);
    }
    mark_inherited(&mut types, &supertypes);

    tracing::debug!(
        types = types.len(),
        methods = methods.len(),
        families = supertypes.len(),
        "schema resolved"
    );

    Ok(Schema {
        types,
        methods,
        supertypes,
    })
}

fn collect_names(type_defs: &[Definition], method_defs: &[Definition]) -> Result<Names> {
    let mut families: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut constructors = HashSet::new();

    for def in type_defs {
        if !def.generics.is_empty() {
            return Err(syntax(def, "generic parameters are only allowed on methods"));
        }
        let Some(family) = family_of(def) else {
            return Err(Error::SchemaSyntax {
                line: def.line,
                message: format!(
                    "constructor result must be a type name, found `{}`",
                    def.result
                ),
                span: def.result_span.clone(),
            });
        };
        if !constructors.insert(def.name.clone()) {
            return Err(syntax(def, format!("duplicate constructor `{}`", def.name)));
        }
        families
            .entry(family.to_string())
            .or_default()
            .push(def.name.clone());
    }

    let mut methods = HashSet::new();
    for def in method_defs {
        if !methods.insert(def.name.as_str()) {
            return Err(syntax(def, format!("duplicate method `{}`", def.name)));
        }
    }

    Ok(Names {
        families,
        constructors,
    })
}

/// The family a constructor belongs to: its result, when that is a type name.
fn family_of(def: &Definition) -> Option<&str> {
    match &def.result {
        TypeRef::Raw(name) if Primitive::from_name(name).is_none() => Some(name),
        _ => None,
    }
}

fn check_known(names: &Names, ty: &TypeRef, line: usize, span: &Range<usize>) -> Result<()> {
    match names.first_unknown(ty) {
        Some(name) => Err(Error::UnknownTypeReference {
            line,
            name: name.to_string(),
            span: span.clone(),
        }),
        None => Ok(()),
    }
}

fn fields_of(def: &Definition) -> Vec<FieldSpec> {
    def.params
        .iter()
        .map(|p| FieldSpec::new(p.name.clone(), p.ty.clone()))
        .collect()
}

fn build_supertype(name: String, variants: Vec<String>, types: &[TypeDescriptor]) -> Supertype {
    let members: Vec<&TypeDescriptor> = variants
        .iter()
        .filter_map(|v| types.iter().find(|t| &t.name == v))
        .collect();

    let inherited = if members.len() >= 2 {
        common_fields(&members)
    } else {
        Vec::new()
    };

    Supertype {
        empty: empty_pattern(&variants),
        name,
        variants,
        inherited,
    }
}

/// Fields every member carries with the same name and type, in the order of the first member.
fn common_fields(members: &[&TypeDescriptor]) -> Vec<FieldSpec> {
    let Some((first, rest)) = members.split_first() else {
        return Vec::new();
    };

    first
        .fields
        .iter()
        .filter(|f| !f.ty.is_flag_word())
        .filter(|f| {
            rest.iter()
                .all(|m| m.fields.iter().any(|g| g.name == f.name && g.ty == f.ty))
        })
        .map(|f| FieldSpec {
            inherited: true,
            ..f.clone()
        })
        .collect()
}

/// Exactly two variants, exactly one of them named `...Empty`.
fn empty_pattern(variants: &[String]) -> Option<EmptyPattern> {
    let [a, b] = variants else {
        return None;
    };
    let is_empty = |name: &str| short_name(name).to_ascii_lowercase().ends_with("empty");

    match (is_empty(a.as_str()), is_empty(b.as_str())) {
        (true, false) => Some(EmptyPattern {
            empty: a.clone(),
            non_empty: b.clone(),
        }),
        (false, true) => Some(EmptyPattern {
            empty: b.clone(),
            non_empty: a.clone(),
        }),
        _ => None,
    }
}

fn mark_inherited(types: &mut [TypeDescriptor], supertypes: &IndexMap<String, Supertype>) {
    for ty in types {
        let Some(family) = supertypes.get(&ty.supertype) else {
            continue;
        };
        for field in &mut ty.fields {
            field.inherited = family.inherited.iter().any(|f| f.name == field.name);
        }
    }
}

fn syntax(def: &Definition, message: impl Into<String>) -> Error {
    Error::SchemaSyntax {
        line: def.line,
        message: message.into(),
        span: def.span.clone(),
    }
}
