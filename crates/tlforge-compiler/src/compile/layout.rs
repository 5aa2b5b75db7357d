//! Wire layouts: the ordered steps that encode one constructor body.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{FieldSpec, FlagBinding, FlagGroup, FlagGroupId, Primitive, Supertype, TypeRef};

/// How a value is laid out on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum WireKind {
    Int,
    Long,
    Double,
    Float,
    Bool,
    String,
    Bytes,
    Vector(Box<WireKind>),
    /// A boxed object of `family`, dispatched on its tag.
    Object { family: String },
    /// A constructor body without its tag.
    Bare { constructor: String },
    /// A nested request bound to a generic parameter.
    Query { generic: String },
}

impl WireKind {
    /// Maps a resolved type reference to its wire shape.
    ///
    /// Raw names that are not primitives or families are bare constructors.
    pub fn of(ty: &TypeRef, families: &IndexMap<String, Supertype>) -> Self {
        match ty {
            TypeRef::Raw(name) => match Primitive::from_name(name) {
                Some(Primitive::Int) => Self::Int,
                Some(Primitive::Long) => Self::Long,
                Some(Primitive::Double) => Self::Double,
                Some(Primitive::Float) => Self::Float,
                Some(Primitive::Bool | Primitive::Literal) => Self::Bool,
                Some(Primitive::String) => Self::String,
                Some(Primitive::Bytes) => Self::Bytes,
                None if families.contains_key(name) => Self::Object {
                    family: name.clone(),
                },
                None => Self::Bare {
                    constructor: name.clone(),
                },
            },
            TypeRef::Vector(inner) => Self::Vector(Box::new(Self::of(inner, families))),
            TypeRef::Conditional { real, .. } => Self::of(real, families),
            TypeRef::FlagWord => Self::Int,
            TypeRef::Functional(generic) | TypeRef::Any(generic) => Self::Query {
                generic: generic.clone(),
            },
        }
    }

    /// Encoded size when it does not depend on the value.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Int | Self::Float | Self::Bool => Some(4),
            Self::Long | Self::Double => Some(8),
            _ => None,
        }
    }

    /// True if a bare constructor appears anywhere in this kind.
    pub fn contains_bare(&self) -> bool {
        match self {
            Self::Bare { .. } => true,
            Self::Vector(inner) => inner.contains_bare(),
            _ => false,
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Double => f.write_str("double"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("Bool"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Vector(inner) => write!(f, "Vector<{inner}>"),
            Self::Object { family } => f.write_str(family),
            Self::Bare { constructor } => write!(f, "%{constructor}"),
            Self::Query { generic } => write!(f, "!{generic}"),
        }
    }
}

/// One element of a constructor body, in declared order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Recomputed from the group's members before every encode.
    FlagWord { name: String, group: FlagGroupId },
    Field { name: String, kind: WireKind },
    Optional {
        name: String,
        group: FlagGroupId,
        bit: u8,
        kind: WireKind,
    },
    /// A `Bool` written only when another member set its bit.
    SharedBool {
        name: String,
        group: FlagGroupId,
        bit: u8,
    },
    /// The bit itself; nothing is written.
    Presence {
        name: String,
        group: FlagGroupId,
        bit: u8,
    },
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Self::FlagWord { name, .. }
            | Self::Field { name, .. }
            | Self::Optional { name, .. }
            | Self::SharedBool { name, .. }
            | Self::Presence { name, .. } => name,
        }
    }

    /// Flag word and bit this step depends on.
    pub fn condition(&self) -> Option<(FlagGroupId, u8)> {
        match self {
            Self::Optional { group, bit, .. }
            | Self::SharedBool { group, bit, .. }
            | Self::Presence { group, bit, .. } => Some((*group, *bit)),
            Self::FlagWord { .. } | Self::Field { .. } => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlagWord { name, .. } => write!(f, "{name}: #"),
            Self::Field { name, kind } => write!(f, "{name}: {kind}"),
            Self::Optional {
                name,
                group,
                bit,
                kind,
            } => write!(f, "{name}: #{}.{bit}?{kind}", group.0),
            Self::SharedBool { name, group, bit } => {
                write!(f, "{name}: #{}.{bit}?Bool (shared)", group.0)
            }
            Self::Presence { name, group, bit } => write!(f, "{name}: #{}.{bit}?true", group.0),
        }
    }
}

/// Ordered steps of one constructor or method body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub steps: Vec<Step>,
}

impl Layout {
    /// Bytes every instance takes: the tag, the flag words, and unconditional fixed-width fields.
    pub fn fixed_size(&self) -> usize {
        let body: usize = self
            .steps
            .iter()
            .map(|step| match step {
                Step::FlagWord { .. } => 4,
                Step::Field { kind, .. } => kind.fixed_size().unwrap_or(0),
                _ => 0,
            })
            .sum();
        4 + body
    }

    /// Names of the flag words, indexed by group.
    pub fn flag_words(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::FlagWord { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Steps that occupy a field of the in-memory value (everything but flag words).
    pub fn value_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|step| !matches!(step, Step::FlagWord { .. }))
    }
}

/// Derives the layout of a body from its fields and flag groups.
pub fn layout_of(
    fields: &[FieldSpec],
    flags: &[FlagGroup],
    families: &IndexMap<String, Supertype>,
) -> Layout {
    let mut next_group = 0u8;
    let steps = fields
        .iter()
        .map(|field| {
            let name = field.name.clone();
            match &field.ty {
                TypeRef::FlagWord => {
                    let group = FlagGroupId(next_group);
                    next_group += 1;
                    Step::FlagWord { name, group }
                }
                TypeRef::Conditional { group, bit, real } => {
                    let binding = flags
                        .get(group.0 as usize)
                        .and_then(|g| g.member(&field.name))
                        .map_or(FlagBinding::Optional, |m| m.binding);
                    let (group, bit) = (*group, *bit);
                    match binding {
                        FlagBinding::Presence => Step::Presence { name, group, bit },
                        FlagBinding::SharedBool => Step::SharedBool { name, group, bit },
                        FlagBinding::Optional => Step::Optional {
                            name,
                            group,
                            bit,
                            kind: WireKind::of(real, families),
                        },
                    }
                }
                ty => Step::Field {
                    name,
                    kind: WireKind::of(ty, families),
                },
            }
        })
        .collect();

    Layout { steps }
}
