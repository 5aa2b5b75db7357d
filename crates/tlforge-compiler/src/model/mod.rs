//! Schema type model shared by the resolver, the layout compiler, and the emitters.
//!
//! Built once per compilation and immutable afterwards.

use std::fmt;
use std::ops::Range;

use indexmap::IndexMap;
use serde::Serialize;


/// Ordinal of a flag word among the `#` parameters of one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FlagGroupId(pub u8);

/// A parameter or result type as written in the schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeRef {
    /// Primitive, boxed family name, or bare (lowercase) constructor name.
    Raw(String),
    Vector(Box<TypeRef>),
    /// Present iff `bit` of flag word `group` is set.
    Conditional {
        group: FlagGroupId,
        bit: u8,
        real: Box<TypeRef>,
    },
    /// `#`: a 32-bit word of presence bits.
    FlagWord,
    /// `!X`: the request payload of a generic method.
    Functional(String),
    /// `X`: a generic placeholder bound at the call site.
    Any(String),
}

impl TypeRef {
    pub fn raw(name: impl Into<String>) -> Self {
        Self::Raw(name.into())
    }

    pub fn vector(element: TypeRef) -> Self {
        Self::Vector(Box::new(element))
    }

    /// The type carried in memory, with any condition stripped.
    pub fn value_type(&self) -> &TypeRef {
        match self {
            Self::Conditional { real, .. } => real,
            other => other,
        }
    }

    pub fn is_flag_word(&self) -> bool {
        matches!(self, Self::FlagWord)
    }

    /// `true`/`false`: a conditional that carries no payload.
    pub fn is_presence_literal(&self) -> bool {
        matches!(self, Self::Raw(name) if Primitive::from_name(name) == Some(Primitive::Literal))
    }

    /// Visits this reference and every nested one.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a TypeRef)) {
        f(self);
        match self {
            Self::Vector(inner) => inner.walk(f),
            Self::Conditional { real, .. } => real.walk(f),
            Self::Raw(_) | Self::FlagWord | Self::Functional(_) | Self::Any(_) => {}
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(name) | Self::Any(name) => f.write_str(name),
            Self::Vector(inner) => write!(f, "Vector<{inner}>"),
            Self::Conditional { group, bit, real } => write!(f, "#{}.{bit}?{real}", group.0),
            Self::FlagWord => f.write_str("#"),
            Self::Functional(generic) => write!(f, "!{generic}"),
        }
    }
}

/// Built-in scalar types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Int,
    Long,
    Double,
    Float,
    Bool,
    String,
    Bytes,
    /// `true` / `false` in a conditional.
    Literal,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int" => Self::Int,
            "long" => Self::Long,
            "double" => Self::Double,
            "float" => Self::Float,
            "Bool" => Self::Bool,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            "true" | "false" => Self::Literal,
            _ => return None,
        })
    }
}

/// A declared parameter of a constructor or method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeRef,
    /// Carried with identical name and type by every variant of an abstract family.
    pub inherited: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            inherited: false,
        }
    }
}

/// How a conditional field relates to its bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagBinding {
    /// Payload present iff the bit is set.
    Optional,
    /// No payload; the value is the bit.
    Presence,
    /// A `Bool` on a bit owned by another member: written only when the bit is set.
    SharedBool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlagMember {
    pub field: String,
    pub bit: u8,
    pub binding: FlagBinding,
    /// Another member of the same group uses this bit.
    pub shared: bool,
}

/// One flag word and the conditional fields it governs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlagGroup {
    pub id: FlagGroupId,
    pub field: String,
    pub members: Vec<FlagMember>,
}

impl FlagGroup {
    pub fn member(&self, field: &str) -> Option<&FlagMember> {
        self.members.iter().find(|m| m.field == field)
    }
}

/// A concrete constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub tag: u32,
    pub name: String,
    pub fields: Vec<FieldSpec>,
    /// Family this constructor belongs to.
    pub supertype: String,
    pub flags: Vec<FlagGroup>,
    pub line: usize,
    #[serde(skip)]
    pub span: Range<usize>,
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.name, self.tag)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    pub tag: u32,
    pub name: String,
    pub generics: Vec<String>,
    pub parameters: Vec<FieldSpec>,
    pub result: TypeRef,
    pub flags: Vec<FlagGroup>,
    pub line: usize,
    #[serde(skip)]
    pub span: Range<usize>,
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.name, self.tag)
    }
}

/// The two-variant shape where one variant stands for "nothing".
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmptyPattern {
    pub empty: String,
    pub non_empty: String,
}

/// A family of constructors sharing one result type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Supertype {
    pub name: String,
    /// Constructor names in declaration order.
    pub variants: Vec<String>,
    pub inherited: Vec<FieldSpec>,
    pub empty: Option<EmptyPattern>,
}

impl Supertype {
    pub fn is_abstract(&self) -> bool {
        self.variants.len() >= 2
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub types: Vec<TypeDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub supertypes: IndexMap<String, Supertype>,
}

/// Segment after the last `.` of a possibly namespaced name.
pub fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
