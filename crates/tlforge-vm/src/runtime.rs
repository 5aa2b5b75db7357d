//! Executes compiled layouts over dynamic values.
//!
//! Every operation walks the steps of the value's layout, the same order the
//! generated code follows, so a value encoded here decodes with generated
//! types and vice versa.

use std::io;
use std::sync::Arc;

use indexmap::IndexMap;
use tlforge_compiler::compile::{Layout, Step, WireKind};
use tlforge_compiler::model::{FlagGroupId, Supertype};
use tlforge_compiler::{CompiledSchema, Entry};
use tlforge_wire::{DecodeError, Deserializer, Serializer, bytes_size, missing_conditional};

use crate::error::RuntimeError;
use crate::value::{Object, Value};

/// A compiled schema ready to encode and decode [`Object`]s. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Runtime {
    schema: Arc<CompiledSchema>,
}

impl Runtime {
    pub fn new(schema: Arc<CompiledSchema>) -> Self {
        Self { schema }
    }

    /// Compiles `source` and wraps the result.
    pub fn compile(source: &str) -> Result<Self, tlforge_compiler::Error> {
        let schema = tlforge_compiler::compile(source)?;
        Ok(Self::new(Arc::new(schema)))
    }

    pub fn schema(&self) -> &CompiledSchema {
        &self.schema
    }

    /// Builds an instance of the constructor or method `name`.
    ///
    /// Omitted `true` and `Bool` conditionals default to `false`, omitted
    /// optionals stay absent, and every other field is required. The result
    /// is [normalized](Self::normalize).
    pub fn instantiate<K: Into<String>>(
        &self,
        name: &str,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Object, RuntimeError> {
        let entry = self
            .schema
            .entry(name)
            .ok_or_else(|| RuntimeError::UnknownEntry {
                name: name.to_string(),
            })?;
        let Some((tag, layout)) = self.schema.layout(entry) else {
            return Err(RuntimeError::UnknownEntry {
                name: name.to_string(),
            });
        };

        let mut given: IndexMap<String, Value> =
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let mut ordered = IndexMap::with_capacity(given.len());
        for step in layout.value_steps() {
            let field = step.name();
            match (step, given.shift_remove(field)) {
                (_, Some(value)) => {
                    ordered.insert(field.to_string(), value);
                }
                (Step::Field { .. }, None) => {
                    return Err(RuntimeError::MissingField {
                        field: field.to_string(),
                    });
                }
                (Step::Optional { .. }, None) => {}
                (_, None) => {
                    ordered.insert(field.to_string(), Value::Bool(false));
                }
            }
        }

        if let Some(field) = given.keys().next() {
            return Err(RuntimeError::UnknownField {
                entry: name.to_string(),
                field: field.clone(),
            });
        }
        self.normalize(&Object::new(tag, name, ordered))
    }

    /// `object` with its flag-bound booleans brought in line with its flag words.
    ///
    /// A `true` conditional takes the value of its bit, which an optional field
    /// sharing the bit may have set. A shared `Bool` is `false` while its bit
    /// is clear. Nested objects are normalized too. Decoding the encoding of a
    /// normalized object yields the same object.
    pub fn normalize(&self, object: &Object) -> Result<Object, RuntimeError> {
        let layout = self.layout_for(object)?;
        let words = compute_words(layout, object);

        let mut fields = IndexMap::with_capacity(object.fields.len());
        for (name, value) in &object.fields {
            fields.insert(name.clone(), self.normalize_value(value)?);
        }
        for step in &layout.steps {
            match step {
                Step::Presence { name, group, bit } => {
                    bool_field(object, name)?;
                    fields.insert(name.clone(), Value::Bool(is_set(&words, *group, *bit)));
                }
                Step::SharedBool { name, group, bit } => {
                    let value = bool_field(object, name)? && is_set(&words, *group, *bit);
                    fields.insert(name.clone(), Value::Bool(value));
                }
                _ => {}
            }
        }
        Ok(Object::new(object.tag, object.name.clone(), fields))
    }

    fn normalize_value(&self, value: &Value) -> Result<Value, RuntimeError> {
        Ok(match value {
            Value::Object(object) => Value::from(self.normalize(object)?),
            Value::Vector(items) => Value::Vector(
                items
                    .iter()
                    .map(|item| self.normalize_value(item))
                    .collect::<Result<_, _>>()?,
            ),
            other => other.clone(),
        })
    }

    fn layout_for(&self, object: &Object) -> Result<&Layout, RuntimeError> {
        self.schema
            .resolve(object.tag)
            .ok()
            .and_then(|entry| self.schema.layout(entry))
            .map(|(_, layout)| layout)
            .ok_or(RuntimeError::UnknownConstructor { tag: object.tag })
    }

    /// Flag words implied by the conditional fields of `object`, indexed by group.
    pub fn flag_words(&self, object: &Object) -> Result<Vec<u32>, RuntimeError> {
        Ok(compute_words(self.layout_for(object)?, object))
    }

    /// Boxed encoding of `object`. Equal to the encoding of its normalized form.
    pub fn encode(&self, object: &Object) -> Result<Vec<u8>, RuntimeError> {
        let mut buf = Vec::with_capacity(self.size(object)?);
        self.serialize(object, &mut Serializer::new(&mut buf))?;
        Ok(buf)
    }

    /// Writes `object` in boxed form, recomputing its flag words first.
    pub fn serialize(&self, object: &Object, s: &mut Serializer<'_>) -> Result<(), RuntimeError> {
        s.write_u32(object.tag)?;
        self.serialize_bare(object, s)
    }

    fn serialize_bare(&self, object: &Object, s: &mut Serializer<'_>) -> Result<(), RuntimeError> {
        let layout = self.layout_for(object)?;
        let words = compute_words(layout, object);

        for step in &layout.steps {
            match step {
                Step::FlagWord { group, .. } => {
                    s.write_u32(words.get(group.0 as usize).copied().unwrap_or(0))?
                }
                Step::Field { name, kind } => {
                    let value = object.get(name).ok_or_else(|| RuntimeError::MissingField {
                        field: name.clone(),
                    })?;
                    self.write_value(name, kind, value, s)?;
                }
                Step::Optional {
                    name,
                    group,
                    bit,
                    kind,
                } => {
                    if is_set(&words, *group, *bit) {
                        let value = object.get(name).ok_or_else(|| missing_conditional(name))?;
                        self.write_value(name, kind, value, s)?;
                    }
                }
                Step::SharedBool { name, group, bit } => {
                    if is_set(&words, *group, *bit) {
                        s.write_bool(bool_field(object, name)?)?;
                    }
                }
                Step::Presence { name, .. } => {
                    bool_field(object, name)?;
                }
            }
        }
        Ok(())
    }

    fn write_value(
        &self,
        field: &str,
        kind: &WireKind,
        value: &Value,
        s: &mut Serializer<'_>,
    ) -> Result<(), RuntimeError> {
        match (kind, value) {
            (WireKind::Int, Value::Int(v)) => s.write_i32(*v)?,
            (WireKind::Long, Value::Long(v)) => s.write_i64(*v)?,
            (WireKind::Float, Value::Float(v)) => s.write_f32(*v)?,
            (WireKind::Double, Value::Double(v)) => s.write_f64(*v)?,
            (WireKind::Bool, Value::Bool(v)) => s.write_bool(*v)?,
            (WireKind::String, Value::String(v)) => s.write_string(v)?,
            (WireKind::Bytes, Value::Bytes(v)) => s.write_bytes(v)?,
            (WireKind::Vector(inner), Value::Vector(items)) => {
                s.write_vector_header(items.len())?;
                for item in items {
                    self.write_value(field, inner, item, s)?;
                }
            }
            (_, Value::Object(object)) if self.accepts(kind, object) => match kind {
                WireKind::Bare { .. } => self.serialize_bare(object, s)?,
                _ => self.serialize(object, s)?,
            },
            _ => return Err(mismatch(field, kind)),
        }
        Ok(())
    }

    /// Exact number of bytes [`serialize`](Self::serialize) writes for `object`.
    pub fn size(&self, object: &Object) -> Result<usize, RuntimeError> {
        Ok(4 + self.bare_size(object)?)
    }

    fn bare_size(&self, object: &Object) -> Result<usize, RuntimeError> {
        let layout = self.layout_for(object)?;
        let words = compute_words(layout, object);

        let mut size = 0;
        for step in &layout.steps {
            size += match step {
                Step::FlagWord { .. } => 4,
                Step::Field { name, kind } => {
                    let value = object.get(name).ok_or_else(|| RuntimeError::MissingField {
                        field: name.clone(),
                    })?;
                    self.value_size(name, kind, value)?
                }
                Step::Optional {
                    name,
                    group,
                    bit,
                    kind,
                } if is_set(&words, *group, *bit) => {
                    let value = object.get(name).ok_or_else(|| missing_conditional(name))?;
                    self.value_size(name, kind, value)?
                }
                Step::SharedBool { group, bit, .. } if is_set(&words, *group, *bit) => 4,
                _ => 0,
            };
        }
        Ok(size)
    }

    fn value_size(
        &self,
        field: &str,
        kind: &WireKind,
        value: &Value,
    ) -> Result<usize, RuntimeError> {
        Ok(match (kind, value) {
            (WireKind::Int, Value::Int(_))
            | (WireKind::Float, Value::Float(_))
            | (WireKind::Bool, Value::Bool(_)) => 4,
            (WireKind::Long, Value::Long(_)) | (WireKind::Double, Value::Double(_)) => 8,
            (WireKind::String, Value::String(v)) => bytes_size(v.len()),
            (WireKind::Bytes, Value::Bytes(v)) => bytes_size(v.len()),
            (WireKind::Vector(inner), Value::Vector(items)) => {
                let mut size = 8;
                for item in items {
                    size += self.value_size(field, inner, item)?;
                }
                size
            }
            (_, Value::Object(object)) if self.accepts(kind, object) => match kind {
                WireKind::Bare { .. } => self.bare_size(object)?,
                _ => self.size(object)?,
            },
            _ => return Err(mismatch(field, kind)),
        })
    }

    /// Whether `object` may stand where `kind` is expected.
    fn accepts(&self, kind: &WireKind, object: &Object) -> bool {
        match kind {
            WireKind::Object { family } => self.schema.is_member(family, object.tag),
            WireKind::Bare { constructor } => {
                object.name == *constructor && self.schema.resolve(object.tag).is_ok()
            }
            WireKind::Query { .. } => {
                matches!(self.schema.resolve(object.tag), Ok(Entry::Method(_)))
            }
            _ => false,
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Object, DecodeError> {
        let mut input = bytes;
        self.deserialize(&mut Deserializer::new(&mut input))
    }

    /// Reads one boxed object, dispatching on its tag through the registry.
    ///
    /// An unknown tag fails after consuming only the tag.
    pub fn deserialize(&self, d: &mut Deserializer<'_>) -> Result<Object, DecodeError> {
        let (tag, entry) = self.schema.registry().read_and_resolve(d)?;
        self.read_body(*entry, tag, d)
    }

    /// Like [`deserialize`](Self::deserialize), but the constructor must belong to `family`.
    pub fn deserialize_in(
        &self,
        family: &str,
        d: &mut Deserializer<'_>,
    ) -> Result<Object, DecodeError> {
        let (tag, entry) = self.schema.registry().read_and_resolve(d)?;
        if !self.schema.is_member(family, tag) {
            return Err(DecodeError::UnexpectedConstructor { tag });
        }
        self.read_body(*entry, tag, d)
    }

    fn read_body(
        &self,
        entry: Entry,
        tag: u32,
        d: &mut Deserializer<'_>,
    ) -> Result<Object, DecodeError> {
        let (Some(entry_name), Some((_, layout))) =
            (self.schema.name(entry), self.schema.layout(entry))
        else {
            return Err(DecodeError::UnknownConstructor { tag });
        };

        let mut words = Vec::new();
        let mut fields = IndexMap::new();
        for step in &layout.steps {
            match step {
                Step::FlagWord { .. } => words.push(d.read_u32()?),
                Step::Field { name, kind } => {
                    fields.insert(name.clone(), self.read_value(kind, d)?);
                }
                Step::Optional {
                    name,
                    group,
                    bit,
                    kind,
                } => {
                    if is_set(&words, *group, *bit) {
                        fields.insert(name.clone(), self.read_value(kind, d)?);
                    }
                }
                Step::SharedBool { name, group, bit } => {
                    let value = is_set(&words, *group, *bit) && d.read_bool()?;
                    fields.insert(name.clone(), Value::Bool(value));
                }
                Step::Presence { name, group, bit } => {
                    fields.insert(name.clone(), Value::Bool(is_set(&words, *group, *bit)));
                }
            }
        }

        tracing::trace!(constructor = entry_name, tag, "decoded object");
        Ok(Object::new(tag, entry_name, fields))
    }

    pub(crate) fn read_value(
        &self,
        kind: &WireKind,
        d: &mut Deserializer<'_>,
    ) -> Result<Value, DecodeError> {
        Ok(match kind {
            WireKind::Int => Value::Int(d.read_i32()?),
            WireKind::Long => Value::Long(d.read_i64()?),
            WireKind::Float => Value::Float(d.read_f32()?),
            WireKind::Double => Value::Double(d.read_f64()?),
            WireKind::Bool => Value::Bool(d.read_bool()?),
            WireKind::String => Value::String(d.read_string()?),
            WireKind::Bytes => Value::Bytes(d.read_bytes()?),
            WireKind::Vector(inner) => match inner.as_ref() {
                WireKind::Int => {
                    Value::Vector(d.read_int_vector()?.into_iter().map(Value::Int).collect())
                }
                WireKind::Long => {
                    Value::Vector(d.read_long_vector()?.into_iter().map(Value::Long).collect())
                }
                _ => Value::Vector(d.read_vector_with(|d| self.read_value(inner, d))?),
            },
            WireKind::Object { family } => Value::from(self.deserialize_in(family, d)?),
            WireKind::Bare { constructor } => {
                let found = self
                    .schema
                    .entry(constructor)
                    .and_then(|entry| Some((entry, self.schema.layout(entry)?.0)));
                let Some((entry, tag)) = found else {
                    return Err(DecodeError::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("no constructor named `{constructor}`"),
                    )));
                };
                Value::from(self.read_body(entry, tag, d)?)
            }
            WireKind::Query { .. } => Value::from(self.deserialize(d)?),
        })
    }

    fn family_of(&self, object: &Object) -> Option<&Supertype> {
        let Ok(Entry::Type(i)) = self.schema.resolve(object.tag) else {
            return None;
        };
        let constructor = self.schema.constructors.get(i)?;
        self.schema.supertype(&constructor.descriptor.supertype)
    }

    /// Whether `object` is the empty variant of its family.
    ///
    /// `None` when the family has no empty/non-empty pair.
    pub fn is_empty(&self, object: &Object) -> Option<bool> {
        let pattern = self.family_of(object)?.empty.as_ref()?;
        Some(object.name == pattern.empty)
    }

    /// `object` itself when it is the non-empty variant of its family.
    pub fn narrow<'o>(&self, object: &'o Object) -> Option<&'o Object> {
        let pattern = self.family_of(object)?.empty.as_ref()?;
        (object.name == pattern.non_empty).then_some(object)
    }
}

fn compute_words(layout: &Layout, object: &Object) -> Vec<u32> {
    let mut words = vec![0u32; layout.flag_words().len()];
    for step in &layout.steps {
        let set = match step {
            Step::Optional { name, .. } => object.fields.contains_key(name),
            Step::Presence { name, .. } => matches!(object.get(name), Some(Value::Bool(true))),
            _ => false,
        };
        if !set {
            continue;
        }
        if let Some((group, bit)) = step.condition() {
            if let Some(word) = words.get_mut(group.0 as usize) {
                *word |= 1 << bit;
            }
        }
    }
    words
}

fn is_set(words: &[u32], group: FlagGroupId, bit: u8) -> bool {
    words
        .get(group.0 as usize)
        .is_some_and(|word| word & (1 << bit) != 0)
}

/// A `true` or shared `Bool` conditional. Absent reads as `false`.
fn bool_field(object: &Object, name: &str) -> Result<bool, RuntimeError> {
    match object.get(name) {
        None => Ok(false),
        Some(Value::Bool(v)) => Ok(*v),
        Some(_) => Err(mismatch(name, &WireKind::Bool)),
    }
}

fn mismatch(field: &str, kind: &WireKind) -> RuntimeError {
    RuntimeError::TypeMismatch {
        field: field.to_string(),
        expected: kind.to_string(),
    }
}
