//! Call signatures for methods.
//!
//! Every method gets one signature with two call forms that share the
//! parameter list and delegate to the same executor.

use indexmap::IndexMap;
use serde::Serialize;

use super::layout::WireKind;
use crate::model::{FieldSpec, MethodDescriptor, Supertype, TypeRef};
use crate::naming::to_snake_case;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallForm {
    Async,
    Blocking,
}

impl CallForm {
    pub const ALL: [CallForm; 2] = [CallForm::Async, CallForm::Blocking];

    /// Function name of this form for a base name.
    pub fn fn_name(self, base: &str) -> String {
        match self {
            Self::Async => base.to_string(),
            Self::Blocking => format!("{base}_blocking"),
        }
    }
}

/// How the response of a call is decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "decode", content = "of", rename_all = "snake_case")]
pub enum ResponseDecode {
    /// The result is whatever the wrapped request returns.
    PassThrough { param: String },
    IntVector,
    LongVector,
    StringVector,
    /// Element-wise decode of a vector of any other kind.
    ObjectVector(WireKind),
    Primitive(WireKind),
    /// One boxed object that must belong to `family`.
    Object { family: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallSignature {
    pub method: String,
    /// Base function name, without the form suffix.
    pub fn_name: String,
    /// Declared parameters minus flag words.
    pub params: Vec<FieldSpec>,
    pub generic: Option<String>,
    pub result: TypeRef,
    pub response: ResponseDecode,
}

impl CallSignature {
    pub fn fn_name_for(&self, form: CallForm) -> String {
        form.fn_name(&self.fn_name)
    }
}

pub fn call_signature(
    method: &MethodDescriptor,
    families: &IndexMap<String, Supertype>,
) -> CallSignature {
    CallSignature {
        method: method.name.clone(),
        fn_name: to_snake_case(&method.name),
        params: method
            .parameters
            .iter()
            .filter(|p| !p.ty.is_flag_word())
            .cloned()
            .collect(),
        generic: method.generics.first().cloned(),
        result: method.result.clone(),
        response: response_decode(method, families),
    }
}

fn response_decode(
    method: &MethodDescriptor,
    families: &IndexMap<String, Supertype>,
) -> ResponseDecode {
    if let TypeRef::Any(generic) = &method.result {
        let param = method
            .parameters
            .iter()
            .find(|p| matches!(&p.ty, TypeRef::Functional(g) if g == generic))
            .map(|p| p.name.clone())
            .unwrap_or_default();
        return ResponseDecode::PassThrough { param };
    }

    match WireKind::of(&method.result, families) {
        WireKind::Vector(element) => match *element {
            WireKind::Int => ResponseDecode::IntVector,
            WireKind::Long => ResponseDecode::LongVector,
            WireKind::String => ResponseDecode::StringVector,
            other => ResponseDecode::ObjectVector(other),
        },
        WireKind::Object { family } => ResponseDecode::Object { family },
        other => ResponseDecode::Primitive(other),
    }
}
