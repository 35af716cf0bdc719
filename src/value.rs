//! The host-facing dynamic value tree a resolved document exports into.
//!
//! This is the boundary the spec calls out as an external collaborator in
//! full generality (mapping into an arbitrary host language's dynamic
//! values); here the host language is Rust itself, so the "dynamic value"
//! is this enum, built straight from `serde_json::Number` since the crate
//! already carries that dependency for JSON includes.

use crate::merge::array::Array as MergeArray;
use crate::merge::object::Object as MergeObject;
use crate::merge::value::Value as MergeValue;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Object(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Boolean(bool),
    Null,
    String(String),
    Number(serde_json::Number),
}

impl Value {
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn ty(&self) -> &'static str {
        match self {
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Boolean(_) => "boolean",
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Number(_) => "number",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Object(o) => write!(f, "{{{}}}", o.iter().map(|(k, v)| format!("{k} : {v}")).join(", ")),
            Value::Array(a) => write!(f, "[{}]", a.iter().join(", ")),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{s}"),
            Value::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Exports a fully merged root object. Panics if any transient node
/// (Substitution/Concat/AddAssign/DelayReplacement, or an unmerged
/// container) survived resolution -- that's an internal invariant
/// violation, not a user-facing error.
pub(crate) fn export_root(object: MergeObject) -> Value {
    Value::Object(export_object(object))
}

fn export_object(object: MergeObject) -> BTreeMap<String, Value> {
    assert!(object.is_merged(), "export of an unmerged object");
    let mut out = BTreeMap::new();
    for (key, cell) in object.into_iter() {
        if let Some(value) = export_field(cell.into_inner()) {
            out.insert(key, value);
        }
    }
    out
}

/// A dropped `None` at an object field simply omits the key; a `None`
/// inside an array keeps the slot as `null` so indices stay stable.
fn export_field(value: MergeValue) -> Option<Value> {
    match value {
        MergeValue::None => None,
        other => Some(export_value(other)),
    }
}

fn export_array(array: MergeArray) -> Vec<Value> {
    assert!(array.is_merged(), "export of an unmerged array");
    array
        .into_inner()
        .into_iter()
        .map(|cell| export_field(cell.into_inner()).unwrap_or(Value::Null))
        .collect()
}

fn export_value(value: MergeValue) -> Value {
    match value {
        MergeValue::Object(object) => Value::Object(export_object(object)),
        MergeValue::Array(array) => Value::Array(export_array(array)),
        MergeValue::Boolean(b) => Value::Boolean(b),
        MergeValue::Null => Value::Null,
        MergeValue::None => Value::Null,
        MergeValue::String(s) => Value::String(s),
        MergeValue::Number(n) => Value::Number(n.into()),
        MergeValue::Substitution(_)
        | MergeValue::Concat(_)
        | MergeValue::AddAssign(_)
        | MergeValue::DelayReplacement(_) => {
            unreachable!("transient node reached export: resolution did not complete")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::number::Number;
    use std::cell::RefCell;

    fn obj(fields: Vec<(&str, MergeValue)>) -> MergeObject {
        let mut o = MergeObject::default();
        for (k, v) in fields {
            o.insert(k.to_string(), RefCell::new(v));
        }
        o.as_merged();
        o
    }

    #[test]
    fn exports_scalars_and_drops_none_fields() {
        let root = obj(vec![
            ("a", MergeValue::Number(Number::PosInt(1))),
            ("b", MergeValue::None),
        ]);
        let value = export_root(root);
        let object = value.as_object().unwrap();
        assert_eq!(object.get("a").unwrap().as_i64(), Some(1));
        assert!(!object.contains_key("b"));
    }
}
