use crate::{
    merge::{memo::Memo, value::Value},
    options::ConfigOptions,
    path::{Key, Path},
    raw::{field::ObjectField, raw_object::RawObject, raw_string::RawString, raw_value::RawValue},
};
use itertools::Itertools;
use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt::Display,
    ops::{Deref, DerefMut},
};

type V = RefCell<Value>;

/// A keyed field map plus a cached `is_merged` bit: true once every
/// descendant is a resolved scalar or a container with `is_merged = true`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Object {
    Merged(BTreeMap<String, V>),
    Unmerged(BTreeMap<String, V>),
}

impl Object {
    /// Lifts a parsed `RawObject` into a merge tree: duplicate keys within
    /// one literal object apply HOCON's override rules on the spot, and
    /// dotted keys (`a.b = v`) expand into nested objects.
    pub(crate) fn new(obj: RawObject) -> crate::Result<Self> {
        let mut root = Object::default();
        for field in obj.into_fields() {
            root.put_field(field)?;
        }
        Ok(root)
    }

    fn put_field(&mut self, field: ObjectField) -> crate::Result<()> {
        match field {
            ObjectField::Inclusion(inclusion) => {
                if let Some(included) = inclusion.val {
                    let included_obj = Object::new(included)?;
                    self.merge(included_obj, None)?;
                }
            }
            ObjectField::KeyValue { key, value } => self.put_kv(key, value)?,
            ObjectField::NewlineComment(_) => {}
        }
        Ok(())
    }

    fn put_kv(&mut self, key: RawString, value: RawValue) -> crate::Result<()> {
        let path = key.as_path()?;
        let leaf: Value = value.try_into()?;
        let expanded = Self::nest_at_path(&path, leaf);
        self.merge(expanded, None)?;
        Ok(())
    }

    /// Wraps `leaf` in a chain of single-field objects matching `path`,
    /// innermost-first, e.g. `a.b` wraps `leaf` as `{a: {b: leaf}}`.
    fn nest_at_path(path: &Path, leaf: Value) -> Object {
        let mut keys: Vec<&Key> = path.iter().map(|p| &p.first).collect();
        let mut current = leaf;
        while let Some(key) = keys.pop() {
            let mut obj = Object::default();
            obj.insert(key.to_string(), RefCell::new(current));
            current = Value::object(obj);
        }
        match current {
            Value::Object(obj) => obj,
            _ => unreachable!("nest_at_path always produces an Object for a non-empty path"),
        }
    }

    /// Installs every field of `other` into `self`, deep-merging where both
    /// sides are objects and otherwise applying `Value::replace`. `base` is
    /// the path of `self` itself, used only to build error-reporting paths.
    pub(crate) fn merge(&mut self, other: Self, base: Option<&Path>) -> crate::Result<()> {
        let both_merged = self.is_merged() && other.is_merged();
        for (k, v_right) in other.into_map() {
            let sub_path = match base {
                Some(p) => p.clone().with_pushed(k.clone()),
                None => Path::single(k.clone()),
            };
            match self.get_mut(&k) {
                Some(v_left) => {
                    let installed = match (&mut *v_left.borrow_mut(), v_right.into_inner()) {
                        (Value::Object(left_obj), Value::Object(right_obj)) => {
                            left_obj.merge(right_obj, Some(&sub_path))?;
                            None
                        }
                        (_, right) => Some(right),
                    };
                    if let Some(right) = installed {
                        let left = std::mem::take(&mut *v_left.borrow_mut());
                        let replaced = Value::replace(&sub_path, left, right)?.resolve_add_assign();
                        *v_left.borrow_mut() = replaced;
                    }
                }
                None => {
                    let value = v_right.into_inner().resolve_add_assign();
                    self.insert(k, RefCell::new(value));
                }
            }
        }
        if !both_merged {
            self.as_unmerged();
        }
        Ok(())
    }

    pub(crate) fn try_become_merged(&mut self) -> bool {
        let mut all_merged = true;
        for val in self.values_mut() {
            let val = val.get_mut();
            if !val.try_become_merged() {
                all_merged = false;
            }
        }
        if all_merged {
            self.as_merged();
        }
        all_merged
    }

    pub(crate) fn as_merged(&mut self) {
        let obj = std::mem::take(self.deref_mut());
        *self = Self::Merged(obj);
    }

    pub(crate) fn as_unmerged(&mut self) {
        let obj = std::mem::take(self.deref_mut());
        *self = Self::Unmerged(obj);
    }

    pub(crate) fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    fn into_map(self) -> BTreeMap<String, V> {
        match self {
            Object::Merged(m) | Object::Unmerged(m) => m,
        }
    }

    pub(crate) fn into_iter(self) -> impl Iterator<Item = (String, RefCell<Value>)> {
        self.into_map().into_iter()
    }

    /// Looks up a (possibly multi-segment) path from this object downward,
    /// cloning the target value. Cloning sidesteps holding a live borrow
    /// across the recursive descent, and substitution needs an owned copy
    /// of the target subtree regardless (it's spliced into another location).
    pub(crate) fn get_by_path(&self, path: &Path) -> Option<Value> {
        let first = self.get(&path.first.to_string())?;
        match path.next() {
            None => Some(first.borrow().clone()),
            Some(rest) => match &*first.borrow() {
                Value::Object(obj) => obj.get_by_path(rest),
                _ => None,
            },
        }
    }

    /// Substitutes every field's value in place, recursing into nested
    /// objects/arrays. `root` is the pristine pre-substitution tree used for
    /// every path lookup; `self` here is the (disjoint, owned) tree being
    /// rebuilt, so taking values out of it never perturbs `root`.
    pub(crate) fn substitute_in_place(
        &mut self,
        root: &Object,
        memo: &mut Memo,
        base: Option<&Path>,
        opts: &ConfigOptions,
    ) -> crate::Result<()> {
        let keys: Vec<String> = self.keys().cloned().collect();
        for key in keys {
            let field_path = match base {
                Some(p) => p.clone().with_pushed(key.clone()),
                None => Path::single(key.clone()),
            };
            let cell = self.get(&key).expect("key came from self.keys()");
            let current = std::mem::take(&mut *cell.borrow_mut());
            let resolved = current.substitute(root, memo, &field_path, opts)?;
            *self.get(&key).unwrap().borrow_mut() = resolved;
        }
        Ok(())
    }

    /// Recursively replaces any lingering `AddAssign` leaf with a
    /// one-element array; run once after substitution completes.
    pub(crate) fn resolve_add_assign_sweep(&mut self) {
        for val in self.values_mut() {
            let val = val.get_mut();
            Self::sweep_value(val);
        }
    }

    fn sweep_value(val: &mut Value) {
        match val {
            Value::Object(obj) => obj.resolve_add_assign_sweep(),
            Value::Array(arr) => {
                for v in arr.iter_mut() {
                    Self::sweep_value(v.get_mut());
                }
            }
            Value::AddAssign(_) => {
                let taken = std::mem::take(val);
                *val = taken.resolve_add_assign();
            }
            _ => {}
        }
    }
}

impl TryFrom<RawObject> for Object {
    type Error = crate::error::Error;

    fn try_from(value: RawObject) -> Result<Self, Self::Error> {
        Object::new(value)
    }
}

impl Default for Object {
    fn default() -> Self {
        Object::Unmerged(BTreeMap::new())
    }
}

impl Deref for Object {
    type Target = BTreeMap<String, V>;

    fn deref(&self) -> &Self::Target {
        match self {
            Object::Merged(obj) | Object::Unmerged(obj) => obj,
        }
    }
}

impl DerefMut for Object {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Object::Merged(obj) | Object::Unmerged(obj) => obj,
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .map(|(k, v)| format!("{k} : {}", v.borrow()))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_override_in_source_order() {
        let mut root = Object::default();
        root.put_kv(RawString::unquoted("a"), RawValue::Number(crate::raw::number::Number::PosInt(1)))
            .unwrap();
        root.put_kv(RawString::unquoted("a"), RawValue::Number(crate::raw::number::Number::PosInt(2)))
            .unwrap();
        let v = root.get("a").unwrap().borrow();
        assert_eq!(*v, Value::Number(crate::raw::number::Number::PosInt(2)));
    }

    #[test]
    fn dotted_keys_nest_and_merge() {
        let mut root = Object::default();
        root.put_kv(
            RawString::path_expression(vec![RawString::unquoted("a"), RawString::unquoted("b")]),
            RawValue::Number(crate::raw::number::Number::PosInt(1)),
        )
        .unwrap();
        root.put_kv(
            RawString::path_expression(vec![RawString::unquoted("a"), RawString::unquoted("c")]),
            RawValue::Number(crate::raw::number::Number::PosInt(2)),
        )
        .unwrap();
        let a = root.get("a").unwrap().borrow();
        match &*a {
            Value::Object(inner) => {
                assert_eq!(inner.len(), 2);
            }
            other => panic!("expected object, got {other}"),
        }
    }
}
