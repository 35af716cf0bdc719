//! Accumulates the juxtaposed items of one value expression, tracking the
//! horizontal whitespace between consecutive items so it can be replayed
//! into a `Concat`'s `spaces` list.

use crate::raw::raw_value::RawValue;

#[derive(Debug, Default)]
pub(crate) struct Value {
    pub(crate) values: Vec<RawValue>,
    pub(crate) spaces: Vec<Option<String>>,
    pub(crate) pre_space: Option<String>,
}

impl Value {
    pub(crate) fn push_value(&mut self, value: RawValue) {
        if !self.values.is_empty() {
            self.spaces.push(self.pre_space.take());
        }
        self.values.push(value);
    }
}

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Separator {
    Assign,
    AddAssign,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::raw_string::RawString;

    #[test]
    fn single_push_has_no_space() {
        let mut v = Value::default();
        v.push_value(RawValue::String(RawString::unquoted("a")));
        assert!(v.spaces.is_empty());
    }

    #[test]
    fn second_push_records_pending_space() {
        let mut v = Value::default();
        v.push_value(RawValue::String(RawString::unquoted("a")));
        v.pre_space = Some(" ".to_string());
        v.push_value(RawValue::String(RawString::unquoted("b")));
        assert_eq!(v.spaces, vec![Some(" ".to_string())]);
    }
}
