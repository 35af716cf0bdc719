//! One entry in an `Object`'s field list.

use crate::raw::comment::Comment;
use crate::raw::include::Inclusion;
use crate::raw::raw_string::RawString;
use crate::raw::raw_value::RawValue;

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectField {
    KeyValue { key: RawString, value: RawValue },
    Inclusion(Inclusion),
    NewlineComment(Comment),
}

impl ObjectField {
    pub fn key_value(key: impl Into<RawString>, value: RawValue) -> Self {
        ObjectField::KeyValue {
            key: key.into(),
            value,
        }
    }
}
