//! Marks a field value that was introduced with the `+=` separator.

use crate::raw::raw_value::RawValue;

#[derive(Debug, Clone, PartialEq)]
pub struct AddAssign {
    pub value: Box<RawValue>,
}

impl AddAssign {
    pub fn new(value: RawValue) -> Self {
        AddAssign {
            value: Box::new(value),
        }
    }

    pub fn into_inner(self) -> RawValue {
        *self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut RawValue {
        &mut self.value
    }
}
