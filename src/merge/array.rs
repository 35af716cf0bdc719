use crate::merge::value::Value;
use itertools::Itertools;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

/// An array plus a cached `is_merged` bit, recomputed by
/// `try_become_merged` whenever an element might have settled.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Array {
    values: Vec<RefCell<Value>>,
    merged: bool,
}

impl Array {
    pub(crate) fn new(values: Vec<RefCell<Value>>) -> Self {
        let merged = values.iter().all(|v| v.borrow().is_merged());
        Array { values, merged }
    }

    pub(crate) fn into_inner(self) -> Vec<RefCell<Value>> {
        self.values
    }

    pub(crate) fn is_merged(&self) -> bool {
        self.merged
    }

    pub(crate) fn as_unmerged(&mut self) {
        self.merged = false;
    }

    pub(crate) fn try_become_merged(&mut self) -> bool {
        let all_merged = self.values.iter_mut().all(|v| v.get_mut().try_become_merged());
        self.merged = all_merged;
        all_merged
    }
}

impl Deref for Array {
    type Target = Vec<RefCell<Value>>;

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl DerefMut for Array {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.values
    }
}

impl TryFrom<crate::raw::raw_array::RawArray> for Array {
    type Error = crate::error::Error;

    fn try_from(value: crate::raw::raw_array::RawArray) -> Result<Self, Self::Error> {
        let values = value
            .into_inner()
            .into_iter()
            .map(|v| Ok(RefCell::new(Value::try_from(v)?)))
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(Array::new(values))
    }
}

impl Display for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.values.iter().map(|v| v.borrow().to_string()).join(", ")
        )
    }
}
