use crate::raw::raw_value::RawValue;
use derive_more::{Deref, DerefMut};

#[derive(Debug, Clone, PartialEq, Default, Deref, DerefMut)]
pub struct RawArray(Vec<RawValue>);

impl RawArray {
    pub fn new(values: Vec<RawValue>) -> Self {
        RawArray(values)
    }

    pub fn into_inner(self) -> Vec<RawValue> {
        self.0
    }
}

impl FromIterator<RawValue> for RawArray {
    fn from_iter<T: IntoIterator<Item = RawValue>>(iter: T) -> Self {
        RawArray(iter.into_iter().collect())
    }
}
