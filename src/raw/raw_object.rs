use crate::raw::field::ObjectField;
use derive_more::{Deref, DerefMut};

/// An ordered field list as produced by the parser. Field order is
/// preserved through parsing; later stages (merge lifting) decide what to
/// do with duplicate keys -- this type makes no attempt to dedup or sort.
#[derive(Debug, Clone, PartialEq, Default, Deref, DerefMut)]
pub struct RawObject(Vec<ObjectField>);

impl RawObject {
    pub fn new(fields: Vec<ObjectField>) -> Self {
        RawObject(fields)
    }

    pub fn fields(&self) -> &[ObjectField] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<ObjectField> {
        self.0
    }

    pub fn push(&mut self, field: ObjectField) {
        self.0.push(field);
    }
}

impl FromIterator<ObjectField> for RawObject {
    fn from_iter<T: IntoIterator<Item = ObjectField>>(iter: T) -> Self {
        RawObject(iter.into_iter().collect())
    }
}
