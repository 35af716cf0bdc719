use crate::merge::value::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AddAssign(pub(crate) Box<Value>);

impl AddAssign {
    pub(crate) fn new(value: Value) -> Self {
        AddAssign(Box::new(value))
    }

    pub(crate) fn into_inner(self) -> Value {
        *self.0
    }

    pub(crate) fn inner_mut(&mut self) -> &mut Value {
        &mut self.0
    }
}

impl Display for AddAssign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "+= {}", self.0)
    }
}

impl TryFrom<crate::raw::add_assign::AddAssign> for AddAssign {
    type Error = crate::error::Error;

    fn try_from(value: crate::raw::add_assign::AddAssign) -> Result<Self, Self::Error> {
        let inner: Value = value.into_inner().try_into()?;
        Ok(AddAssign::new(inner))
    }
}
