//! Resolver-side Concat: a pending value-juxtaposition awaiting
//! `TryResolve` once its elements stop being Substitutions.

use crate::merge::value::Value;
use crate::path::Path;
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Concat {
    values: VecDeque<RefCell<Value>>,
    /// `spaces.len() == values.len() - 1`.
    spaces: VecDeque<Option<String>>,
}

impl Concat {
    pub(crate) fn new(values: VecDeque<RefCell<Value>>, spaces: VecDeque<Option<String>>) -> Self {
        Concat { values, spaces }
    }

    pub(crate) fn pair(left: Value, space: Option<String>, right: Value) -> Self {
        let mut values = VecDeque::new();
        values.push_back(RefCell::new(left));
        values.push_back(RefCell::new(right));
        let mut spaces = VecDeque::new();
        spaces.push_back(space);
        Concat { values, spaces }
    }

    pub(crate) fn push_front(&mut self, value: Value, space: Option<String>) {
        self.values.push_front(RefCell::new(value));
        self.spaces.push_front(space);
    }

    pub(crate) fn push_back(&mut self, value: Value, space: Option<String>) {
        self.values.push_back(RefCell::new(value));
        self.spaces.push_back(space);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &RefCell<Value>> {
        self.values.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RefCell<Value>> {
        self.values.iter_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    /// Folds the Concat left-to-right via `Concatenate`, carrying the
    /// space that followed each element. An empty Concat never occurs in
    /// practice (the invariant is `|values| >= 1`), but is handled for
    /// robustness by resolving to `Value::None`.
    pub(crate) fn try_resolve(mut self, path: &Path) -> crate::Result<Value> {
        if self.values.is_empty() {
            return Ok(Value::None);
        }
        if self.values.len() == 1 {
            return Ok(self.values.pop_front().unwrap().into_inner());
        }
        let mut acc = self.values.pop_front().unwrap().into_inner();
        while let Some(next) = self.values.pop_front() {
            let space = self.spaces.pop_front().flatten();
            acc = Value::concatenate(path, acc, space, next.into_inner())?;
        }
        Ok(acc)
    }
}

impl TryFrom<crate::raw::concat::Concat> for Concat {
    type Error = crate::error::Error;

    fn try_from(value: crate::raw::concat::Concat) -> Result<Self, Self::Error> {
        let (values, spaces) = value.into_parts();
        let values = values
            .into_iter()
            .map(|v| Ok(RefCell::new(Value::try_from(v)?)))
            .collect::<crate::Result<VecDeque<_>>>()?;
        Ok(Concat::new(values, spaces.into()))
    }
}

impl Display for Concat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Concat({})",
            self.values.iter().map(|v| v.borrow().to_string()).join(" ")
        )
    }
}
