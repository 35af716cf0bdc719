//! A container for values that cannot be immediately merged during a
//! replacement operation.
//!
//! When merging HOCON values, a substitution expression (`${...}`) might
//! be encountered. Because the final value is unknown until the whole
//! configuration has been parsed, we queue these pending values here and
//! only collapse them once substitution has run.

use crate::merge::value::Value;
use crate::path::Path;
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DelayReplacement(VecDeque<RefCell<Value>>);

impl DelayReplacement {
    pub(crate) fn from_iter<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        DelayReplacement(values.into_iter().map(RefCell::new).collect())
    }

    pub(crate) fn push_front(&mut self, value: Value) {
        self.0.push_front(RefCell::new(value));
    }

    pub(crate) fn into_values(self) -> VecDeque<RefCell<Value>> {
        self.0
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RefCell<Value>> {
        self.0.iter_mut()
    }

    /// Nested `DelayReplacement`s are flattened so the queue is never more
    /// than one level deep.
    pub(crate) fn flatten(self) -> Self {
        let mut values = VecDeque::new();
        for val in self.0 {
            match val.into_inner() {
                Value::DelayReplacement(inner) => values.extend(inner.flatten().into_values()),
                other => values.push_back(RefCell::new(other)),
            }
        }
        DelayReplacement(values)
    }

    /// Collapses the queue into a single value by folding from the right
    /// with `Replace`: the rightmost value is the initial accumulator, each
    /// value to its left becomes the new `left` in `Replace(path, left, acc)`.
    pub(crate) fn resolve(mut self, path: &Path) -> crate::Result<Value> {
        let mut acc = match self.0.pop_back() {
            Some(v) => v.into_inner(),
            None => return Ok(Value::None),
        };
        while let Some(left) = self.0.pop_back() {
            acc = Value::replace(path, left.into_inner(), acc)?;
        }
        Ok(acc)
    }
}

impl Display for DelayReplacement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DelayReplacement({})",
            self.0.iter().map(|v| v.borrow().to_string()).join(", ")
        )
    }
}
